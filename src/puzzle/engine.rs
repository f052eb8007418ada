//! Puzzle Engine
//!
//! Validates player answers against the catalog and mints rewards.
//! Validation is stateless; completion tracking lives in the session
//! store so the engine can be exercised directly in tests.

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::puzzle::catalog::{definition_for, PuzzleDef, PuzzleKind};

/// Result of checking one answer.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    /// Whether the answer was accepted.
    pub correct: bool,
    /// Granted on first-time success, otherwise `null` on the wire.
    pub reward: Option<Reward>,
    /// Flavor text for the terminal overlay.
    pub message: String,
}

/// Player skills that puzzle rewards can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    /// Raised by terminal puzzles.
    Hacking,
    /// Raised by logic puzzles.
    Networking,
    /// Raised by encryption puzzles.
    Cryptography,
}

impl SkillKind {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            SkillKind::Hacking => "hacking",
            SkillKind::Networking => "networking",
            SkillKind::Cryptography => "cryptography",
        }
    }
}

/// What a solved puzzle pays out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reward {
    /// Skill increase.
    Skill {
        /// Which skill goes up.
        skill: SkillKind,
        /// How many points it gains.
        amount: u32,
        /// Flavor line shown with the grant.
        message: String,
    },
    /// Inventory access key.
    Key {
        /// Generated key identifier.
        key_id: String,
        /// Flavor line shown with the grant.
        message: String,
    },
}

/// Check an answer against the catalog entry its id selects.
///
/// A kind of `None` means the client sent a kind this build does not
/// know. The terminal table still supplies the failure text, but no
/// answer is ever accepted for it.
pub fn check(kind: Option<PuzzleKind>, puzzle_id: &str, answer: &str) -> CheckOutcome {
    let def = definition_for(kind.unwrap_or(PuzzleKind::Terminal), puzzle_id);
    let correct = match kind {
        Some(kind) => matches(kind, def, answer),
        None => false,
    };
    if let (true, Some(kind)) = (correct, kind) {
        CheckOutcome {
            correct: true,
            reward: Some(reward_for(kind)),
            message: def.success_message.to_string(),
        }
    } else {
        CheckOutcome {
            correct: false,
            reward: None,
            message: def.failure_message.to_string(),
        }
    }
}

/// Validate one answer against one catalog entry.
pub fn matches(kind: PuzzleKind, def: &PuzzleDef, answer: &str) -> bool {
    match kind {
        PuzzleKind::Terminal => {
            let given = answer.trim().to_lowercase();
            let expected = def.solution.to_lowercase();
            given == expected
                || is_ls_variation(&given, &expected)
                || is_grep_variation(&given, &expected)
        }
        PuzzleKind::Regex => match Regex::new(answer.trim()) {
            Ok(re) => def
                .test_cases
                .iter()
                .all(|case| re.is_match(case.string) == case.should_match),
            Err(_) => false,
        },
        PuzzleKind::Encryption => answer.trim().to_uppercase() == def.solution.to_uppercase(),
        PuzzleKind::Logic => answer.trim().to_lowercase() == def.solution.to_lowercase(),
    }
}

/// Accept `ls -al` for an `ls -la` solution when the arguments agree.
fn is_ls_variation(answer: &str, solution: &str) -> bool {
    if !solution.starts_with("ls -la") {
        return false;
    }
    let mut given = answer.split_whitespace();
    if given.next() != Some("ls") {
        return false;
    }
    if !matches!(given.next(), Some("-la") | Some("-al")) {
        return false;
    }
    given.eq(solution.split_whitespace().skip(2))
}

/// Accept `--recursive` for `-r` when pattern and path agree.
fn is_grep_variation(answer: &str, solution: &str) -> bool {
    match (grep_parts(answer), grep_parts(solution)) {
        (Some(given), Some(expected)) => given == expected,
        _ => false,
    }
}

/// Split a recursive grep command into its quoted pattern and path.
fn grep_parts(command: &str) -> Option<(&str, &str)> {
    let rest = command.trim().strip_prefix("grep")?.trim_start();
    let rest = rest
        .strip_prefix("--recursive")
        .or_else(|| rest.strip_prefix("-r"))?
        .trim_start();
    let (pattern, rest) = rest.strip_prefix('"')?.split_once('"')?;
    let path = rest.trim();
    if path.is_empty() {
        return None;
    }
    Some((pattern, path))
}

/// Mint the reward for solving a puzzle of the given kind.
pub fn reward_for(kind: PuzzleKind) -> Reward {
    match kind {
        PuzzleKind::Terminal => Reward::Skill {
            skill: SkillKind::Hacking,
            amount: 1,
            message: "Hacking skill increased by 1!".to_string(),
        },
        PuzzleKind::Regex => Reward::Key {
            key_id: format!("security_{}", rand::thread_rng().gen_range(1000..=9999)),
            message: "Security access key acquired!".to_string(),
        },
        PuzzleKind::Encryption => Reward::Skill {
            skill: SkillKind::Cryptography,
            amount: 1,
            message: "Cryptography skill increased by 1!".to_string(),
        },
        PuzzleKind::Logic => Reward::Skill {
            skill: SkillKind::Networking,
            amount: 1,
            message: "Networking skill increased by 1!".to_string(),
        },
    }
}

// =============================================================================
// TESTS
// =============================================================================
