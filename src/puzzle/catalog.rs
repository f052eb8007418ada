//! Puzzle Catalog
//!
//! Fixed tables of hacking challenges, one table per puzzle kind. A
//! puzzle id hashes into its kind's table, so content assignment needs
//! no storage and agrees across sessions. The browser client carries a
//! copy of the same tables for offline rendering; changing an entry here
//! without updating the client desynchronizes the two.

use serde::{Deserialize, Serialize};

use crate::core::hash::table_index;

/// The four puzzle kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleKind {
    /// Shell one-liners.
    Terminal,
    /// Regex patterns validated against test cases.
    Regex,
    /// Classic cipher decodes.
    Encryption,
    /// Sequence and boolean riddles.
    Logic,
}

impl PuzzleKind {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            PuzzleKind::Terminal => "terminal",
            PuzzleKind::Regex => "regex",
            PuzzleKind::Encryption => "encryption",
            PuzzleKind::Logic => "logic",
        }
    }

    /// Parse a wire name. Unknown kinds return `None`; callers fall back
    /// to the terminal table for content and reject the answer.
    pub fn parse(s: &str) -> Option<PuzzleKind> {
        match s {
            "terminal" => Some(PuzzleKind::Terminal),
            "regex" => Some(PuzzleKind::Regex),
            "encryption" => Some(PuzzleKind::Encryption),
            "logic" => Some(PuzzleKind::Logic),
            _ => None,
        }
    }

    /// This kind's content table.
    pub fn table(self) -> &'static [PuzzleDef] {
        match self {
            PuzzleKind::Terminal => &TERMINAL,
            PuzzleKind::Regex => &REGEX,
            PuzzleKind::Encryption => &ENCRYPTION,
            PuzzleKind::Logic => &LOGIC,
        }
    }
}

/// One test case for a pattern puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegexCase {
    /// Input string the player's pattern runs against.
    pub string: &'static str,
    /// Whether the pattern must match it.
    pub should_match: bool,
}

/// A single catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct PuzzleDef {
    /// Challenge text shown to the player.
    pub description: &'static str,
    /// Optional nudge in the right direction.
    pub hint: Option<&'static str>,
    /// Canonical answer text. Empty for pattern puzzles, which validate
    /// against `test_cases` instead.
    pub solution: &'static str,
    /// A known-good pattern, for pattern puzzles only.
    pub example_solution: Option<&'static str>,
    /// Match cases, for pattern puzzles only.
    pub test_cases: &'static [RegexCase],
    /// Shown when the answer is accepted.
    pub success_message: &'static str,
    /// Shown when the answer is rejected.
    pub failure_message: &'static str,
}

/// Deterministically select the catalog entry for a puzzle id.
pub fn definition_for(kind: PuzzleKind, id: &str) -> &'static PuzzleDef {
    let table = kind.table();
    &table[table_index(id, table.len())]
}

const NO_CASES: &[RegexCase] = &[];

const TERMINAL: [PuzzleDef; 7] = [
    PuzzleDef {
        description: "Access the hidden directory and list its contents. The directory is called \".secret\" and is in the current folder.",
        hint: None,
        solution: "ls -la .secret",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "ACCESS GRANTED. Directory contents revealed: [crypto_keys, user_data.bin, backdoor.sh]",
        failure_message: "ACCESS DENIED. Invalid command syntax.",
    },
    PuzzleDef {
        description: "Find all files containing the word \"password\" in the current directory and subdirectories.",
        hint: None,
        solution: "grep -r \"password\" .",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "SEARCH COMPLETE. Found 3 occurrences in [config.ini, ./users/admin.txt, ./system/auth.log]",
        failure_message: "SEARCH FAILED. Invalid search parameters.",
    },
    PuzzleDef {
        description: "Change permissions on \"secure.sh\" to make it executable for the owner only.",
        hint: None,
        solution: "chmod 700 secure.sh",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "PERMISSIONS UPDATED. File \"secure.sh\" is now executable.",
        failure_message: "PERMISSION DENIED. Invalid permission syntax.",
    },
    PuzzleDef {
        description: "Create a compressed archive of the \"data\" folder.",
        hint: None,
        solution: "tar -czf data.tar.gz data",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "COMPRESSION COMPLETE. Archive \"data.tar.gz\" created successfully.",
        failure_message: "COMPRESSION FAILED. Invalid command parameters.",
    },
    PuzzleDef {
        description: "Connect to the remote server at 192.168.1.10 using SSH as user \"admin\".",
        hint: None,
        solution: "ssh admin@192.168.1.10",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "CONNECTION ESTABLISHED. Welcome to CoreSec Server.",
        failure_message: "CONNECTION FAILED. Invalid SSH command.",
    },
    PuzzleDef {
        description: "Display the last 10 lines of the log file \"system.log\".",
        hint: None,
        solution: "tail system.log",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "LOG ENTRIES RETRIEVED. Detected suspicious access patterns.",
        failure_message: "RETRIEVAL FAILED. Invalid command syntax.",
    },
    PuzzleDef {
        description: "Find all processes running as root and save them to \"root_processes.txt\".",
        hint: None,
        solution: "ps -u root > root_processes.txt",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "PROCESS LIST SAVED. 47 processes found running as root.",
        failure_message: "OPERATION FAILED. Incorrect command or permissions issue.",
    },
];

const REGEX: [PuzzleDef; 3] = [
    PuzzleDef {
        description: "Create a regex pattern that matches valid IPv4 addresses (e.g., 192.168.1.1).",
        hint: None,
        solution: "",
        example_solution: Some(
            "^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
        ),
        test_cases: &[
            RegexCase { string: "192.168.1.1", should_match: true },
            RegexCase { string: "255.255.255.255", should_match: true },
            RegexCase { string: "0.0.0.0", should_match: true },
            RegexCase { string: "256.1.1.1", should_match: false },
            RegexCase { string: "192.168.1", should_match: false },
            RegexCase { string: "a.b.c.d", should_match: false },
        ],
        success_message: "PATTERN VALID. Firewall access granted.",
        failure_message: "PATTERN INVALID. Your regex does not match all test cases.",
    },
    PuzzleDef {
        description: "Create a regex pattern that matches valid hexadecimal color codes (e.g., #FFF or #123ABC).",
        hint: None,
        solution: "",
        example_solution: Some("^#([A-Fa-f0-9]{3}|[A-Fa-f0-9]{6})$"),
        test_cases: &[
            RegexCase { string: "#FFF", should_match: true },
            RegexCase { string: "#123ABC", should_match: true },
            RegexCase { string: "#4a5B6c", should_match: true },
            RegexCase { string: "#GGG", should_match: false },
            RegexCase { string: "FFF", should_match: false },
            RegexCase { string: "#1234567", should_match: false },
        ],
        success_message: "COLOR CODES ACCEPTED. Visual interface unlocked.",
        failure_message: "INVALID COLOR CODE PATTERN. Access denied.",
    },
    PuzzleDef {
        description: "Create a regex pattern that matches all valid email addresses.",
        hint: None,
        solution: "",
        example_solution: Some("^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\\.[a-zA-Z]{2,}$"),
        test_cases: &[
            RegexCase { string: "user@example.com", should_match: true },
            RegexCase { string: "user.name+tag@example.co.uk", should_match: true },
            RegexCase { string: "123@subdomain.example.com", should_match: true },
            RegexCase { string: "user@domain", should_match: false },
            RegexCase { string: "@example.com", should_match: false },
            RegexCase { string: "user@.com", should_match: false },
        ],
        success_message: "EMAIL PATTERN VALIDATED. Phishing filter enabled.",
        failure_message: "PATTERN REJECTED. Does not correctly filter email formats.",
    },
];

const ENCRYPTION: [PuzzleDef; 4] = [
    PuzzleDef {
        description: "Decrypt this Caesar cipher (shift by 3): \"DWWDFN DW GDZQ\"",
        hint: None,
        solution: "ATTACK AT DAWN",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "DECRYPTION SUCCESSFUL. Mission details acquired.",
        failure_message: "DECRYPTION FAILED. Try a different key or approach.",
    },
    PuzzleDef {
        description: "Decrypt this message with key=\"PENGUIN\": \"THQJNRBWJLFRKVGJBHTLXWL\"",
        hint: Some(
            "This is a Vigenère cipher. Each letter is shifted by the corresponding letter in the key.",
        ),
        solution: "SECRETSERVERLOCATION",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "DECRYPTION SUCCESSFUL. Server location acquired.",
        failure_message: "DECRYPTION FAILED. Incorrect decoding algorithm or key.",
    },
    PuzzleDef {
        description: "Convert this binary to ASCII: \"01001000 01000001 01000011 01001011 01000101 01000100\"",
        hint: None,
        solution: "HACKED",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "CONVERSION COMPLETE. System access granted.",
        failure_message: "CONVERSION FAILED. Incorrect binary interpretation.",
    },
    PuzzleDef {
        description: "Decrypt this hex-encoded message: \"496365626572672050726f746f636f6c\"",
        hint: None,
        solution: "Iceberg Protocol",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "HEX DECODED. Protocol name confirmed.",
        failure_message: "DECODING ERROR. Verify your hex conversion method.",
    },
];

const LOGIC: [PuzzleDef; 4] = [
    PuzzleDef {
        description: "Complete the logical sequence: 2, 6, 12, 20, ?",
        hint: Some("Look at the differences between consecutive numbers."),
        solution: "30",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "SEQUENCE VERIFIED. Access protocol accepted.",
        failure_message: "SEQUENCE ERROR. Logical pattern not recognized.",
    },
    PuzzleDef {
        description: "If A=1, B=2, C=3, etc., what 5-letter word equals 54? It's something a hacker might do.",
        hint: Some("Sum the values of each letter in the word."),
        solution: "CRACK",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "WORD VERIFIED. Semantic access granted.",
        failure_message: "WORD INCORRECT. Semantic pattern not recognized.",
    },
    PuzzleDef {
        description: "Resolve this Boolean expression: (A OR B) AND (NOT A OR C) AND (NOT B OR NOT C), where A=true, B=true, C=?",
        hint: Some("Try both true and false for C and see which satisfies all conditions."),
        solution: "false",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "BOOLEAN LOGIC VERIFIED. Firewall exception created.",
        failure_message: "BOOLEAN ERROR. Logic gate sequence invalid.",
    },
    PuzzleDef {
        description: "What is the next number in this pattern: 1, 3, 6, 10, 15, ?",
        hint: Some(
            "These are triangular numbers. Think about how each number relates to its position in the sequence.",
        ),
        solution: "21",
        example_solution: None,
        test_cases: NO_CASES,
        success_message: "TRIANGULAR SEQUENCE CONFIRMED. Security node unlocked.",
        failure_message: "SEQUENCE MISMATCH. Mathematical pattern violated.",
    },
];

// =============================================================================
// TESTS
// =============================================================================
