//! Admin Terminal
//!
//! The in-fiction command shell reached through terminal props. Commands
//! are parsed locally against a canned filesystem; the only ones with
//! real side effects are `override --auth=sysadmin`, which grants the
//! door-unlock privilege, and the privileged `unlock` family.

use chrono::Local;
use rand::Rng;

use crate::core::coord::DoorSide;
use crate::session::state::GameState;
use crate::world::door::{DoorId, DoorKey};

const UNKNOWN_COMMAND: &str =
    "> ERROR: Command not recognized. Type 'help' for available commands.";

const BASE_HELP: &str = "> AVAILABLE COMMANDS:\n\
> help - Display this help message\n\
> ls - List files in current directory\n\
> cat [file] - Display file contents\n\
> whoami - Display current user\n\
> ping - Test network connection\n\
> status - Show system status\n\
> override --auth=[USERNAME] - Override security for authorized users\n\
> search [string] - Search for files containing string\n\
> exit - Close terminal session";

const ADMIN_HELP: &str = "\n\n> ADMIN COMMANDS:\n\
> unlock [all|north|south|east|west|x,y] - Unlock specified doors";

const LS_OUTPUT: &str = "
> DIRECTORY LISTING:
> config/
> logs/
> system/
> users/
> network.conf
> readme.txt
> .secret/
";

const README: &str = "
> ICEBERG SECURE SYSTEM v2.4.1
>
> WARNING: Unauthorized access will be prosecuted to the full extent of the law.
>
> NOTICE TO ADMINISTRATORS:
> The Iceberg Protocol update is scheduled for implementation in 48 hours.
> All systems will require security verification and recertification.
> Contact Security Director Chen for clearance codes.
";

const NETWORK_CONF: &str = "
> NETWORK CONFIGURATION:
>
> primary_dns=10.16.8.12
> secondary_dns=10.16.8.13
> gateway=192.168.1.1
> subnet_mask=255.255.255.0
>
> [SECURITY]
> firewall=enabled
> intrusion_detection=high
> packet_filtering=strict
> vpn_tunnel=enabled
>
> [REMOTE ACCESS]
> ssh=enabled
> port=22
> allowed_ips=10.16.8.0/24,192.168.1.5,192.168.1.20
";

const BACKDOOR_CONF: &str = "
> BACKDOOR CONFIGURATION:
>
> [ACCESS]
> main_security=ov3rRid3_1337
> admin_sudo=C0rp0r4t3_0v3rl0rd$
> eastern_server=Ic3B3rgPr0t0c0l#9
> board_meeting=Pr0f1tM4rg1n$
>
> [OVERRIDE]
> sequence=ALPHA-ZETA-9-DELTA-EPSILON
>
> [WARNING]
> This file should be deleted after memorizing credentials.
> Security regularly scans for unauthorized access points.
";

const SECURITY_LOG: &str = "
> SECURITY LOG [RECENT ENTRIES]:
>
> [03:42:19] Unauthorized access attempt from external IP
> [04:15:37] Security breach detected on level B3 - CONTAINMENT ACTIVE
> [05:30:11] User 'Director Hammond' accessed Iceberg Protocol files
> [06:12:58] Multiple failed login attempts - terminal locked
> [07:05:22] Security override initiated in eastern server farm
> [08:45:09] Employee access revoked: USER_IDs 45892, 46012, 46118
";

const PING_OUTPUT: &str = "
> PING RESULTS:
> gateway (192.168.1.1): 2ms
> primary_dns (10.16.8.12): 5ms
> external (8.8.8.8): 37ms
> iceberg_server (10.16.9.45): NO RESPONSE - ACCESS DENIED
";

/// Execute one terminal command against the session state.
pub fn execute(state: &mut GameState, command: &str) -> String {
    let cmd = command.trim().to_lowercase();

    if cmd == "help" {
        if state.can_unlock_doors {
            format!("{}{}", BASE_HELP, ADMIN_HELP)
        } else {
            BASE_HELP.to_string()
        }
    } else if cmd == "ls" {
        LS_OUTPUT.to_string()
    } else if let Some(file) = cmd.strip_prefix("cat ") {
        cat(file)
    } else if cmd == "whoami" {
        whoami()
    } else if cmd == "ping" {
        PING_OUTPUT.to_string()
    } else if cmd == "status" {
        status()
    } else if let Some(auth) = cmd.strip_prefix("override --auth=") {
        override_auth(state, auth)
    } else if let Some(term) = cmd.strip_prefix("search ") {
        search(term)
    } else if cmd == "exit" {
        "> SESSION TERMINATED".to_string()
    } else if cmd.starts_with("unlock ") && state.can_unlock_doors {
        // Without the privilege the command stays hidden behind the
        // unknown-command error.
        unlock(state, &cmd["unlock ".len()..])
    } else {
        UNKNOWN_COMMAND.to_string()
    }
}

fn cat(file: &str) -> String {
    match file {
        "readme.txt" => README.to_string(),
        "network.conf" => NETWORK_CONF.to_string(),
        ".secret/.backdoor.conf" => BACKDOOR_CONF.to_string(),
        "logs/security.log" => SECURITY_LOG.to_string(),
        _ => format!("> ERROR: File \"{}\" not found or access denied.", file),
    }
}

fn whoami() -> String {
    format!(
        "> current_user=guest_terminal\n\
         > access_level=2\n\
         > session_id=TRM-{}\n\
         > login_time={}",
        rand::thread_rng().gen_range(10000..=99999),
        Local::now().format("%H:%M:%S"),
    )
}

fn status() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "\n> SYSTEM STATUS:\n\
         > cpu_load: {}%\n\
         > memory_usage: {}%\n\
         > disk_space: {}% used\n\
         > temperature: {}\u{b0}C\n\
         > uptime: 37 days, 14 hours\n\
         > security_alerts: {} active\n\
         > iceberg_protocol: {}% complete\n",
        rng.gen_range(50..=90),
        rng.gen_range(60..=90),
        rng.gen_range(70..=90),
        rng.gen_range(45..=60),
        rng.gen_range(1..=5),
        rng.gen_range(92..=98),
    )
}

fn override_auth(state: &mut GameState, auth: &str) -> String {
    if auth == "sysadmin" {
        state.can_unlock_doors = true;
        "> OVERRIDE ACCEPTED\n\
         > Access level increased to 7\n\
         > Door security protocols temporarily bypassed\n\
         > Additional terminal commands unlocked\n\
         > CAUTION: All actions are being logged"
            .to_string()
    } else {
        "> ERROR: Invalid authorization code. Access denied.".to_string()
    }
}

fn search(term: &str) -> String {
    match term {
        "password" | "passwords" => format!(
            "\n> SEARCH RESULTS FOR '{}':\n\
             > ./config/default_passwords.cfg\n\
             > ./users/admin.bak\n\
             > ./.secret/.backdoor.conf\n\
             > ./system/security/password_policy.txt\n\
             > ./logs/password_changes.log\n",
            term
        ),
        "iceberg" | "protocol" => format!(
            "\n> SEARCH RESULTS FOR '{}':\n\
             > ./projects/iceberg_protocol/main.cfg\n\
             > ./logs/protocol_access.log\n\
             > ./users/hammond/protocol_notes.txt\n\
             > ./system/protocols/iceberg_deployment.schedule\n\
             > ACCESS DENIED: Further results require higher clearance\n",
            term
        ),
        _ => format!("> No results found for '{}'", term),
    }
}

fn unlock(state: &mut GameState, target: &str) -> String {
    let level = state.current_level;

    if target == "all" {
        for side in [
            DoorSide::North,
            DoorSide::South,
            DoorSide::East,
            DoorSide::West,
        ] {
            state.unlock_door(DoorId::Cardinal(DoorKey::new(level, side)));
        }
        "> SECURITY OVERRIDE SUCCESSFUL\n\
         > All doors in current area unlocked\n\
         > Access granted to restricted areas\n\
         > Security system temporarily bypassed"
            .to_string()
    } else if let Some(side) = DoorSide::parse(target) {
        state.unlock_door(DoorId::Cardinal(DoorKey::new(level, side)));
        format!(
            "> SECURITY OVERRIDE SUCCESSFUL\n\
             > {} door unlocked\n\
             > Access granted to restricted area",
            target
        )
    } else if let Some((x, y)) = tile_target(target) {
        state.unlock_door(DoorId::Tile { x, y });
        format!(
            "> SECURITY OVERRIDE SUCCESSFUL\n\
             > Door at coordinates {},{} unlocked\n\
             > Access granted to restricted area",
            x, y
        )
    } else {
        "> ERROR: Invalid door specification\n\
         > Usage: unlock [all|north|south|east|west|x,y]"
            .to_string()
    }
}

/// Parse an `x,y` door target. Plain digits only, matching the original
/// validator, so negative or decorated coordinates fall through to the
/// usage error.
fn tile_target(spec: &str) -> Option<(i32, i32)> {
    let (x, y) = spec.split_once(',')?;
    if x.is_empty() || y.is_empty() {
        return None;
    }
    if !x.bytes().all(|b| b.is_ascii_digit()) || !y.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((x.parse().ok()?, y.parse().ok()?))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coord::LevelCoord;

    #[test]
    fn test_help_grows_after_override() {
        let mut state = GameState::default();
        let before = execute(&mut state, "help");
        assert!(!before.contains("ADMIN COMMANDS"));

        execute(&mut state, "override --auth=sysadmin");
        let after = execute(&mut state, "help");
        assert!(after.contains("ADMIN COMMANDS"));
        assert!(after.contains("unlock [all|north|south|east|west|x,y]"));
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        let mut state = GameState::default();
        let response = execute(&mut state, "  OVERRIDE --AUTH=SYSADMIN  ");
        assert!(response.contains("OVERRIDE ACCEPTED"));
        assert!(state.can_unlock_doors);
    }

    #[test]
    fn test_override_rejects_wrong_credential() {
        let mut state = GameState::default();
        let response = execute(&mut state, "override --auth=root");
        assert!(response.contains("Invalid authorization code"));
        assert!(!state.can_unlock_doors);
    }

    #[test]
    fn test_cat_known_and_missing_files() {
        let mut state = GameState::default();
        assert!(execute(&mut state, "cat readme.txt").contains("ICEBERG SECURE SYSTEM"));
        assert!(execute(&mut state, "cat .secret/.backdoor.conf").contains("ov3rRid3_1337"));
        assert_eq!(
            execute(&mut state, "cat passwords.txt"),
            "> ERROR: File \"passwords.txt\" not found or access denied."
        );
    }

    #[test]
    fn test_unlock_requires_privilege() {
        let mut state = GameState::default();
        assert_eq!(execute(&mut state, "unlock north"), UNKNOWN_COMMAND);
        assert!(state.unlocked_doors.is_empty());
    }

    #[test]
    fn test_unlock_direction_sets_exactly_one_key() {
        let mut state = GameState {
            current_level: LevelCoord::new(2, 3),
            can_unlock_doors: true,
            ..GameState::default()
        };
        let response = execute(&mut state, "unlock north");
        assert!(response.contains("north door unlocked"));
        assert_eq!(state.unlocked_doors.len(), 1);
        let (door, open) = state.unlocked_doors.iter().next().unwrap();
        assert_eq!(door.to_string(), "door_2_3_north");
        assert!(open);
    }

    #[test]
    fn test_unlock_all_sets_four_cardinal_keys() {
        let mut state = GameState {
            current_level: LevelCoord::new(-1, 0),
            can_unlock_doors: true,
            ..GameState::default()
        };
        execute(&mut state, "unlock all");
        assert_eq!(state.unlocked_doors.len(), 4);
        for side in ["north", "south", "east", "west"] {
            let key = format!("door_-1_0_{}", side);
            assert!(
                state.unlocked_doors.keys().any(|d| d.to_string() == key),
                "missing {}",
                key
            );
        }
    }

    #[test]
    fn test_unlock_tile_coordinates() {
        let mut state = GameState {
            can_unlock_doors: true,
            ..GameState::default()
        };
        let response = execute(&mut state, "unlock 9,19");
        assert!(response.contains("Door at coordinates 9,19 unlocked"));
        assert!(state.is_door_unlocked(&DoorId::Tile { x: 9, y: 19 }));
    }

    #[test]
    fn test_unlock_rejects_malformed_target() {
        let mut state = GameState {
            can_unlock_doors: true,
            ..GameState::default()
        };
        for bad in ["up", "9,", ",19", "-1,4", "9,19,2", "9, 19"] {
            let response = execute(&mut state, &format!("unlock {}", bad));
            assert!(response.contains("Invalid door specification"), "{}", bad);
        }
        assert!(state.unlocked_doors.is_empty());
    }

    #[test]
    fn test_status_and_whoami_shapes() {
        let mut state = GameState::default();
        let status = execute(&mut state, "status");
        assert!(status.contains("SYSTEM STATUS"));
        assert!(status.contains("°C"));

        let whoami = execute(&mut state, "whoami");
        assert!(whoami.contains("current_user=guest_terminal"));
        assert!(whoami.contains("session_id=TRM-"));
    }

    #[test]
    fn test_search_terms() {
        let mut state = GameState::default();
        assert!(execute(&mut state, "search passwords").contains("default_passwords.cfg"));
        assert!(execute(&mut state, "search iceberg").contains("higher clearance"));
        assert_eq!(
            execute(&mut state, "search penguins"),
            "> No results found for 'penguins'"
        );
    }

    #[test]
    fn test_unknown_command() {
        let mut state = GameState::default();
        assert_eq!(execute(&mut state, "rm -rf /"), UNKNOWN_COMMAND);
        assert_eq!(execute(&mut state, ""), UNKNOWN_COMMAND);
    }
}
