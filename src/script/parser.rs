use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Movement directions of the hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    fn from_method(name: &str) -> Option<Self> {
        match name {
            "moveRight" => Some(Direction::Right),
            "moveLeft" => Some(Direction::Left),
            "moveUp" => Some(Direction::Up),
            "moveDown" => Some(Direction::Down),
            _ => None,
        }
    }

    fn method(&self) -> &'static str {
        match self {
            Direction::Right => "moveRight",
            Direction::Left => "moveLeft",
            Direction::Up => "moveUp",
            Direction::Down => "moveDown",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method())
    }
}

/// Repeat counts are clamped to this range
const MAX_MOVE_COUNT: u32 = 50;

/// One recognized script command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Move { dir: Direction, count: u32 },
    Scan { poi: String, var: String },
    Deliver { poi: String, var: String },
    Set { var: String, expr: String },
}

impl Action {
    /// The allow-list key this action is validated against
    pub fn command_key(&self) -> String {
        match self {
            Action::Move { dir, .. } => format!("hero.{}", dir.method()),
            Action::Scan { .. } => "hero.scan".to_string(),
            Action::Deliver { .. } => "hero.deliver".to_string(),
            Action::Set { .. } => "set".to_string(),
        }
    }
}

/// An action plus its source position, for diagnostics downstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAction {
    #[serde(flatten)]
    pub action: Action,
    /// 1-based source line number
    pub line: usize,
    /// The trimmed source text of the line
    pub raw: String,
}

/// First-error-wins parse failure, with the offending 1-based line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("Línea {line}: comando inválido: {text}")]
    InvalidCommand { line: usize, text: String },
    #[error("Línea {line}: comando bloqueado: {key}")]
    BlockedCommand { line: usize, key: String },
}

static MOVE_RE: OnceLock<Regex> = OnceLock::new();
static SCAN_RE: OnceLock<Regex> = OnceLock::new();
static DELIVER_RE: OnceLock<Regex> = OnceLock::new();
static SET_RE: OnceLock<Regex> = OnceLock::new();

fn move_re() -> &'static Regex {
    MOVE_RE.get_or_init(|| {
        Regex::new(r"^hero\.(moveRight|moveLeft|moveUp|moveDown)\(\s*(\d+)?\s*\)\s*$").unwrap()
    })
}

fn scan_re() -> &'static Regex {
    SCAN_RE.get_or_init(|| Regex::new(r#"^hero\.scan\(\s*"([^"]+)"\s*,\s*"([^"]+)"\s*\)\s*$"#).unwrap())
}

fn deliver_re() -> &'static Regex {
    DELIVER_RE
        .get_or_init(|| Regex::new(r#"^hero\.deliver\(\s*"([^"]+)"\s*,\s*"([^"]+)"\s*\)\s*$"#).unwrap())
}

fn set_re() -> &'static Regex {
    SET_RE.get_or_init(|| Regex::new(r"^set\s+([a-zA-Z_$][\w$]*)\s*=\s*(.+?)\s*$").unwrap())
}

fn parse_line(line: &str) -> Option<Action> {
    if let Some(caps) = move_re().captures(line) {
        let dir = Direction::from_method(&caps[1])?;
        // The capture is all digits, so a failed parse can only mean the
        // number is too large; it still clamps to the maximum, not to 1.
        let count = caps
            .get(2)
            .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
            .filter(|n| *n > 0)
            .map(|n| n.min(u64::from(MAX_MOVE_COUNT)) as u32)
            .unwrap_or(1);
        return Some(Action::Move { dir, count });
    }
    if let Some(caps) = scan_re().captures(line) {
        return Some(Action::Scan {
            poi: caps[1].to_string(),
            var: caps[2].to_string(),
        });
    }
    if let Some(caps) = deliver_re().captures(line) {
        return Some(Action::Deliver {
            poi: caps[1].to_string(),
            var: caps[2].to_string(),
        });
    }
    if let Some(caps) = set_re().captures(line) {
        return Some(Action::Set {
            var: caps[1].to_string(),
            expr: caps[2].to_string(),
        });
    }
    None
}

/// Parse a whole script into an ordered action list.
///
/// Blank lines and `//` comments are skipped. Every other line must match
/// exactly one of the four grammars (first match wins) and carry a command
/// key present in `allowed`. The first offending line aborts the parse;
/// there is never partial success.
pub fn parse_program(
    text: &str,
    allowed: &HashSet<String>,
) -> Result<Vec<ParsedAction>, ScriptError> {
    let mut actions = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let number = idx + 1;

        let action = parse_line(line).ok_or_else(|| ScriptError::InvalidCommand {
            line: number,
            text: line.to_string(),
        })?;

        let key = action.command_key();
        if !allowed.contains(&key) {
            return Err(ScriptError::BlockedCommand { line: number, key });
        }

        actions.push(ParsedAction {
            action,
            line: number,
            raw: line.to_string(),
        });
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn all_commands() -> HashSet<String> {
        allow(&[
            "hero.moveRight",
            "hero.moveLeft",
            "hero.moveUp",
            "hero.moveDown",
            "hero.scan",
            "hero.deliver",
            "set",
        ])
    }

    #[test]
    fn move_without_count_defaults_to_one() {
        let actions = parse_program("hero.moveRight()", &all_commands()).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].action,
            Action::Move {
                dir: Direction::Right,
                count: 1
            }
        );
        assert_eq!(actions[0].line, 1);
        assert_eq!(actions[0].raw, "hero.moveRight()");
    }

    #[test]
    fn move_with_count() {
        let actions = parse_program("hero.moveRight(5)", &all_commands()).unwrap();
        assert_eq!(
            actions[0].action,
            Action::Move {
                dir: Direction::Right,
                count: 5
            }
        );
    }

    #[test]
    fn move_count_clamped_to_fifty() {
        let actions = parse_program("hero.moveRight(999)", &all_commands()).unwrap();
        assert_eq!(
            actions[0].action,
            Action::Move {
                dir: Direction::Right,
                count: 50
            }
        );
    }

    #[test]
    fn move_count_beyond_u32_still_clamps_to_fifty() {
        let actions = parse_program("hero.moveRight(99999999999)", &all_commands()).unwrap();
        assert_eq!(
            actions[0].action,
            Action::Move {
                dir: Direction::Right,
                count: 50
            }
        );

        // Wider than u64 as well
        let actions =
            parse_program("hero.moveDown(999999999999999999999999)", &all_commands()).unwrap();
        assert_eq!(
            actions[0].action,
            Action::Move {
                dir: Direction::Down,
                count: 50
            }
        );
    }

    #[test]
    fn zero_count_falls_back_to_one() {
        let actions = parse_program("hero.moveUp(0)", &all_commands()).unwrap();
        assert_eq!(
            actions[0].action,
            Action::Move {
                dir: Direction::Up,
                count: 1
            }
        );
    }

    #[test]
    fn scan_and_deliver_capture_both_arguments() {
        let script = "hero.scan(\"fuente\", \"agua\")\nhero.deliver(\"aldea\", \"agua\")";
        let actions = parse_program(script, &all_commands()).unwrap();
        assert_eq!(
            actions[0].action,
            Action::Scan {
                poi: "fuente".into(),
                var: "agua".into()
            }
        );
        assert_eq!(
            actions[1].action,
            Action::Deliver {
                poi: "aldea".into(),
                var: "agua".into()
            }
        );
        assert_eq!(actions[1].line, 2);
    }

    #[test]
    fn set_keeps_expression_unevaluated() {
        let actions = parse_program("set saludo = \"hola\" + nombre", &all_commands()).unwrap();
        assert_eq!(
            actions[0].action,
            Action::Set {
                var: "saludo".into(),
                expr: "\"hola\" + nombre".into()
            }
        );
    }

    #[test]
    fn comments_and_blanks_preserve_line_numbers() {
        let script = "// cabecera\n\nhero.moveLeft()\n";
        let actions = parse_program(script, &all_commands()).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].line, 3);
    }

    #[test]
    fn invalid_line_names_its_number() {
        let err = parse_program("hero.moveRight()\nhero.fly()", &all_commands()).unwrap_err();
        assert_eq!(
            err,
            ScriptError::InvalidCommand {
                line: 2,
                text: "hero.fly()".into()
            }
        );
        assert_eq!(err.to_string(), "Línea 2: comando inválido: hero.fly()");
    }

    #[test]
    fn blocked_command_is_distinct_from_invalid() {
        let err = parse_program("hero.scan(\"a\", \"b\")", &allow(&["hero.moveRight"])).unwrap_err();
        assert_eq!(
            err,
            ScriptError::BlockedCommand {
                line: 1,
                key: "hero.scan".into()
            }
        );
        assert_eq!(err.to_string(), "Línea 1: comando bloqueado: hero.scan");
    }

    #[test]
    fn first_error_wins_no_partial_output() {
        let script = "hero.moveRight()\n???\nhero.moveLeft()";
        let err = parse_program(script, &all_commands()).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidCommand { line: 2, .. }));
    }

    #[test]
    fn empty_script_is_ok() {
        assert!(parse_program("", &all_commands()).unwrap().is_empty());
        assert!(parse_program("\n// solo comentario\n", &all_commands())
            .unwrap()
            .is_empty());
    }
}
