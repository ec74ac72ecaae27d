//! Entry/exit command classification.
//!
//! Every string handed to `on_entry`/`on_exit` is classified exactly once, at
//! insertion, into one of three kinds by looking at its prefix:
//!
//! - **Targeted**: starts with a target selector (`@s`, `@p`, ...), kept verbatim.
//! - **Expression**: starts with a Molang namespace (`v.`, `q.`, ...), kept with
//!   exactly one trailing `;`.
//! - **Game**: anything else, sent to the engine as a slash command.

use std::fmt;

/// Target selector sigils recognized at the start of a targeted command.
pub const SELECTOR_PREFIXES: &[&str] = &["@initiator", "@p", "@r", "@a", "@e", "@s", "@c", "@v"];

/// Molang namespaces recognized at the start of an expression.
pub const EXPRESSION_PREFIXES: &[&str] = &[
    "variable.",
    "v.",
    "query.",
    "q.",
    "temp.",
    "t.",
    "context.",
    "c.",
    "math.",
];

/// Expression statement separator.
pub const EXPRESSION_SEPARATOR: char = ';';

/// Game command prefix.
pub const COMMAND_PREFIX: char = '/';

/// A classified controller command, stored in its wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Targeted(String),
    Expression(String),
    Game(String),
}

impl Command {
    /// Classify a raw command string.
    pub fn classify(raw: &str) -> Self {
        if is_targeted(raw) {
            Command::Targeted(raw.to_string())
        } else if is_expression(raw) {
            Command::Expression(terminate_expression(raw))
        } else {
            let body = raw.strip_prefix(COMMAND_PREFIX).unwrap_or(raw);
            Command::Game(format!("{COMMAND_PREFIX}{body}"))
        }
    }

    /// Build the assignment expression `<variable> = <value>;`.
    pub fn assignment(variable: &str, value: &str) -> Self {
        Command::Expression(terminate_expression(&format!("{variable} = {value}")))
    }

    /// The string written to the controller JSON.
    pub fn as_wire(&self) -> &str {
        match self {
            Command::Targeted(s) | Command::Expression(s) | Command::Game(s) => s,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Command::Expression(_))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

fn is_targeted(raw: &str) -> bool {
    SELECTOR_PREFIXES.iter().any(|p| raw.starts_with(p))
}

fn is_expression(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    EXPRESSION_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Collapse any run of trailing separators into exactly one.
fn terminate_expression(raw: &str) -> String {
    let body = raw.trim_end_matches(EXPRESSION_SEPARATOR);
    format!("{body}{EXPRESSION_SEPARATOR}")
}
