//! Single RouterOS command lines.

use std::fmt;

/// One command line under a RouterOS menu, e.g. `add chain=prerouting ...`.
///
/// Arguments keep insertion order so rendering is byte-stable. A flag is
/// an argument without a value (`fib`, `disabled`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    action: &'static str,
    args: Vec<(String, Option<String>)>,
}

impl Command {
    /// Start an `add` command.
    pub fn add() -> Self {
        Self::new("add")
    }

    /// Start a command with an arbitrary action (`set`, `remove`, ...).
    pub fn new(action: &'static str) -> Self {
        Self {
            action,
            args: Vec::new(),
        }
    }

    /// Append `key=value`.
    pub fn arg(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.args.push((key.to_string(), Some(value.to_string())));
        self
    }

    /// Append a bare flag.
    pub fn flag(mut self, key: &str) -> Self {
        self.args.push((key.to_string(), None));
        self
    }

    /// Value of the first argument named `key`. Flags have no value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn has(&self, key: &str) -> bool {
        self.args.iter().any(|(k, _)| k == key)
    }

    /// Render the command in RouterOS CLI syntax.
    pub fn render(&self) -> String {
        let mut line = String::from(self.action);
        for (key, value) in &self.args {
            line.push(' ');
            line.push_str(key);
            if let Some(value) = value {
                line.push('=');
                line.push_str(&quote(value));
            }
        }
        line
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Command> for String {
    fn from(cmd: Command) -> Self {
        cmd.render()
    }
}

/// Quote a value for the RouterOS CLI if it needs it.
///
/// Bare words may contain letters, digits and `-_.:/%!,@+*`; anything
/// else is wrapped in double quotes with `\`, `"`, `$` and control
/// characters escaped.
pub fn quote(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.:/%!,@+*".contains(c));
    if bare {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
