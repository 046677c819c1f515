//! Child process argument vectors and their shell rendering

use std::fmt;

use itertools::Itertools;

/// Ordered argument vector for one child process. `argv[0]` is the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            argv: vec![program.into()],
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Append one argument when `cond` holds.
    pub fn arg_if(self, cond: bool, arg: impl Into<String>) -> Self {
        if cond {
            self.arg(arg)
        } else {
            self
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Printable form, each token quoted for a POSIX shell.
    pub fn render(&self) -> String {
        self.argv.iter().map(|a| shell_quote(a)).join(" ")
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c)
}

/// Quote `token` so a POSIX shell reads it back as one word.
///
/// Tokens made only of safe characters are returned bare; everything else is
/// wrapped in single quotes, with embedded quotes written as `'"'"'`.
pub fn shell_quote(token: &str) -> String {
    if token.is_empty() {
        return "''".to_string();
    }
    if token.chars().all(is_shell_safe) {
        return token.to_string();
    }
    format!("'{}'", token.replace('\'', r#"'"'"'"#))
}
