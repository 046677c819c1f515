//! Domain entities: the typed command record produced by the parser

/// Flags shared by every verb.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// Render commands without executing them
    pub dry_run: bool,
    /// Render commands before executing them
    pub verbose: bool,
}

impl RunFlags {
    pub fn new(dry_run: bool, verbose: bool) -> Self {
        Self { dry_run, verbose }
    }

    /// Whether the rendered command line should be echoed.
    pub fn echo(&self) -> bool {
        self.dry_run || self.verbose
    }
}

/// Environment and region an `env` action targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub env: String,
    pub region: String,
}

impl Target {
    pub fn new(env: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            region: region.into(),
        }
    }
}

/// Sub-verbs of `env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvAction {
    Plan(Target),
    Apply { target: Target, auto_approve: bool },
    Destroy(Target),
    /// `output` is region independent
    Output { env: String },
}

/// Sub-verbs of `docs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocsAction {
    /// Run the freshness-check script
    Status,
    /// Page (or only print) a registered document
    Open { name: String, print_only: bool },
    /// Print the document registry
    List,
}

/// A (verb, sub-verb) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Env(EnvAction),
    Docs(DocsAction),
}

/// Parsed command record. Consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub action: Action,
    pub flags: RunFlags,
}

impl Invocation {
    pub fn new(action: Action, flags: RunFlags) -> Self {
        Self { action, flags }
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Undefined variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_either_flag_when_echo_then_true() {
        assert!(!RunFlags::default().echo());
        assert!(RunFlags::new(true, false).echo());
        assert!(RunFlags::new(false, true).echo());
    }

    #[test]
    fn given_undefined_variable_when_expand_then_returns_input() {
        let input = "$ARGOEKS_SURELY_UNDEFINED_VAR/docs";
        assert_eq!(expand_env_vars(input), input);
    }
}
