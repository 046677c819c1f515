//! Command dispatch service
//!
//! Maps a parsed action to the child process it stands for, or to an
//! informational outcome that needs no child process.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{Action, CommandLine, DocsAction, DocumentEntry, DocumentRegistry, EnvAction};
use crate::infrastructure::traits::FileSystem;

/// What an action turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Run one child process.
    Run(CommandLine),
    /// Print a document path, then page it.
    Page { path: PathBuf, command: CommandLine },
    /// Print a document path only.
    Print(PathBuf),
    /// Print the document registry.
    List(Vec<DocumentEntry>),
}

/// Service translating actions into argument vectors.
pub struct DispatchService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    registry: DocumentRegistry,
}

impl DispatchService {
    /// Create a dispatch service; the document registry is built from `settings`.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        let registry = settings.document_registry();
        Self {
            fs,
            settings,
            registry,
        }
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    #[instrument(level = "debug", skip(self))]
    pub fn dispatch(&self, action: &Action) -> ApplicationResult<Dispatch> {
        match action {
            Action::Env(env) => Ok(Dispatch::Run(self.env_command(env))),
            Action::Docs(DocsAction::Status) => Ok(Dispatch::Run(self.docs_status_command())),
            Action::Docs(DocsAction::Open { name, print_only }) => {
                let path = self.resolve_document(name)?;
                if *print_only {
                    Ok(Dispatch::Print(path))
                } else {
                    let command = CommandLine::new(&self.settings.pager)
                        .arg(path.to_string_lossy());
                    Ok(Dispatch::Page { path, command })
                }
            }
            Action::Docs(DocsAction::List) => {
                Ok(Dispatch::List(self.registry.entries().cloned().collect()))
            }
        }
    }

    /// Argument vector for an `env` action.
    pub fn env_command(&self, action: &EnvAction) -> CommandLine {
        let make = CommandLine::new(&self.settings.make);
        match action {
            EnvAction::Plan(t) => make
                .arg("plan-env")
                .arg(format!("ENV={}", t.env))
                .arg(format!("REGION={}", t.region)),
            EnvAction::Apply {
                target: t,
                auto_approve,
            } => make
                .arg("apply-env")
                .arg(format!("ENV={}", t.env))
                .arg(format!("REGION={}", t.region))
                .arg_if(*auto_approve, "AUTO_APPROVE=true"),
            EnvAction::Destroy(t) => make
                .arg("destroy-env")
                .arg(format!("ENV={}", t.env))
                .arg(format!("REGION={}", t.region)),
            EnvAction::Output { env } => make.arg("output").arg(format!("ENV={}", env)),
        }
    }

    /// Argument vector for `docs status`: the freshness script, no arguments.
    pub fn docs_status_command(&self) -> CommandLine {
        CommandLine::new(self.settings.freshness_script_path().to_string_lossy())
    }

    /// Resolve a document name to an existing absolute path.
    pub fn resolve_document(&self, name: &str) -> ApplicationResult<PathBuf> {
        let path = self.registry.resolve(name, &self.settings.repo_root)?;
        debug!("resolve_document: {} -> {}", name, path.display());
        if !self.fs.is_file(&path) {
            return Err(ApplicationError::DocumentMissing(path));
        }
        Ok(path)
    }
}
