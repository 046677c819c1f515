//! Test support: logging setup and a recording command runner

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::CommandRunner;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "argoeks=trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// One recorded child process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Program followed by its arguments
    pub argv: Vec<String>,
    pub cwd: PathBuf,
}

/// Command runner that records calls instead of starting processes.
#[derive(Debug)]
pub struct RecordingCommandRunner {
    calls: Mutex<Vec<RecordedCall>>,
    exit_code: i32,
    failure: Option<io::ErrorKind>,
}

impl Default for RecordingCommandRunner {
    fn default() -> Self {
        Self::exiting_with(0)
    }
}

impl RecordingCommandRunner {
    /// Every call "exits" with `code`.
    pub fn exiting_with(code: i32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            exit_code: code,
            failure: None,
        }
    }

    /// Every call fails to start with an error of `kind`.
    pub fn failing_with(kind: io::ErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Recorded argument vectors only.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.calls().into_iter().map(|c| c.argv).collect()
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn run_attached(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<i32> {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().cloned());
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                argv,
                cwd: cwd.to_path_buf(),
            });
        }
        match self.failure {
            Some(kind) => Err(io::Error::new(kind, format!("{program}: simulated failure"))),
            None => Ok(self.exit_code),
        }
    }
}
