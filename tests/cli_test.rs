//! End-to-end tests: argument parsing through dispatch and execution

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::Parser;
use clap_complete::Shell;
use rstest::rstest;
use tempfile::TempDir;

use argoeks::cli::args::{Cli, ConfigCommands};
use argoeks::cli::commands::{
    build_invocation, handle_config, init_config, print_completions, run_invocation,
};
use argoeks::cli::{CliError, CliResult};
use argoeks::config::{Defaults, Settings};
use argoeks::domain::{Action, DocsAction, EnvAction, Invocation, RunFlags, Target};
use argoeks::exitcode;
use argoeks::infrastructure::traits::RealFileSystem;
use argoeks::infrastructure::ServiceContainer;
use argoeks::util::testing::{init_test_setup, RecordingCommandRunner};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("argoeks").chain(args.iter().copied()))
        .expect("arguments should parse")
}

fn parse_err(args: &[&str]) -> clap::Error {
    Cli::try_parse_from(std::iter::once("argoeks").chain(args.iter().copied()))
        .expect_err("arguments should be rejected")
}

fn invocation(args: &[&str]) -> Invocation {
    build_invocation(&parse(args), &Defaults::default()).expect("build invocation")
}

/// Repository with the Quick Start document present
fn repo_with_docs() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("docs")).unwrap();
    fs::write(temp.path().join("docs/QuickStart.md"), "# Quick Start").unwrap();
    temp
}

struct Run {
    code: CliResult<i32>,
    stdout: String,
    calls: Vec<Vec<String>>,
}

/// Parse, dispatch and execute `args` against a recording runner.
fn run(args: &[&str], repo_root: PathBuf, runner: RecordingCommandRunner) -> Run {
    init_test_setup();
    let runner = Arc::new(runner);
    let settings = Settings {
        repo_root,
        ..Settings::default()
    };
    let container = ServiceContainer::with_deps(settings, Arc::new(RealFileSystem), runner.clone());
    let mut out = Vec::new();

    let code = build_invocation(&parse(args), &container.settings.defaults)
        .and_then(|inv| run_invocation(&container, &inv, &mut out));

    Run {
        code,
        stdout: String::from_utf8(out).unwrap(),
        calls: runner.argvs(),
    }
}

// ============================================================
// Parsing
// ============================================================

#[test]
fn given_no_region_when_parse_env_plan_then_uses_defaults() {
    let inv = invocation(&["env", "plan"]);
    assert_eq!(
        inv,
        Invocation::new(
            Action::Env(EnvAction::Plan(Target::new("dev", "us-east-1"))),
            RunFlags::default()
        )
    );
}

#[test]
fn given_configured_defaults_when_parse_env_destroy_then_uses_them() {
    let defaults = Defaults {
        env: "sandbox".into(),
        region: "eu-central-1".into(),
    };
    let inv = build_invocation(&parse(&["env", "destroy", "--region", "us-west-2"]), &defaults)
        .unwrap();
    assert_eq!(
        inv.action,
        Action::Env(EnvAction::Destroy(Target::new("sandbox", "us-west-2")))
    );
}

#[rstest]
#[case::before_verb(&["--dry-run", "--verbose", "env", "output"])]
#[case::after_verb(&["env", "output", "--dry-run", "--verbose"])]
fn given_global_flags_anywhere_when_parse_then_recognized(#[case] args: &[&str]) {
    let inv = invocation(args);
    assert_eq!(inv.flags, RunFlags::new(true, true));
    assert_eq!(
        inv.action,
        Action::Env(EnvAction::Output { env: "dev".into() })
    );
}

#[test]
fn given_docs_open_when_parse_then_keeps_name_verbatim() {
    let inv = invocation(&["docs", "open", "--name", "Quick Start", "--print-only"]);
    assert_eq!(
        inv.action,
        Action::Docs(DocsAction::Open {
            name: "Quick Start".into(),
            print_only: true
        })
    );
}

#[rstest]
#[case::no_verb(&[])]
#[case::no_sub_verb(&["env"])]
#[case::unknown_verb(&["deploy"])]
#[case::unknown_sub_verb(&["env", "refresh"])]
#[case::docs_open_without_name(&["docs", "open"])]
#[case::region_on_output(&["env", "output", "--region", "us-east-1"])]
#[case::auto_approve_on_plan(&["env", "plan", "--auto-approve"])]
#[case::legacy_docs_path(&["docs", "--path", "README.md"])]
fn given_invalid_command_line_when_parse_then_usage_error(#[case] args: &[&str]) {
    let err = parse_err(args);
    assert_ne!(err.kind(), ErrorKind::DisplayHelp);
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn given_empty_env_when_build_invocation_then_invalid_args() {
    let err = build_invocation(&parse(&["env", "plan", "--env", ""]), &Defaults::default())
        .unwrap_err();
    assert!(matches!(err, CliError::InvalidArgs(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_non_dispatchable_command_when_build_invocation_then_internal_error() {
    let err = build_invocation(&parse(&["config", "show"]), &Defaults::default()).unwrap_err();
    assert!(matches!(err, CliError::Internal(_)));
    assert_eq!(err.exit_code(), exitcode::SOFTWARE);
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_verbose_env_plan_when_run_then_prints_and_runs_make() {
    let result = run(
        &["env", "plan", "--env", "qa", "--region", "eu-west-1", "--verbose"],
        PathBuf::from("/repo"),
        RecordingCommandRunner::default(),
    );

    assert_eq!(result.code.unwrap(), 0);
    assert_eq!(result.stdout, "$ make plan-env ENV=qa REGION=eu-west-1\n");
    assert_eq!(
        result.calls,
        vec![vec!["make", "plan-env", "ENV=qa", "REGION=eu-west-1"]]
    );
}

#[test]
fn given_dry_run_env_apply_when_run_then_prints_and_runs_nothing() {
    let result = run(
        &[
            "--dry-run",
            "env",
            "apply",
            "--env",
            "dev",
            "--region",
            "us-east-1",
            "--auto-approve",
        ],
        PathBuf::from("/repo"),
        RecordingCommandRunner::exiting_with(1),
    );

    assert_eq!(result.code.unwrap(), 0);
    assert_eq!(
        result.stdout,
        "$ make apply-env ENV=dev REGION=us-east-1 AUTO_APPROVE=true\n"
    );
    assert!(result.calls.is_empty());
}

#[rstest]
#[case(&["--dry-run", "env", "destroy"])]
#[case(&["--dry-run", "env", "output"])]
#[case(&["--dry-run", "docs", "status"])]
fn given_dry_run_when_run_any_verb_then_never_spawns(#[case] args: &[&str]) {
    let repo = repo_with_docs();
    let result = run(
        args,
        repo.path().to_path_buf(),
        RecordingCommandRunner::exiting_with(9),
    );

    assert_eq!(result.code.unwrap(), 0);
    assert!(result.calls.is_empty());
    assert!(result.stdout.starts_with("$ "));
}

#[test]
fn given_print_only_when_run_docs_open_then_prints_path_without_spawning() {
    let repo = repo_with_docs();
    let result = run(
        &["docs", "open", "--name", "Quick Start", "--print-only"],
        repo.path().to_path_buf(),
        RecordingCommandRunner::default(),
    );

    assert_eq!(result.code.unwrap(), 0);
    let expected = repo.path().join("docs/QuickStart.md");
    assert_eq!(result.stdout, format!("{}\n", expected.display()));
    assert!(result.calls.is_empty());
}

#[test]
fn given_docs_open_when_run_then_prints_path_and_pages() {
    let repo = repo_with_docs();
    let result = run(
        &["docs", "open", "--name", "quick start"],
        repo.path().to_path_buf(),
        RecordingCommandRunner::default(),
    );

    let expected = repo.path().join("docs/QuickStart.md");
    assert_eq!(result.code.unwrap(), 0);
    assert_eq!(result.stdout, format!("{}\n", expected.display()));
    assert_eq!(
        result.calls,
        vec![vec!["less".to_string(), expected.to_string_lossy().into_owned()]]
    );
}

#[test]
fn given_failing_pager_when_run_docs_open_then_propagates_code() {
    let repo = repo_with_docs();
    let result = run(
        &["docs", "open", "--name", "quick start"],
        repo.path().to_path_buf(),
        RecordingCommandRunner::exiting_with(3),
    );

    assert_eq!(result.code.unwrap(), 3);
    assert_eq!(result.calls.len(), 1);
}

#[test]
fn given_unknown_document_when_run_docs_open_then_fails_without_spawning() {
    let repo = repo_with_docs();
    let result = run(
        &["docs", "open", "--name", "does not exist"],
        repo.path().to_path_buf(),
        RecordingCommandRunner::default(),
    );

    let err = result.code.unwrap_err();
    assert_eq!(err.exit_code(), exitcode::NOINPUT);
    assert!(result.calls.is_empty());
    assert!(result.stdout.is_empty());
}

#[test]
fn given_failing_make_when_run_env_apply_then_exit_code_is_propagated() {
    let result = run(
        &["env", "apply"],
        PathBuf::from("/repo"),
        RecordingCommandRunner::exiting_with(2),
    );

    assert_eq!(result.code.unwrap(), 2);
    assert_eq!(
        result.calls,
        vec![vec!["make", "apply-env", "ENV=dev", "REGION=us-east-1"]]
    );
}

#[test]
fn given_missing_make_when_run_then_command_not_found_exit() {
    let result = run(
        &["env", "plan"],
        PathBuf::from("/repo"),
        RecordingCommandRunner::failing_with(std::io::ErrorKind::NotFound),
    );

    let err = result.code.unwrap_err();
    assert_eq!(err.exit_code(), exitcode::COMMAND_NOT_FOUND);
    assert_eq!(err.to_string(), "command not found: make");
}

#[test]
fn given_docs_list_when_run_then_prints_registry() {
    let result = run(
        &["docs", "list"],
        PathBuf::from("/repo"),
        RecordingCommandRunner::default(),
    );

    assert_eq!(result.code.unwrap(), 0);
    assert_eq!(result.stdout.lines().count(), 4);
    assert!(result
        .stdout
        .lines()
        .any(|l| l.starts_with("quick start") && l.ends_with("docs/QuickStart.md")));
    assert!(result.calls.is_empty());
}

// ============================================================
// config init
// ============================================================

#[test]
fn given_existing_config_when_init_without_force_then_refuses() {
    let repo = TempDir::new().unwrap();
    let path = repo.path().join(".argoeks.toml");
    fs::write(&path, "make = \"gmake\"\n").unwrap();
    let container = ServiceContainer::with_deps(
        Settings {
            repo_root: repo.path().to_path_buf(),
            ..Settings::default()
        },
        Arc::new(RealFileSystem),
        Arc::new(RecordingCommandRunner::default()),
    );

    let err = init_config(&container, &path, false).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert_eq!(fs::read_to_string(&path).unwrap(), "make = \"gmake\"\n");

    init_config(&container, &path, true).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), Settings::template());
}

#[test]
fn given_missing_parent_when_init_then_creates_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/argoeks/argoeks.toml");
    let container = ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(RealFileSystem),
        Arc::new(RecordingCommandRunner::default()),
    );

    init_config(&container, &path, false).unwrap();

    assert!(path.is_file());
}

// ============================================================
// config show / completion output
// ============================================================

/// Writer whose reader has gone away
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn container_at(repo_root: PathBuf) -> ServiceContainer {
    ServiceContainer::with_deps(
        Settings {
            repo_root,
            ..Settings::default()
        },
        Arc::new(RealFileSystem),
        Arc::new(RecordingCommandRunner::default()),
    )
}

#[test]
fn given_config_show_when_run_then_writes_effective_toml() {
    let container = container_at(PathBuf::from("/repo"));
    let mut out = Vec::new();

    let code = handle_config(&ConfigCommands::Show, &container, &mut out).unwrap();

    assert_eq!(code, exitcode::OK);
    let rendered = String::from_utf8(out).unwrap();
    let parsed: Settings = toml::from_str(&rendered).expect("valid TOML");
    assert_eq!(parsed.make, "make");
    assert_eq!(parsed.repo_root, PathBuf::from("/repo"));
}

#[test]
fn given_closed_stdout_when_config_show_then_io_error() {
    let container = container_at(PathBuf::from("/repo"));

    let err = handle_config(&ConfigCommands::Show, &container, &mut ClosedPipe).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::IOERR);
}

#[rstest]
#[case(Shell::Bash)]
#[case(Shell::Zsh)]
#[case(Shell::Fish)]
fn given_shell_when_print_completions_then_writes_script(#[case] shell: Shell) {
    let mut out = Vec::new();

    print_completions(shell, &mut out).unwrap();

    let script = String::from_utf8(out).unwrap();
    assert!(script.contains("argoeks"));
}

#[test]
fn given_closed_stdout_when_print_completions_then_io_error() {
    let err = print_completions(Shell::Bash, &mut ClosedPipe).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::IOERR);
}
