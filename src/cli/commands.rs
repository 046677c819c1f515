//! Command handlers: build the command record and carry it out

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::Dispatch;
use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands, DocsCommands, EnvCommands, TargetArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Defaults, Settings};
use crate::domain::{Action, DocsAction, EnvAction, Invocation, RunFlags, Target};
use crate::exitcode;
use crate::infrastructure::{InfraError, ServiceContainer};

/// Run the parsed command line and return the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    match &cli.command {
        Commands::Completion { shell } => {
            print_completions(*shell, &mut io::stdout().lock())?;
            Ok(exitcode::OK)
        }
        Commands::Config { command } => {
            let settings = Settings::load(cli.repo_root.as_deref())?;
            handle_config(
                command,
                &ServiceContainer::new(settings),
                &mut io::stdout().lock(),
            )
        }
        Commands::Env { .. } | Commands::Docs { .. } => {
            let settings = Settings::load(cli.repo_root.as_deref())?;
            let container = ServiceContainer::new(settings);
            let invocation = build_invocation(cli, &container.settings.defaults)?;
            run_invocation(&container, &invocation, &mut io::stdout().lock())
        }
    }
}

/// Build the command record for `env` / `docs`; omitted values come from `defaults`.
pub fn build_invocation(cli: &Cli, defaults: &Defaults) -> CliResult<Invocation> {
    let action = match &cli.command {
        Commands::Env { command } => Action::Env(env_action(command, defaults)?),
        Commands::Docs { command } => Action::Docs(docs_action(command)?),
        other => {
            return Err(CliError::Internal(format!(
                "no dispatch for command: {other:?}"
            )))
        }
    };
    Ok(Invocation::new(
        action,
        RunFlags::new(cli.dry_run, cli.verbose),
    ))
}

fn env_action(command: &EnvCommands, defaults: &Defaults) -> CliResult<EnvAction> {
    Ok(match command {
        EnvCommands::Plan(args) => EnvAction::Plan(target(args, defaults)?),
        EnvCommands::Apply {
            target: args,
            auto_approve,
        } => EnvAction::Apply {
            target: target(args, defaults)?,
            auto_approve: *auto_approve,
        },
        EnvCommands::Destroy(args) => EnvAction::Destroy(target(args, defaults)?),
        EnvCommands::Output { env } => EnvAction::Output {
            env: value_or("--env", env.as_deref(), &defaults.env)?,
        },
    })
}

fn target(args: &TargetArgs, defaults: &Defaults) -> CliResult<Target> {
    Ok(Target::new(
        value_or("--env", args.env.as_deref(), &defaults.env)?,
        value_or("--region", args.region.as_deref(), &defaults.region)?,
    ))
}

fn docs_action(command: &DocsCommands) -> CliResult<DocsAction> {
    Ok(match command {
        DocsCommands::Status => DocsAction::Status,
        DocsCommands::Open { name, print_only } => DocsAction::Open {
            name: value_or("--name", Some(name.as_str()), "")?,
            print_only: *print_only,
        },
        DocsCommands::List => DocsAction::List,
    })
}

fn value_or(flag: &str, value: Option<&str>, default: &str) -> CliResult<String> {
    let value = value.unwrap_or(default);
    if value.trim().is_empty() {
        return Err(CliError::InvalidArgs(format!("{flag} must not be empty")));
    }
    Ok(value.to_string())
}

/// Carry out an invocation, writing echoes and paths to `out`.
#[instrument(level = "debug", skip(container, out))]
pub fn run_invocation<W: Write>(
    container: &ServiceContainer,
    invocation: &Invocation,
    out: &mut W,
) -> CliResult<i32> {
    let dispatch = container.dispatcher().dispatch(&invocation.action)?;
    debug!("run_invocation: {:?}", dispatch);

    match dispatch {
        Dispatch::Run(line) => Ok(container.runner().execute(&line, invocation.flags, out)?),
        Dispatch::Print(path) => {
            writeln!(out, "{}", path.display())
                .map_err(|e| InfraError::io("write document path", e))?;
            Ok(exitcode::OK)
        }
        Dispatch::Page { path, command } => {
            writeln!(out, "{}", path.display())
                .map_err(|e| InfraError::io("write document path", e))?;
            let code = container.runner().execute(&command, invocation.flags, out)?;
            if code != exitcode::OK {
                output::warning(&format!(
                    "{} exited with {}, file path printed above",
                    command.program(),
                    code
                ));
            }
            Ok(code)
        }
        Dispatch::List(entries) => {
            for entry in entries {
                writeln!(out, "{:<20} {}", entry.name, entry.path.display())
                    .map_err(|e| InfraError::io("write document list", e))?;
            }
            Ok(exitcode::OK)
        }
    }
}

/// Handle `config` subcommands; `config show` writes to `out`.
pub fn handle_config<W: Write>(
    command: &ConfigCommands,
    container: &ServiceContainer,
    out: &mut W,
) -> CliResult<i32> {
    let settings = &container.settings;
    match command {
        ConfigCommands::Show => {
            write!(out, "{}", settings.to_toml()?)
                .map_err(|e| InfraError::io("write config", e))?;
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::path_status("global", &path),
                None => output::warning("no global config directory on this platform"),
            }
            output::path_status("repo", &settings.local_config_path());
            println!("repo_root: {}", settings.repo_root.display());
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| ApplicationError::Config {
                    message: "cannot determine global config directory".into(),
                })?
            } else {
                settings.local_config_path()
            };
            init_config(container, &path, *force)?;
            output::written("Created", &path);
        }
    }
    Ok(exitcode::OK)
}

/// Write the config template to `path`; an existing file is kept unless `force`.
pub fn init_config(container: &ServiceContainer, path: &Path, force: bool) -> CliResult<()> {
    if container.fs.exists(path) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    container
        .fs
        .ensure_parent(path)
        .with_path_context("create config directory", path)?;
    container
        .fs
        .write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}

/// Write the completion script for `shell` to `out`.
///
/// The script is rendered into a buffer first: the generator panics when its
/// writer fails.
pub fn print_completions<W: Write>(shell: Shell, out: &mut W) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut script = Vec::new();
    generate(shell, &mut cmd, name, &mut script);
    out.write_all(&script)
        .and_then(|()| out.flush())
        .map_err(|e| InfraError::io("write completion script", e))?;
    Ok(())
}
