// src/main.rs

use anyhow::Result;
use bitbucket::cli::{fields_to_map, Cli, Commands, HookCommand, RepoCommand};
use bitbucket::config::ConfigBuilder;
#[cfg(feature = "progress")]
use bitbucket::progress::IndicatifProgress;
use bitbucket::progress::ProgressReporter;
use bitbucket::repository::ArchiveOptions;
use bitbucket::transport::{Body, Response};
use bitbucket::Session;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging. Default to 'info' if RUST_LOG is not set.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                if cfg!(debug_assertions) {
                    "bitbucket=debug".parse()?
                } else {
                    "bitbucket=info".parse()?
                },
            ),
        )
        .init();

    log::debug!("Starting bitbucket v{}...", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = ConfigBuilder::from_cli(&cli.global).build()?;
    log::debug!("Configuration built successfully: {:?}", config);

    let mut session = Session::new(&config)?;
    if matches!(cli.command, Commands::Repo(RepoCommand::Archive { .. })) {
        if let Some(progress) = progress_reporter() {
            session = session.with_progress(progress);
        }
    }

    match run(&session, cli.command) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Runs one command. Returns whether the API reported success.
fn run(session: &Session, command: Commands) -> Result<bool> {
    match command {
        Commands::Repo(command) => run_repo(session, command),
        Commands::Hook(command) => run_hook(session, command),
    }
}

fn run_repo(session: &Session, command: RepoCommand) -> Result<bool> {
    let repos = session.repositories();
    match command {
        RepoCommand::Public { user } => print_response(repos.list_public(user.as_deref())?),
        RepoCommand::List => print_json(&repos.list_own()?).map(|_| true),
        RepoCommand::Projects => print_json(&repos.list_projects()?).map(|_| true),
        RepoCommand::Get { slug } => print_response(repos.get(slug.as_deref())?),
        RepoCommand::Create { slug, fields } => {
            print_response(repos.create(&slug, fields_to_map(fields))?)
        }
        RepoCommand::Update { slug, fields } => {
            print_response(repos.update(slug.as_deref(), fields_to_map(fields))?)
        }
        RepoCommand::Delete { slug } => print_response(repos.delete(slug.as_deref())?),
        RepoCommand::Archive {
            slug,
            format,
            prefix,
        } => {
            let options = ArchiveOptions::new().format(format).prefix(prefix);
            let outcome = repos.archive(slug.as_deref(), &options)?;
            let (ok, message) = outcome.into_pair();
            if ok {
                println!("{}", message);
            } else {
                eprintln!("{}", message);
            }
            Ok(ok)
        }
    }
}

fn run_hook(session: &Session, command: HookCommand) -> Result<bool> {
    let hooks = session.webhooks();
    let response = match command {
        HookCommand::List { slug } => hooks.list_all(slug.as_deref())?,
        HookCommand::Get { id, slug } => hooks.get(&id, slug.as_deref())?,
        HookCommand::Create {
            service_type,
            slug,
            fields,
        } => hooks.create(&service_type, slug.as_deref(), fields_to_map(fields))?,
        HookCommand::Update { id, slug, fields } => {
            hooks.update(&id, slug.as_deref(), fields_to_map(fields))?
        }
        HookCommand::Delete { id, slug } => hooks.delete(&id, slug.as_deref())?,
    };
    print_response(response)
}

/// Decides whether to show a progress bar. Show it if stderr is a TTY.
fn progress_reporter() -> Option<Arc<dyn ProgressReporter>> {
    #[cfg(feature = "progress")]
    {
        if atty::is(atty::Stream::Stderr) {
            return Some(Arc::new(IndicatifProgress::new()));
        }
        None
    }
    #[cfg(not(feature = "progress"))]
    {
        None
    }
}

/// Prints a response body to stdout (errors to stderr). Returns the success flag.
fn print_response(response: Response) -> Result<bool> {
    let (ok, body) = response.into_parts();
    let rendered = match body {
        Body::Json(value) => serde_json::to_string_pretty(&value)?,
        Body::Text(text) => text,
        Body::Bytes(bytes) => {
            std::io::stdout().write_all(&bytes)?;
            return Ok(ok);
        }
        Body::Empty => return Ok(ok),
    };
    if ok {
        println!("{}", rendered);
    } else {
        eprintln!("{}", rendered);
    }
    Ok(ok)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
