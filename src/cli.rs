// src/cli.rs

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

/// Command-line client for the Bitbucket API.
///
/// Manages repositories (list, create, update, delete, export as a zip archive)
/// and the webhooks/services registered on them. Credentials and the default
/// repository can come from flags or from `BITBUCKET_*` environment variables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Root of the REST API.
    #[arg(long, global = true, env = "BITBUCKET_API_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Account username; also the owner used in repository URLs.
    #[arg(short = 'u', long, global = true, env = "BITBUCKET_USERNAME")]
    pub username: Option<String>,

    /// Password or app password for basic authentication.
    #[arg(
        short = 'p',
        long,
        global = true,
        env = "BITBUCKET_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Bearer access token (instead of --password).
    #[arg(long, global = true, env = "BITBUCKET_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository slug used when a command is given none.
    #[arg(
        short = 'r',
        long = "repo",
        global = true,
        env = "BITBUCKET_REPO",
        value_name = "SLUG"
    )]
    pub repo_slug: Option<String>,

    /// Abort `repo archive` on the first failed download instead of archiving the error.
    #[arg(long, global = true, action = clap::ArgAction::SetTrue)]
    pub fail_fast: bool,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Repository operations.
    #[command(subcommand)]
    Repo(RepoCommand),
    /// Webhook (service) operations.
    #[command(subcommand)]
    Hook(HookCommand),
}

#[derive(Subcommand, Debug)]
pub enum RepoCommand {
    /// List a user's public repositories.
    Public {
        /// Defaults to --username.
        user: Option<String>,
    },
    /// List your repositories, following every page.
    List,
    /// List the projects your repositories belong to.
    Projects,
    /// Show one repository.
    Get { slug: Option<String> },
    /// Create a repository.
    Create {
        slug: String,
        /// Repository field, repeatable (e.g. -F is_private=true).
        #[arg(short = 'F', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Update a repository.
    Update {
        slug: Option<String>,
        /// Repository field, repeatable.
        #[arg(short = 'F', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Delete a repository. There is no confirmation and no undo.
    Delete { slug: Option<String> },
    /// Download a repository's files and pack them into a zip archive.
    Archive {
        slug: Option<String>,
        /// Accepted for compatibility; a zip archive is always produced.
        #[arg(long, default_value = "zip")]
        format: String,
        /// Path prefix prepended to every entry in the archive.
        #[arg(long, default_value = "")]
        prefix: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HookCommand {
    /// List the services registered on a repository.
    List { slug: Option<String> },
    /// Show one service.
    Get { id: String, slug: Option<String> },
    /// Register a service of the given type (e.g. POST, Email).
    Create {
        service_type: String,
        slug: Option<String>,
        /// Service field, repeatable (e.g. -F URL=https://ci.example.com/hook).
        #[arg(short = 'F', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Update a service.
    Update {
        id: String,
        slug: Option<String>,
        /// Service field, repeatable.
        #[arg(short = 'F', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Delete a service. There is no confirmation and no undo.
    Delete { id: String, slug: Option<String> },
}

/// Parses a `KEY=VALUE` field. The value is read as JSON when it parses, else as a string.
pub fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty field name in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Collects parsed fields into a JSON object. Later duplicates win.
pub fn fields_to_map(fields: Vec<(String, Value)>) -> Map<String, Value> {
    fields.into_iter().collect()
}
