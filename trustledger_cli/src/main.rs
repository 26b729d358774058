mod commands;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use trustledger_api::{Client, ClientConfig, Jar, Method};

use crate::commands::call::{BodyArgs, CallOptions, PathArgs};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "trustledger")]
#[command(about = "Call the trust-ledger REST API")]
struct Cli {
    /// API root, e.g. https://ledger.example.com/api (defaults to TRUSTLEDGER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Output format: pretty, json or table
    #[arg(long, default_value = "pretty", global = true)]
    output: String,

    /// Cookie to send, as NAME=VALUE (repeatable)
    #[arg(long = "cookie", global = true)]
    cookies: Vec<String>,

    /// CSRF token, stored as the csrftoken cookie
    #[arg(long, global = true, env = "TRUSTLEDGER_CSRF_TOKEN")]
    csrf_token: Option<String>,

    /// Header override, as NAME:VALUE (repeatable)
    #[arg(long = "header", global = true)]
    headers: Vec<String>,

    /// Give up after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a resource
    Get(PathArgs),
    /// POST a JSON body
    Post(BodyArgs),
    /// PUT a JSON body
    Put(BodyArgs),
    /// PATCH a JSON body
    Patch(BodyArgs),
    /// DELETE a resource
    Delete(PathArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trustledger=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "table" => OutputFormat::Table,
        _ => OutputFormat::Pretty,
    };

    let mut config = ClientConfig::from_env();
    if let Some(ref base_url) = cli.base_url {
        config = ClientConfig {
            base_url: ClientConfig::new(base_url).base_url,
            ..config
        };
    }
    let client = Client::with_config(config, Arc::new(Jar::default()))
        .context("failed to build API client")?;

    for cookie in &cli.cookies {
        commands::call::validate_cookie(cookie)?;
        client.add_cookie(cookie)?;
    }
    if let Some(ref token) = cli.csrf_token {
        client.add_cookie(&format!("csrftoken={}", token))?;
    }

    let opts = CallOptions {
        headers: cli.headers.clone(),
        timeout: cli.timeout,
    };

    let (method, path, data) = match &cli.command {
        Commands::Get(args) => (Method::GET, &args.path, None),
        Commands::Delete(args) => (Method::DELETE, &args.path, None),
        Commands::Post(args) => (Method::POST, &args.path, args.data.as_deref()),
        Commands::Put(args) => (Method::PUT, &args.path, args.data.as_deref()),
        Commands::Patch(args) => (Method::PATCH, &args.path, args.data.as_deref()),
    };
    commands::call::run(method, path, data, &client, &opts, &format).await?;

    Ok(())
}
