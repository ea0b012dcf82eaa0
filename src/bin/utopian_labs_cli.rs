//! utopian-labs CLI: 智能体运行 API 的命令行工具
//!
//! Usage:
//!   utopian-labs-cli me                           Check the configured API key
//!   utopian-labs-cli get <run-id> [--agent <a>]   Fetch a run
//!   utopian-labs-cli create <file.json|->         Start a run
//!   utopian-labs-cli validate <file.json|->       Validate a run request offline

use anyhow::{bail, Context};
use serde_json::Value;
use std::io::Read;
use tracing_subscriber::EnvFilter;
use utopian_labs::types::{AgentKind, GetRunRequest, RunRequest};
use utopian_labs::UtopianLabs;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "me" => cmd_me().await,
        "get" => cmd_get(&args[2..]).await,
        "create" => cmd_create(&args[2..]).await,
        "validate" => cmd_validate(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"utopian-labs-cli: Utopian Labs 智能体运行命令行工具

USAGE:
    utopian-labs-cli <COMMAND> [OPTIONS]

COMMANDS:
    me                          Check the API key and show the organization
    get <run-id> [--agent <a>]  Fetch a run and print it as JSON
    create <file.json|->        Validate and start a run from a JSON request
    validate <file.json|->      Validate a JSON run request without sending it
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    UTOPIAN_LABS_API_KEY        API key (the OS keyring is checked first)
    UTOPIAN_LABS_BASE_URL       API base URL
    UTOPIAN_LABS_API_VERSION    API version segment
    RUST_LOG                    Log filter (default: warn)"#
    );
}

fn cmd_version() {
    println!("utopian-labs-cli {}", env!("CARGO_PKG_VERSION"));
}

async fn cmd_me() -> anyhow::Result<()> {
    let client = UtopianLabs::from_env()?;
    let me = client.me().await?;
    print_json(&serde_json::to_value(&me)?)
}

async fn cmd_get(args: &[String]) -> anyhow::Result<()> {
    let Some(run) = args.first().filter(|a| !a.starts_with("--")) else {
        bail!("usage: get <run-id> [--agent <agent>]");
    };
    let mut params = GetRunRequest::new(run.as_str());
    if let Some(agent) = flag_value(args, "--agent") {
        params = params.with_agent(agent.parse::<AgentKind>()?);
    }

    let client = UtopianLabs::from_env()?;
    let body = client.agents().runs().get(&params).await?;
    print_json(&body)
}

async fn cmd_create(args: &[String]) -> anyhow::Result<()> {
    let input = read_input(args)?;
    let client = UtopianLabs::from_env()?;
    let created = client.agents().runs().create(&input).await?;
    print_json(&serde_json::to_value(&created)?)
}

fn cmd_validate(args: &[String]) -> anyhow::Result<()> {
    let input = read_input(args)?;
    match RunRequest::from_value(&input) {
        Ok(request) => {
            eprintln!("✓ valid {} request", request.agent());
            print_json(&serde_json::to_value(&request)?)
        }
        Err(report) => {
            for issue in report.issues() {
                eprintln!("✗ {issue}");
            }
            bail!("{} validation issue(s)", report.len());
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Reads JSON from the file named by the first argument, or stdin for `-`.
fn read_input(args: &[String]) -> anyhow::Result<Value> {
    let Some(source) = args.first() else {
        bail!("expected a JSON file path or '-' for stdin");
    };
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {source}"))?
    };
    serde_json::from_str(&raw).with_context(|| format!("parsing JSON from {source}"))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
