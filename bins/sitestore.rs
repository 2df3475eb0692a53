use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use models::{AboutSection, AuditMeta, FeaturedData, ProfileData, Project, SiteSection};
use serde_json::Value;
use service::{AuditOutcome, SiteStore, DEFAULT_AUDIT_LIMIT};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "sitestore", version, about = "Read and write site sections and the admin audit log")]
struct Cli {
    /// Emit logs as JSON lines instead of compact text
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a section as JSON (null when unset)
    Get { key: String },
    /// Overwrite a section from inline JSON or a file
    Set {
        key: String,
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        json: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Append an entry to the audit log
    Log {
        action: String,
        /// JSON object attached to the entry
        #[arg(long)]
        meta: Option<String>,
    },
    /// Print the most recent audit entries, newest first
    Audit {
        #[arg(long, default_value_t = DEFAULT_AUDIT_LIMIT)]
        limit: usize,
    },
    /// Show the selected backend and check that it is reachable
    Doctor,
}

fn init_logging(json: bool) {
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
    info!(service = "sitestore", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    // .env first so RUST_LOG and the store variables apply
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let run_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "sitestore", event = "panic", %run_id, message = %info, "unhandled panic occurred");
    }));

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "sitestore", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "sitestore", event = "command_failed", %run_id, error = %format!("{e:#}"), "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load_and_validate()?;
    service::runtime::ensure_env(&cfg).await?;
    let store = SiteStore::from_config(&cfg);

    match command {
        Command::Get { key } => {
            let value = store.sections().get(&key, Value::Null).await.into_inner();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Set { key, json, file } => {
            let text = match (json, file) {
                (Some(json), _) => json,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("cannot read {}", path.display()))?,
                (None, None) => return Err(anyhow!("provide JSON inline or with --file")),
            };
            let value: Value = serde_json::from_str(&text).context("value is not valid JSON")?;
            check_shape(&key, &value)?;
            store.sections().set(&key, &value).await?;
            info!(key = %key, "section updated");
        }
        Command::Log { action, meta } => {
            let meta = meta.as_deref().map(parse_meta).transpose()?;
            match store.audit().log(&action, meta).await {
                AuditOutcome::Recorded(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
                AuditOutcome::Dropped { reason, .. } => return Err(anyhow!("audit entry dropped: {reason}")),
            }
        }
        Command::Audit { limit } => {
            let entries = store.audit().recent(limit).await.into_inner();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Doctor => doctor(&store).await?,
    }
    Ok(())
}

/// Known sections must deserialize into their typed shape before they are stored.
fn check_shape(key: &str, value: &Value) -> anyhow::Result<()> {
    let Some(section) = SiteSection::from_key(key) else { return Ok(()) };
    let v = value.clone();
    let res = match section {
        SiteSection::Profile => serde_json::from_value::<ProfileData>(v).map(drop),
        SiteSection::Featured => serde_json::from_value::<FeaturedData>(v).map(drop),
        SiteSection::Projects => serde_json::from_value::<Vec<Project>>(v).map(drop),
        SiteSection::About => serde_json::from_value::<Vec<AboutSection>>(v).map(drop),
    };
    res.with_context(|| format!("value does not match the {key} section"))
}

fn parse_meta(text: &str) -> anyhow::Result<AuditMeta> {
    match serde_json::from_str::<Value>(text).context("--meta is not valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow!("--meta must be a JSON object")),
    }
}

async fn doctor(store: &SiteStore) -> anyhow::Result<()> {
    println!("mode: {}", store.mode().as_str());
    println!("sections backend: {}", store.sections().backend_name());
    println!("audit backend: {}", store.audit().backend_name());
    if let Some(client) = store.remote_client() {
        println!("remote endpoint: {}", client.endpoint_hint());
        client.ping().await.context("remote store did not answer PING")?;
        println!("remote ping: ok");
    }
    Ok(())
}
