//! REST Engine command-line entry point.
//!
//! Executes a request described in a JSON file and prints the normalized
//! response as JSON on stdout. Logs go to stderr, controlled by `RUST_LOG`.

use clap::{Args, Parser, Subcommand};
use log::{debug, error};
use rest_engine::config::{load_config, load_config_file};
use rest_engine::environment::load_environment_file;
use rest_engine::{EngineConfig, EngineError, Environment, HttpMethod, Request, RequestEngine, Storage};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Execute declarative HTTP requests
#[derive(Parser, Debug)]
#[command(name = "rest-engine", version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a request and print the response
    Run(RunArgs),

    /// List the supported HTTP methods
    Methods,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Path to the request JSON file
    #[arg(short, long, value_name = "FILE")]
    request: PathBuf,

    /// Path to an environment JSON file
    #[arg(short, long, value_name = "FILE", conflicts_with = "env_id")]
    env: Option<PathBuf>,

    /// Id of a stored environment (requires a storage directory)
    #[arg(long, value_name = "ID")]
    env_id: Option<String>,

    /// Base directory of stored collections and environments
    #[arg(long, value_name = "DIR", env = "REST_ENGINE_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Path to a settings file with a "rest-engine" section
    #[arg(short, long, value_name = "FILE", env = "REST_ENGINE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Methods => Ok(json!(HttpMethod::all()
            .iter()
            .map(HttpMethod::as_str)
            .collect::<Vec<_>>())),
    };

    match result {
        Ok(output) => print_json(&output),
        Err(e) => {
            error!("{}", e);
            print_json(&json!({
                "code": e.status_code(),
                "kind": e.kind(),
                "message": e.to_string(),
            }));
            process::exit(1);
        }
    }
}

async fn run(args: RunArgs) -> Result<serde_json::Value, EngineError> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => load_config(None)?,
    };
    if args.storage_dir.is_some() {
        config.storage_dir = args.storage_dir.clone();
    }

    let request = load_request(&args.request)?;
    let environment = load_environment(&args, &config)?;
    debug!(
        "Loaded request '{}' with environment '{}'",
        request.name,
        environment.as_ref().map(|e| e.name.as_str()).unwrap_or("-")
    );

    let engine = RequestEngine::new(&config)?;
    let response = engine.execute(&request, environment.as_ref()).await?;

    Ok(serde_json::to_value(response)?)
}

fn load_request(path: &Path) -> Result<Request, EngineError> {
    let content = fs::read_to_string(path).map_err(|source| EngineError::Storage {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn load_environment(args: &RunArgs, config: &EngineConfig) -> Result<Option<Environment>, EngineError> {
    if let Some(path) = &args.env {
        return load_environment_file(path).map(Some);
    }

    match &args.env_id {
        Some(id) => Storage::from_config(config)?.environments().load(id).map(Some),
        None => Ok(None),
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}
