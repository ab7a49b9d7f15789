use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use field_protocols::homomorphic::Operation;
use field_protocols::toolkit::{RandomnessSettings, Request, Toolkit, ToolkitConfig};
use num_bigint::BigUint;
use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "field-protocols")]
#[command(about = "Finite-field cryptographic protocol toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config/toolkit.toml)
    #[arg(short, long, env = "TOOLKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Use deterministic randomness from this seed
    #[arg(long, env = "TOOLKIT_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute JSON requests from a file or stdin
    Run {
        /// Request file; a single request object or an array of them
        file: Option<PathBuf>,
    },

    /// Run a built-in demonstration
    Demo {
        #[arg(value_enum)]
        protocol: DemoKind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DemoKind {
    Sharing,
    HomomorphicAdd,
    HomomorphicMultiply,
    Schnorr,
    Commitment,
}

impl DemoKind {
    fn request(self) -> Request {
        let big = |v: u32| BigUint::from(v);
        match self {
            DemoKind::Sharing => Request::SharingDemo {
                secret: big(42),
                n: 5,
                k: 3,
            },
            DemoKind::HomomorphicAdd => Request::HomomorphicDemo {
                kind: Operation::Addition,
                values: vec![big(10), big(20)],
            },
            DemoKind::HomomorphicMultiply => Request::HomomorphicDemo {
                kind: Operation::Multiplication,
                values: vec![big(4), big(5)],
            },
            DemoKind::Schnorr => Request::SchnorrDemo { x: None },
            DemoKind::Commitment => Request::CommitmentDemo { message: big(42) },
        }
    }
}

fn load_config(cli: &Cli) -> ToolkitConfig {
    let loaded = match &cli.config {
        Some(path) => ToolkitConfig::from_file(path),
        None => ToolkitConfig::from_env(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        error!("Failed to load configuration: {e}");
        info!("Using default configuration");
        ToolkitConfig::default()
    });
    if let Some(seed) = cli.seed {
        config.randomness = RandomnessSettings::seeded(seed);
    }
    config
}

fn read_input(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn execute_json(toolkit: &mut Toolkit, request: Value) -> Value {
    match serde_json::from_value(request) {
        Ok(request) => execute(toolkit, request),
        Err(e) => json!({ "error": format!("Malformed request: {e}") }),
    }
}

/// Executes one request, turning failures into an `{"error": ...}` object.
fn execute(toolkit: &mut Toolkit, request: Request) -> Value {
    let operation = request.operation();
    match toolkit.handle(request) {
        Ok(reply) => serde_json::to_value(reply)
            .unwrap_or_else(|e| json!({ "error": format!("Failed to encode reply: {e}") })),
        Err(e) => {
            error!(operation, "{e}");
            json!({ "operation": operation, "error": e.to_string() })
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = load_config(&cli);
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {e}");
        return Err(format!("Invalid configuration: {e}").into());
    }
    let mut toolkit = Toolkit::new(config)?;

    let output = match &cli.command {
        Commands::Run { file } => {
            let input = read_input(file.as_ref())?;
            match serde_json::from_str::<Value>(&input)? {
                Value::Array(requests) => Value::Array(
                    requests
                        .into_iter()
                        .map(|request| execute_json(&mut toolkit, request))
                        .collect(),
                ),
                request => execute_json(&mut toolkit, request),
            }
        }
        Commands::Demo { protocol } => execute(&mut toolkit, protocol.request()),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
