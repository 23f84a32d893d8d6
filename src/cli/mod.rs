pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "waste-collection-api")]
#[command(about = "Waste collection API - server, migrations and token tooling")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Mint a signed access token for local testing")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Report a completed command. In JSON mode the fields of `data` are
    /// merged into the envelope next to `message`.
    pub fn success(&self, message: &str, data: Value) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => {
                let mut response = json!({ "success": true, "message": message });
                if let (Some(envelope), Value::Object(fields)) = (response.as_object_mut(), data) {
                    envelope.extend(fields);
                }
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            OutputFormat::Text => println!("✓ {}", message),
        }
        Ok(())
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        Some(Commands::Migrate) => commands::migrate::handle(output_format).await,
        Some(Commands::Token(args)) => commands::token::handle(args, output_format),
    }
}
