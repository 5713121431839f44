//! Command-line runner for the ABMS node.
//!
//! Runs a single operation against the configured ABMS instance and prints
//! the resulting item batch as JSON on stdout. Logs go to stderr.

mod config;

use abms_integration::ReqwestHttpClient;
use abms_node::{AbmsNode, Field, credential, node_description};
use clap::{Parser, Subcommand};
use crate::config::CliConfig;
use serde_json::{Map, Value as JsonValue};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ABMS - call the ABMS web service the way the workflow node does
#[derive(Parser)]
#[command(name = "abms")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one operation
    Run {
        /// Operation name (e.g. login, query, retrieve)
        operation: String,

        /// Session name obtained through login
        #[arg(long)]
        session_name: Option<String>,

        /// Element type (module name)
        #[arg(long)]
        element_type: Option<String>,

        /// Element as JSON text
        #[arg(long)]
        element: Option<String>,

        /// Webservice record id
        #[arg(long)]
        id: Option<String>,

        /// Query text
        #[arg(long)]
        query: Option<String>,
    },

    /// Print the node description
    Describe,

    /// Print the credential descriptor
    Credential,
}

/// Builds the resolved parameter object the node reads for its first item.
fn parameters(operation: String, values: [(Field, Option<String>); 5]) -> JsonValue {
    let mut map = Map::new();
    map.insert("operation".to_string(), JsonValue::String(operation));
    for (field, value) in values {
        if let Some(value) = value {
            map.insert(field.parameter_name().to_string(), JsonValue::String(value));
        }
    }
    JsonValue::Object(map)
}

fn print_json(value: &impl serde::Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize output");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Describe => print_json(&node_description()),
        Commands::Credential => print_json(&credential::descriptor()),
        Commands::Run {
            operation,
            session_name,
            element_type,
            element,
            id,
            query,
        } => {
            let config = match CliConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load configuration");
                    return ExitCode::FAILURE;
                }
            };
            tracing::info!(host = %config.abms.host, "Loaded configuration");

            let client = match ReqwestHttpClient::new(config.http.timeout()) {
                Ok(client) => client,
                Err(report) => {
                    tracing::error!(error = %report, "failed to build http client");
                    return ExitCode::FAILURE;
                }
            };

            let node = AbmsNode::new(client, config.abms.credential());
            let params = parameters(
                operation,
                [
                    (Field::SessionName, session_name),
                    (Field::ElementType, element_type),
                    (Field::Element, element),
                    (Field::WebserviceId, id),
                    (Field::Query, query),
                ],
            );

            match node.run(&[params]).await {
                Ok(batch) => print_json(&batch.to_json()),
                Err(report) => {
                    tracing::error!(error = %report, "operation failed");
                    eprintln!("{}", report.current_context());
                    ExitCode::FAILURE
                }
            }
        }
    }
}
