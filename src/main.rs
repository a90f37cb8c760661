use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use suarify_mcp::config::{env_vars, find_config_file, load_config, Config};
use suarify_mcp::mcp::server::McpServer;
use suarify_mcp::mcp::ToolRegistry;
use suarify_mcp::upstream::UpstreamClient;
use suarify_mcp::utils::{init_logging, OutputGuard};

/// Suarify MCP - expose the Suarify voice-calling API to AI agents over MCP
#[derive(Parser, Debug)]
#[command(name = "suarify-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for the Suarify voice-calling and lead-management API", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines (always on stderr)
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server over stdio (default)
    Serve,

    /// Print the tool catalogue as JSON
    Tools {
        /// Include the deprecated unprefixed tool names
        #[arg(long)]
        legacy: bool,
    },

    /// Call one tool and print the result envelope as JSON
    Call {
        /// Tool name, e.g. suarify_list_leads
        tool: String,

        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Show recognized environment variables
    Env,
}

fn print_env_vars() {
    eprintln!("Environment variables:");
    for (name, description) in env_vars() {
        let state = if std::env::var_os(&name).is_some() {
            "set"
        } else {
            "unset"
        };
        eprintln!("  {:<30} {} [{}]", name, description, state);
    }
}

fn build_registry(config: &Config, legacy: bool) -> Result<ToolRegistry> {
    let client = UpstreamClient::new(config).context("Failed to create upstream client")?;
    Ok(ToolRegistry::catalogue(&client, legacy))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet, cli.log_json);

    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(ref path) = config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let config = load_config(config_path.as_deref())?;

    for warning in config.validate()? {
        tracing::error!("{}", warning);
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let registry = build_registry(&config, config.legacy_tool_names)?;
            tracing::info!(
                base_url = %config.base_url,
                tools = registry.len(),
                "Running MCP server in stdio mode"
            );
            McpServer::new(registry).run().await?;
        }

        Commands::Tools { legacy } => {
            let server = McpServer::new(build_registry(&config, legacy)?);
            OutputGuard::stdio().write_frame(&json!({ "tools": server.tool_infos() }))?;
        }

        Commands::Call { tool, args } => {
            let args: Value =
                serde_json::from_str(&args).context("Arguments must be valid JSON")?;
            let registry = build_registry(&config, true)?;
            let envelope = registry.execute(&tool, args).await?;

            OutputGuard::stdio().write_frame(&envelope)?;
            if envelope.is_error {
                std::process::exit(1);
            }
        }

        Commands::Env => print_env_vars(),
    }

    Ok(())
}
