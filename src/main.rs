//! automcp CLI entrypoint
//! Parses command-line arguments and dispatches to the generator.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use automcp::core::descriptor::load_descriptors;
use automcp::core::templates::{EnvTemplateConfigReader, export_skeleton};
use automcp::{Config, GeneratorOptions, ServiceName, Skeleton, TemplateInstantiator};
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "automcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate an MCP server from a JSON list of endpoint descriptors
    Generate {
        /// Service name (letters, numbers, hyphens, underscores)
        #[arg(long)]
        name: Option<String>,
        /// Path to the JSON endpoint descriptors
        #[arg(long)]
        tools: Option<PathBuf>,
        /// Custom skeleton directory (overrides config and AUTOMCP_TEMPLATE_DIR)
        #[arg(long)]
        template_dir: Option<PathBuf>,
        /// Directory generated servers are placed under (default: servers)
        #[arg(long)]
        servers_root: Option<PathBuf>,
        /// YAML or TOML file with generation settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fail when two descriptors share a name
        #[arg(long)]
        reject_duplicates: bool,
        /// Write the resolved settings to this YAML or TOML file
        #[arg(long)]
        save_config: Option<PathBuf>,
    },
    /// Manage the built-in server skeleton
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum TemplateCommands {
    /// Write the embedded skeleton to a directory for customization
    Export {
        /// Destination directory
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            name,
            tools,
            template_dir,
            servers_root,
            config,
            reject_duplicates,
            save_config,
        } => {
            let config = resolve_config(GenerateArgs {
                name,
                tools,
                template_dir,
                servers_root,
                config,
                reject_duplicates,
            })
            .await?;
            if let Some(path) = save_config {
                config
                    .save(&path)
                    .await
                    .with_context(|| format!("Failed to save config file {}", path.display()))?;
                info!(path = %path.display(), "Saved generation settings");
            }
            generate_server(config).await?;
        }
        Commands::Template { action } => match action {
            TemplateCommands::Export { output } => {
                let count = export_skeleton(&output)
                    .await
                    .context("Failed to export embedded skeleton")?;
                info!(
                    output_dir = %output.display(),
                    file_count = count,
                    "Exported embedded skeleton"
                );
            }
        },
    }
    Ok(())
}

struct GenerateArgs {
    name: Option<String>,
    tools: Option<PathBuf>,
    template_dir: Option<PathBuf>,
    servers_root: Option<PathBuf>,
    config: Option<PathBuf>,
    reject_duplicates: bool,
}

/// Merge the optional config file with command-line flags; flags win
async fn resolve_config(args: GenerateArgs) -> anyhow::Result<Config> {
    let base = match &args.config {
        Some(path) => Some(
            Config::from_file(path)
                .await
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
        ),
        None => None,
    };

    let service_name = args
        .name
        .or_else(|| base.as_ref().map(|c| c.service_name.clone()))
        .context("A service name is required (--name or service_name in the config file)")?;
    let tools_path = args
        .tools
        .or_else(|| base.as_ref().map(|c| c.tools_path.clone()))
        .context("A descriptor file is required (--tools or tools_path in the config file)")?;

    let mut config = base.unwrap_or_else(|| Config::new(&service_name, &tools_path));
    config.service_name = service_name;
    config.tools_path = tools_path;
    if let Some(root) = args.servers_root {
        config.servers_root = root;
    }
    if args.template_dir.is_some() {
        config.template_dir = args.template_dir;
    }
    config.reject_duplicate_names |= args.reject_duplicates;
    Ok(config)
}

/// Generate an MCP server from the resolved configuration
async fn generate_server(config: Config) -> anyhow::Result<()> {
    let service = ServiceName::new(&config.service_name).context("Invalid service name")?;

    let endpoints = load_descriptors(&config.tools_path)
        .await
        .with_context(|| {
            format!(
                "Failed to load endpoint descriptors from {}",
                config.tools_path.display()
            )
        })?;
    if endpoints.is_empty() {
        warn!(tools = %config.tools_path.display(), "No API endpoints found");
        anyhow::bail!("No API endpoints found in {}", config.tools_path.display());
    }
    info!(count = endpoints.len(), "Loaded endpoint descriptors");

    let skeleton = Skeleton::resolve(config.template_dir.as_deref(), &EnvTemplateConfigReader);
    let instantiator =
        TemplateInstantiator::new(service, &config.servers_root).with_options(GeneratorOptions {
            reject_duplicate_names: config.reject_duplicate_names,
        });

    let report = instantiator
        .instantiate(&skeleton, &endpoints)
        .await
        .context("Failed to generate MCP server")?;

    info!(
        output_path = %report.output_dir.display(),
        tools = report.tools,
        "Successfully generated MCP server"
    );
    info!(
        "To run it: cd {} && npm i && npm run build && npm start -- --sse",
        report.output_dir.display()
    );
    Ok(())
}
