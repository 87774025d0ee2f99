mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stockwatch_classifier::Classifier;
use stockwatch_core::RendererKind;
use stockwatch_render::RenderOptions;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stockwatch-cli")]
#[command(about = "Classify product page availability and price")]
struct Cli {
    /// YAML rules file merged into the built-in domain table
    /// (overrides `STOCKWATCH_RULES_PATH`)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify a saved HTML page without touching the network
    Classify {
        /// Path to the saved HTML
        #[arg(long)]
        file: PathBuf,
        /// URL the page was captured from; selects the domain rules
        #[arg(long)]
        url: Option<String>,
    },
    /// Render a live product URL and classify it
    Check {
        url: String,
        /// Rendering backend (defaults to `STOCKWATCH_RENDERER`)
        #[arg(long)]
        renderer: Option<RendererKind>,
    },
    /// Print the effective domain rule table as YAML
    Rules,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Server and renderer settings are only read by `check`.
    let offline = stockwatch_core::load_offline_config();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(offline.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let rules_path = cli.rules.or_else(|| offline.rules_path.clone());
    let rules = stockwatch_core::load_rule_table(rules_path.as_deref())?;

    match cli.command {
        Commands::Classify { file, url } => {
            let classifier = Classifier::new(rules.into());
            let report = commands::run_classify(&classifier, &file, url.as_deref())?;
            commands::print_json(&report)?;
        }
        Commands::Check { url, renderer } => {
            let config = stockwatch_core::load_app_config_from_env()?;
            let classifier = Classifier::new(rules.into());
            let kind = renderer.unwrap_or(config.renderer);
            let options = RenderOptions::from_app_config(&config);
            let report = commands::run_check(&classifier, kind, options, &url).await?;
            commands::print_json(&report)?;
        }
        Commands::Rules => {
            print!("{}", commands::render_rules(&rules)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
