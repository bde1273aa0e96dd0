use anyhow::Result;
use clap::Parser;
use dso_scope::brain::{Brain, IntelBrain};
use dso_scope::config::Config;
use dso_scope::console;
use dso_scope::error::Error;
use dso_scope::llm::{LlmClient, Provider};
use dso_scope::output;
use dso_scope::session::ResearchSession;
use dso_scope::views::detail::{DetailView, resolve_selection};
use dso_scope::views::matrix::MatrixView;
use std::path::PathBuf;

/// CLI override for LLM provider/model.
struct LlmOverride {
    provider: Provider,
    model: String,
}

fn make_llm_override(provider: Option<String>, model: Option<String>) -> Option<LlmOverride> {
    if provider.is_none() && model.is_none() {
        return None;
    }
    let provider = provider
        .map(|p| Provider::parse(&p))
        .unwrap_or_default();
    let model = model.unwrap_or_else(|| match &provider {
        Provider::Anthropic => "claude-sonnet-4-5-20250929".into(),
        _ => "arcee-ai/trinity-large-preview:free".into(),
    });
    Some(LlmOverride { provider, model })
}

/// Build the production brain from config + optional CLI override.
fn build_brain(config: &Config, llm_override: Option<&LlmOverride>) -> Result<IntelBrain> {
    let provider = llm_override
        .map(|o| o.provider.clone())
        .unwrap_or_else(|| config.llm.provider.clone());
    let model = llm_override
        .map(|o| o.model.clone())
        .unwrap_or_else(|| config.llm.model.clone());
    let llm = LlmClient::from_config(
        provider,
        model,
        config.llm.max_tokens,
        config.llm.api_key_env.clone(),
        config.llm.base_url.clone(),
        config.backend.timeout(),
        config.backend.max_retries,
    )?;
    Ok(IntelBrain::new(
        config.markets.available.clone(),
        llm,
        config.backend.timeout(),
    ))
}

#[derive(Parser)]
#[command(
    name = "dso-scope",
    about = "DSO market intelligence — competitive matrix, competitor deep dives, research chat"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the competitive matrix for a market
    Matrix {
        /// Target DMA (defaults to the configured market)
        #[arg(short, long)]
        market: Option<String>,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Dump raw competitor records as JSON instead of the table
        #[arg(long)]
        json: bool,

        /// LLM provider override: anthropic, openrouter, openai
        #[arg(long)]
        provider: Option<String>,

        /// LLM model override
        #[arg(long)]
        model: Option<String>,
    },

    /// Deep dive on one competitor
    Details {
        /// Competitor name (defaults to the market leader)
        competitor: Option<String>,

        /// Target DMA (defaults to the configured market)
        #[arg(short, long)]
        market: Option<String>,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// LLM provider override: anthropic, openrouter, openai
        #[arg(long)]
        provider: Option<String>,

        /// LLM model override
        #[arg(long)]
        model: Option<String>,
    },

    /// Ask the research agent a one-shot question
    Chat {
        prompt: String,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// LLM provider override: anthropic, openrouter, openai
        #[arg(long)]
        provider: Option<String>,

        /// LLM model override
        #[arg(long)]
        model: Option<String>,
    },

    /// Interactive navigation console (matrix, details, research lab)
    Console {
        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// LLM provider override: anthropic, openrouter, openai
        #[arg(long)]
        provider: Option<String>,

        /// LLM model override
        #[arg(long)]
        model: Option<String>,
    },

    /// Write the HTML dashboard for a market
    Render {
        /// Target DMA (defaults to the configured market)
        #[arg(short, long)]
        market: Option<String>,

        /// Output path for the dashboard HTML
        #[arg(short, long, default_value = "dso-dashboard.html")]
        output: PathBuf,

        /// Include a deep-dive section for this competitor
        #[arg(long)]
        competitor: Option<String>,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// LLM provider override: anthropic, openrouter, openai
        #[arg(long)]
        provider: Option<String>,

        /// LLM model override
        #[arg(long)]
        model: Option<String>,
    },
}

fn load_config(path: &PathBuf) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)?
    } else {
        Config::default()
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dso_scope=info".parse().unwrap()),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Matrix {
            market,
            config,
            json,
            provider,
            model,
        } => {
            let cfg = load_config(&config)?;
            let brain = build_brain(&cfg, make_llm_override(provider, model).as_ref())?;
            let market = market.unwrap_or_else(|| cfg.markets.default.clone());
            let records = brain.market_matrix(&market).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                console::print_matrix(&MatrixView::build(&market, &records));
            }
            Ok(())
        }
        Command::Details {
            competitor,
            market,
            config,
            provider,
            model,
        } => {
            let cfg = load_config(&config)?;
            let brain = build_brain(&cfg, make_llm_override(provider, model).as_ref())?;
            let market = market.unwrap_or_else(|| cfg.markets.default.clone());
            let records = brain.market_matrix(&market).await?;

            let record = match competitor.as_deref() {
                Some(name) => records
                    .iter()
                    .find(|r| r.dso_name == name)
                    .ok_or_else(|| Error::not_found(&market, name))?,
                None => match resolve_selection(None, &records) {
                    Some(record) => record,
                    None => {
                        println!("No competitors available in {market}.");
                        return Ok(());
                    }
                },
            };

            let detail = brain.competitor_details(&market, &record.dso_name).await?;
            console::print_detail(&DetailView::build(&market, record, &detail));
            Ok(())
        }
        Command::Chat {
            prompt,
            config,
            provider,
            model,
        } => {
            let cfg = load_config(&config)?;
            let brain = build_brain(&cfg, make_llm_override(provider, model).as_ref())?;
            let mut session = ResearchSession::new();
            session
                .submit(&brain, &prompt, |transcript| {
                    if let Some(message) = transcript.last() {
                        println!("{}: {}", message.role, message.content);
                    }
                })
                .await;
            Ok(())
        }
        Command::Console {
            config,
            provider,
            model,
        } => {
            let cfg = load_config(&config)?;
            let brain = build_brain(&cfg, make_llm_override(provider, model).as_ref())?;
            console::run(&brain, &cfg).await
        }
        Command::Render {
            market,
            output,
            competitor,
            config,
            provider,
            model,
        } => {
            let cfg = load_config(&config)?;
            let brain = build_brain(&cfg, make_llm_override(provider, model).as_ref())?;
            let market = market.unwrap_or_else(|| cfg.markets.default.clone());
            let records = brain.market_matrix(&market).await?;
            let matrix = MatrixView::build(&market, &records);

            let detail_view = match competitor.as_deref() {
                Some(name) => {
                    let record = records
                        .iter()
                        .find(|r| r.dso_name == name)
                        .ok_or_else(|| Error::not_found(&market, name))?;
                    let detail = brain.competitor_details(&market, name).await?;
                    Some(DetailView::build(&market, record, &detail))
                }
                None => None,
            };

            let html = output::render_dashboard(&matrix, detail_view.as_ref())?;
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, &html)?;

            println!(
                "Dashboard rendered: {} ({} competitors)",
                output.display(),
                records.len()
            );
            Ok(())
        }
    }
}
