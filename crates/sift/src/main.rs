use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use sift_models::{ResearchRecord, SentimentRecord, SiftConfig};
use sift_store::SignalStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sift", about = "Market research and sentiment signals from chat-completion APIs")]
struct Cli {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "config/sift.toml")]
    config: String,

    /// Override the signal file path from config
    #[arg(short, long)]
    output: Option<String>,

    /// Print the structured record as pretty JSON
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up recent news for a topic (not persisted)
    News {
        topic: String,
        /// Override the configured news model
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Research a symbol in depth and record the signal
    Research {
        symbol: String,
        /// Override the configured research model
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Analyze market sentiment for a symbol and record the signal
    Sentiment {
        symbol: String,
        /// Override the configured sentiment model
        #[arg(short, long)]
        model: Option<String>,
        /// Skip appending the signal to the store
        #[arg(long)]
        no_store: bool,
    },
    /// List recorded signals
    Signals {
        /// Show only the most recent N signals
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn load_config(path: &str) -> Result<SiftConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content).with_context(|| format!("Failed to parse config: {path}"))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SiftConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config: {path}")),
    }
}

fn print_sentiment(record: &SentimentRecord) {
    println!("Subject:        {}", record.subject);
    println!("Sentiment:      {}", record.sentiment);
    println!("Confidence:     {:.2}", record.confidence);
    println!("Recommendation: {}", record.recommendation);
    println!("Risk level:     {}", record.risk_level);
    println!("Summary:        {}", record.summary);
    if !record.key_factors.is_empty() {
        println!("Key factors:");
        for factor in &record.key_factors {
            println!("  - {factor}");
        }
    }
    print_citations(&record.citations);
}

fn print_research(record: &ResearchRecord) {
    println!("{}", record.answer);
    print_citations(&record.citations);
}

fn print_citations(citations: &[String]) {
    if !citations.is_empty() {
        println!("Sources:");
        for url in citations {
            println!("  - {url}");
        }
    }
}

fn print_json<T: serde::Serialize>(record: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let signals_path = cli
        .output
        .clone()
        .unwrap_or_else(|| config.store.signals_path.clone());
    let store = SignalStore::new(&signals_path);

    match cli.command {
        Command::News { topic, model } => {
            let mut models = config.models.clone();
            if let Some(model) = model {
                models.news_model = model;
            }
            let api_key = sift::resolve_api_key(&config.gateway)?;
            let gateway = sift::build_gateway(&config.gateway, api_key)?;

            let record = sift::run_news(gateway.as_ref(), &models, &topic).await?;
            print_research(&record);
            if cli.pretty {
                print_json(&record, true)?;
            }
        }
        Command::Research { symbol, model } => {
            let mut models = config.models.clone();
            if let Some(model) = model {
                models.research_model = model;
            }
            let api_key = sift::resolve_api_key(&config.gateway)?;
            let gateway = sift::build_gateway(&config.gateway, api_key)?;

            let record = sift::run_research(gateway.as_ref(), &models, &symbol).await?;
            print_research(&record);
            if cli.pretty {
                print_json(&record, true)?;
            }

            let count = store
                .append(&record.into())
                .context("Failed to record signal")?;
            println!("Recorded research signal ({count} signals total)");
        }
        Command::Sentiment {
            symbol,
            model,
            no_store,
        } => {
            let mut models = config.models.clone();
            if let Some(model) = model {
                models.sentiment_model = model;
            }
            let api_key = sift::resolve_api_key(&config.gateway)?;
            let gateway = sift::build_gateway(&config.gateway, api_key)?;

            let record = sift::run_sentiment(gateway.as_ref(), &models, &symbol).await?;
            print_sentiment(&record);
            if cli.pretty {
                print_json(&record, true)?;
            }

            if !no_store {
                let count = store
                    .append(&record.into())
                    .context("Failed to record signal")?;
                println!("Recorded sentiment signal ({count} signals total)");
            }
        }
        Command::Signals { limit } => {
            let entries = store.entries().context("Failed to read signal file")?;
            let total = entries.len();
            let shown: Vec<&Value> = match limit {
                Some(n) => entries.iter().rev().take(n).rev().collect(),
                None => entries.iter().collect(),
            };

            for entry in &shown {
                let recorded_at = entry
                    .get("recorded_at")
                    .and_then(Value::as_str)
                    .unwrap_or("<no timestamp>");
                let label = entry
                    .get("subject")
                    .or_else(|| entry.get("query"))
                    .and_then(Value::as_str)
                    .unwrap_or("<unknown>");
                let detail = entry
                    .get("sentiment")
                    .and_then(Value::as_str)
                    .map(|s| format!("sentiment={s}"))
                    .unwrap_or_else(|| "research".to_string());
                println!("{recorded_at}  {label}  {detail}");
            }
            println!("{total} signals total ({})", signals_path);
        }
    }

    Ok(())
}
