use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pine_levels::config::AppConfig;
use pine_levels::data::Theme;
use pine_levels::levels::{generate_levels, LevelSet};
use pine_levels::quote::completion::CompletionClient;
use pine_levels::quote::{PriceSource, StaticPriceSource};
use pine_levels::session::ChatSession;
use pine_levels::ErrorHandler;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "pine-levels", version, about = "Square-root price levels as TradingView Pine Script")]
struct Cli {
    /// TOML config file (default pine_levels.toml). Environment variables and .env override it.
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build levels from a known price, no network
    Levels {
        #[arg(long)]
        price: f64,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        json: bool,
    },
    /// Ask the quote API for a price, then build levels
    Quote {
        symbol: String,
        #[arg(long)]
        json: bool,
    },
    /// Interactive chat; /clear resets, /quit exits
    Chat {
        /// Answer every symbol with this price instead of calling the API
        #[arg(long)]
        offline_price: Option<f64>,
    },
    /// Show or change the saved theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

const DEFAULT_CONFIG_PATH: &str = "pine_levels.toml";

fn load_config(path: &str) -> Result<AppConfig> {
    let config = if Path::new(path).exists() {
        AppConfig::from_file(path)?
    } else {
        AppConfig::from_env()?
    };
    Ok(config)
}

fn init_logging(level: &str) -> Result<()> {
    let level: Level = level
        .parse()
        .with_context(|| format!("invalid log level: {}", level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn print_levels(levels: &LevelSet, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(levels)?);
    } else {
        print!("{}", levels.script);
    }
    Ok(())
}

async fn run_chat(source: &dyn PriceSource) -> Result<()> {
    let mut session = ChatSession::new();
    println!("{}", session.messages()[0].content);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("{}", session.messages()[0].content);
                continue;
            }
            _ => {}
        }

        let reply = session.submit(source, &line).await;
        println!("{}", reply.content);
        if let Some(script) = &reply.script {
            println!();
            print!("{}", script);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut config = load_config(config_path)?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    init_logging(&config.logging.level)?;

    match cli.command {
        Command::Levels { price, symbol, json } => match generate_levels(price, &symbol) {
            Ok(levels) => print_levels(&levels, json)?,
            Err(e) => anyhow::bail!(ErrorHandler::user_message(&e)),
        },
        Command::Quote { symbol, json } => {
            config.validate_for_quotes()?;
            let client = CompletionClient::new(&config.quote)?;
            let levels = client
                .fetch_approx_price(&symbol)
                .await
                .and_then(|price| generate_levels(price, &symbol));
            match levels {
                Ok(levels) => print_levels(&levels, json)?,
                Err(e) => anyhow::bail!(ErrorHandler::user_message(&e)),
            }
        }
        Command::Chat { offline_price } => match offline_price {
            Some(price) => run_chat(&StaticPriceSource::price(price)).await?,
            None => {
                config.validate_for_quotes()?;
                let client = CompletionClient::new(&config.quote)?;
                run_chat(&client).await?;
            }
        },
        Command::Theme { action } => {
            let theme = match action {
                None => {
                    println!("{}", config.ui.theme);
                    return Ok(());
                }
                Some(ThemeAction::Light) => Theme::Light,
                Some(ThemeAction::Dark) => Theme::Dark,
                Some(ThemeAction::Toggle) => config.ui.theme.toggled(),
            };
            AppConfig::save_theme(config_path, theme)?;
            info!("Saved theme {} to {}", theme, config_path);
            println!("{}", theme);
        }
    }

    Ok(())
}
