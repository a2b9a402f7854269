use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use guitar_catalog::models::{ChannelId, ChannelQuery, ChannelSorting, UserId};
use guitar_catalog::presentation::{truncate_channel, truncate_identification, truncate_resolved};
use guitar_catalog::{Catalog, Config};

#[derive(Parser)]
#[command(name = "guitar-catalog")]
#[command(version, about = "Guitar YouTube channel identification and programming grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to the first of guitar-catalog.toml,
    /// config/guitar-catalog.toml, /etc/guitar-catalog/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding channels, suggestions, predictions and terms
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog channels one page at a time
    Channels {
        /// subscribers, views, video-count, founded or title
        #[arg(long, default_value = "subscribers")]
        sort_by: ChannelSorting,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long, default_value_t = 20)]
        take: usize,
        /// Only channels in this language, e.g. `en`
        #[arg(long)]
        language: Option<String>,
    },
    /// Show one listed channel
    Channel {
        channel_id: String,
    },
    /// Print the number of listed channels
    Count,
    /// List the languages present in the catalog
    Languages,
    /// Identify a channel from a URL, handle or channel id
    Identify {
        url_hint: String,
    },
    /// Print the weekly programming grid
    Grid {
        #[arg(long)]
        min_gradient: Option<f64>,
    },
    /// Print the publish prediction of one channel
    Prediction {
        channel_id: String,
        #[arg(long)]
        min_gradient: Option<f64>,
        /// Only keep slots above the channel's average activity
        #[arg(long)]
        filter_below_average: bool,
    },
    /// Suggest a channel for the catalog
    Suggest {
        channel_id: String,
        /// Suggesting user
        #[arg(short, long)]
        user: String,
    },
    /// Resolve suggested channels for review
    Review {
        #[arg(required = true)]
        channel_ids: Vec<String>,
        #[arg(short, long)]
        user: String,
    },
    /// Serve the HTTP API
    #[cfg(feature = "api")]
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_logging(verbose: bool, level: &str) {
    let default_filter = if verbose {
        "guitar_catalog=debug,info".to_string()
    } else {
        format!("guitar_catalog={},warn", level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };
    if let Some(data_dir) = cli.data_dir {
        config.store.data_dir = data_dir;
    }

    init_logging(cli.verbose, &config.logging.level);
    info!("🎸 Guitar catalog starting");
    tracing::debug!("{}", config.summary());

    let max_chars = config.presentation.description_max_chars;
    let default_gradient = config.predictions.min_gradient;
    let default_filter = config.predictions.filter_below_average;
    let catalog = Catalog::open(config).await?;

    match cli.command {
        Commands::Channels {
            sort_by,
            skip,
            take,
            language,
        } => {
            let query = ChannelQuery {
                sort_by,
                skip,
                take,
                language,
            };
            let channels: Vec<_> = catalog
                .browser()
                .channels(&query)
                .await?
                .into_iter()
                .map(|channel| truncate_channel(channel, max_chars))
                .collect();
            print_json(&channels)?;
        }

        Commands::Channel { channel_id } => {
            match catalog
                .browser()
                .channel(&ChannelId::from(channel_id.as_str()))
                .await?
            {
                Some(channel) => print_json(&truncate_channel(channel, max_chars))?,
                None => warn!("⚠️ Channel {} is not listed", channel_id),
            }
        }

        Commands::Count => {
            println!("{}", catalog.browser().channel_count().await?);
        }

        Commands::Languages => {
            print_json(&catalog.browser().languages().await?)?;
        }

        Commands::Identify { url_hint } => {
            let identification = catalog.identifier().identify(&url_hint).await?;
            print_json(&truncate_identification(identification, max_chars))?;
        }

        Commands::Grid { min_gradient } => {
            let mut grid = catalog
                .predictions()
                .weekly_programming_grid(min_gradient.unwrap_or(default_gradient))
                .await?;
            grid.sort_by_key(|entry| entry.weekstamp);
            print_json(&grid)?;
        }

        Commands::Prediction {
            channel_id,
            min_gradient,
            filter_below_average,
        } => {
            let view = catalog
                .predictions()
                .single_channel_prediction(
                    &ChannelId::from(channel_id.as_str()),
                    min_gradient.unwrap_or(default_gradient),
                    filter_below_average || default_filter,
                )
                .await?;

            match view {
                Some(view) => print_json(&view)?,
                None => warn!("⚠️ No prediction above the gradient threshold for {}", channel_id),
            }
        }

        Commands::Suggest { channel_id, user } => {
            catalog
                .suggestions()
                .suggest_channel(ChannelId::from(channel_id.as_str()), &UserId::new(user))
                .await?;
            info!("✅ Suggested {}", channel_id);
        }

        Commands::Review { channel_ids, user } => {
            let ids: Vec<ChannelId> = channel_ids.into_iter().map(ChannelId::from).collect();
            let user = UserId::new(user);
            let resolved = catalog
                .suggestions()
                .channel_suggestions(&ids, Some(&user))
                .await?
                .ok_or_else(|| anyhow!("A user is required to review suggestions"))?;

            let resolved: Vec<_> = resolved
                .into_iter()
                .map(|channel| truncate_resolved(channel, max_chars))
                .collect();
            print_json(&resolved)?;
        }

        #[cfg(feature = "api")]
        Commands::Serve { port } => {
            let port = port.unwrap_or(catalog.config().api.port);
            guitar_catalog::api::server::start_http_server(std::sync::Arc::new(catalog), port).await?;
        }
    }

    Ok(())
}
