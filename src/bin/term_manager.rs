use anyhow::Result;
use clap::{Parser, Subcommand};
use guitar_catalog::guitar::{is_guitar_channel, GuitarTermDictionary, TermCategory};
use guitar_catalog::models::ChannelRecord;
use guitar_catalog::store::file::TERMS_FILE;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "term-manager")]
#[command(about = "Guitar term dictionary management utility")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in vocabulary to the terms file
    Init {
        /// Overwrite an existing terms file
        #[arg(long)]
        force: bool,
    },
    /// List all terms by category
    List,
    /// Get dictionary statistics
    Stats,
    /// Add a term
    Add {
        term: String,
        /// Category header (instruments, gear, techniques, genres, general)
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// Remove a term from every category
    Remove {
        term: String,
    },
    /// Check whether a title and description would classify as guitar content
    Check {
        title: String,
        #[arg(default_value = "")]
        description: String,
    },
}

const CATEGORIES: [TermCategory; 5] = [
    TermCategory::Instruments,
    TermCategory::Gear,
    TermCategory::Techniques,
    TermCategory::Genres,
    TermCategory::General,
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let terms_path = cli.data_dir.join(TERMS_FILE);

    match cli.command {
        Commands::Init { force } => {
            if terms_path.exists() && !force {
                warn!("⚠️ {} already exists, use --force to overwrite", terms_path.display());
                return Ok(());
            }
            tokio::fs::create_dir_all(&cli.data_dir).await?;
            let dictionary = GuitarTermDictionary::with_default_terms();
            dictionary.save(&terms_path).await?;
            info!("✅ Wrote {} terms to {}", dictionary.len(), terms_path.display());
        }

        Commands::List => {
            let dictionary = GuitarTermDictionary::from_file(&terms_path).await?;
            if dictionary.is_empty() {
                info!("📭 No terms in {}", terms_path.display());
                return Ok(());
            }

            for category in &CATEGORIES {
                let terms = dictionary.get_terms(category);
                if !terms.is_empty() {
                    info!("[{}] {}", category.header(), terms.join(", "));
                }
            }
        }

        Commands::Stats => {
            let dictionary = GuitarTermDictionary::from_file(&terms_path).await?;
            info!("📊 {}", dictionary.get_stats().summary());
        }

        Commands::Add { term, category } => {
            let mut dictionary = GuitarTermDictionary::from_file(&terms_path).await?;
            if dictionary.add_term(TermCategory::from_header(&category), &term) {
                tokio::fs::create_dir_all(&cli.data_dir).await?;
                dictionary.save(&terms_path).await?;
                info!("✅ Added term: {}", term);
            } else {
                warn!("⚠️ Term already present: {}", term);
            }
        }

        Commands::Remove { term } => {
            let mut dictionary = GuitarTermDictionary::from_file(&terms_path).await?;
            if dictionary.remove_term(&term) {
                dictionary.save(&terms_path).await?;
                info!("🗑️ Removed term: {}", term);
            } else {
                warn!("⚠️ Term not found: {}", term);
            }
        }

        Commands::Check { title, description } => {
            let dictionary = GuitarTermDictionary::from_file(&terms_path).await?;
            let channel = ChannelRecord::new("", title, description);
            if is_guitar_channel(&dictionary.classification_terms(), &channel) {
                info!("🎸 Guitar channel");
            } else {
                info!("🚫 Not a guitar channel");
            }
        }
    }

    Ok(())
}
