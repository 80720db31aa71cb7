use afc_review::{ReviewConfig, ReviewService, validation::parse_review_update};
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::json;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "review", about = "Flashcard review queue", version)]
struct Cli {
    /// User whose review states are read or changed
    #[arg(long, global = true)]
    user: Option<Uuid>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database if needed and apply migrations
    Migrate,

    /// Cards to study next
    Queue {
        /// Limit to one deck
        #[arg(long)]
        deck: Option<Uuid>,
    },

    /// Rate a card and/or set its status
    Rate {
        /// Card being reviewed
        card: Uuid,
        /// One of again, hard, good, easy
        rating: Option<String>,
        /// One of new, known, review
        #[arg(long)]
        status: Option<String>,
    },

    /// Restore review states to their defaults
    Reset {
        /// Limit to one deck
        #[arg(long)]
        deck: Option<Uuid>,
    },

    /// Number of cards per last rating
    Distribution {
        /// Limit to one deck
        #[arg(long)]
        deck: Option<Uuid>,
    },

    /// Create review states for every starter-deck card
    Bootstrap,

    /// Create missing review states for the cards of a deck
    Backfill {
        #[arg(long)]
        deck: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ReviewConfig::from_env().context("failed to load configuration")?;
    afc_review::tracing::init_tracing(&config.env);

    if let Command::Migrate = cli.command {
        afc_db::connect_and_migrate(&config.database_url, config.db_max_connections).await?;
        tracing::info!("Migrations applied");
        return Ok(());
    }

    let pool = afc_db::create_pool(&config.database_url, config.db_max_connections).await?;

    let service = ReviewService::new(pool);
    let user_arg = cli.user;
    let user = move || user_arg.context("--user is required for this command");
    let now = Utc::now();

    let output = match cli.command {
        // Handled before connecting
        Command::Migrate => return Ok(()),
        Command::Queue { deck } => json!({ "results": service.queue(user()?, deck, now).await? }),
        Command::Rate {
            card,
            rating,
            status,
        } => {
            let update = parse_review_update(rating.as_deref(), status.as_deref())?;
            json!(service.rate_card(user()?, card, update, now).await?)
        }
        Command::Reset { deck } => json!(service.reset(user()?, deck, now).await?),
        Command::Distribution { deck } => json!(service.distribution(user()?, deck).await?),
        Command::Bootstrap => json!({ "created": service.bootstrap_user(user()?, now).await? }),
        Command::Backfill { deck } => {
            json!({ "created": service.backfill_deck(user()?, deck, now).await? })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
