use std::collections::HashSet;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use newswatch::extraction::NerClient;
use newswatch::feeds::{default_feeds, load_feeds_file};
use newswatch::pipeline::{Enricher, LocationResolver};
use newswatch::{
    ArticleRepository, Config, FeedFetcher, GeocodeCache, NominatimClient, OpenAiProvider,
    Pipeline, PipelineConfig, RssTransport, SqliteStore,
};

#[derive(Parser, Debug)]
#[command(name = "newswatch")]
#[command(version = "0.1.0")]
#[command(about = "Ingest news feeds, categorize threats, and geocode locations")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one ingestion/enrichment pass over the configured feeds
    Run {
        /// Database path for storing articles
        #[arg(long)]
        database: Option<String>,

        /// JSON file with feed descriptors (defaults to the curated list)
        #[arg(long)]
        feeds: Option<String>,
    },

    /// Query stored articles for the presentation layer
    Query {
        /// Comma-separated dominant categories to keep (all if omitted)
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,

        /// Minimum overall risk score
        #[arg(long, default_value = "0.0")]
        min_risk: f32,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Print the distinct category set instead of articles
        #[arg(long)]
        list_categories: bool,

        /// Database path
        #[arg(long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("newswatch=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    match args.command {
        Command::Run { database, feeds } => run_pipeline(database, feeds).await,
        Command::Query {
            categories,
            min_risk,
            format,
            list_categories,
            database,
        } => query_articles(categories, min_risk, &format, list_categories, database),
    }
}

async fn run_pipeline(database: Option<String>, feeds_file: Option<String>) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let database_path = database.unwrap_or_else(|| config.database_path.clone());

    let feeds = match feeds_file {
        Some(path) => load_feeds_file(path)?,
        None => default_feeds(),
    };
    tracing::info!("Monitoring {} feeds", feeds.len());

    let store = SqliteStore::new(&database_path)?;
    let cache = GeocodeCache::load(&config.geocode_cache_path);
    let pipeline_config = PipelineConfig::from(&config);

    let fetcher = FeedFetcher::new(
        RssTransport::new()?,
        feeds,
        pipeline_config.fetch_concurrency,
        pipeline_config.per_feed_cap,
    );
    let enricher = Enricher::new(
        OpenAiProvider::new(config.openai_api_key.clone(), Some(config.openai_model.clone()))?,
        pipeline_config.enrich_delay_ms,
    );
    let resolver = LocationResolver::new(
        NerClient::new(config.ner_endpoint.clone())?,
        NominatimClient::new()?,
    );

    let mut pipeline = Pipeline::new(
        fetcher,
        enricher,
        resolver,
        store,
        cache,
        config.geocode_cache_path.clone().into(),
    );

    let summary = pipeline.run().await?;
    tracing::info!(
        "Run complete: {} fetched, {} new, {} persisted",
        summary.fetched,
        summary.new_items,
        summary.persisted
    );

    Ok(())
}

fn query_articles(
    categories: Vec<String>,
    min_risk: f32,
    format: &str,
    list_categories: bool,
    database: Option<String>,
) -> anyhow::Result<()> {
    let database_path = database
        .or_else(|| std::env::var("DATABASE_PATH").ok())
        .unwrap_or_else(|| "articles.db".to_string());
    let store = SqliteStore::new(&database_path)?;

    if list_categories {
        for category in store.distinct_categories()? {
            println!("{}", category);
        }
        return Ok(());
    }

    let filter: Option<HashSet<String>> = if categories.is_empty() {
        None
    } else {
        Some(categories.into_iter().collect())
    };

    let articles = store.query(filter.as_ref(), min_risk)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&articles)?),
        _ => {
            for article in &articles {
                println!(
                    "{:<19} {:<16} {:.2}  {}",
                    article.pub_date.chars().take(19).collect::<String>(),
                    article.dominant_category(),
                    article.overall_risk_score,
                    article.title
                );
            }
            println!("\n{} article(s)", articles.len());
        }
    }

    Ok(())
}
