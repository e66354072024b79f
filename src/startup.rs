use crate::cli::{Cli, Command};
use crate::components::completion::{
    event_list_schema, HttpCompletionClient, Orchestrator,
};
use crate::components::feed::{CachedFeed, HttpFeedFetcher};
use crate::components::storage::{StorageActor, StorageActorHandle};
use crate::components::tools::{register_event_tools, ToolRegistry};
use crate::config::Config;
use crate::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// The wired-up application core
pub struct App {
    pub feed: CachedFeed,
    pub orchestrator: Orchestrator,
    storage: StorageActorHandle,
}

impl App {
    /// Build the core from config: storage actor, feed fetcher, cache,
    /// tool registry with the event tools, and the completion orchestrator
    pub fn build(config: &Config) -> miette::Result<Self> {
        let tz = config.tz()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        // Spawn the storage actor
        let (mut storage_actor, storage) = StorageActor::new(config)?;
        tokio::spawn(async move {
            storage_actor.run().await;
        });

        let fetcher = Arc::new(HttpFeedFetcher::new(config, http.clone())?);
        let feed = CachedFeed::new(fetcher, storage.clone(), tz);

        let mut registry = ToolRegistry::new();
        register_event_tools(&mut registry, feed.clone(), tz)?;

        let api = Arc::new(HttpCompletionClient::new(config, http));
        let orchestrator = Orchestrator::new(
            api,
            Arc::new(registry),
            config.completion_model.clone(),
            tz,
        );

        Ok(Self {
            feed,
            orchestrator,
            storage,
        })
    }

    /// Run one CLI command and shut the storage actor down
    pub async fn run(&self, cli: Cli) -> miette::Result<()> {
        let result = match cli.command {
            Command::Events => self.print_events().await,
            Command::Ask { prompt, json } => {
                let schema = json.then(event_list_schema);
                match self.orchestrator.complete(&prompt, schema).await {
                    Ok(answer) => {
                        println!("{}", answer);
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
        };

        if let Err(e) = self.storage.shutdown().await {
            error!("Error shutting down storage actor: {:?}", e);
        }

        result.map_err(Into::into)
    }

    async fn print_events(&self) -> crate::error::AppResult<()> {
        let groups = self.feed.get_events().await?;
        info!("Fetched {} event day(s)", groups.len());

        for group in groups {
            println!("{}", group.title);
            for event in group.items {
                println!("  {} — {}", event.pub_date, event.title);
            }
        }
        Ok(())
    }
}
