use crate::components::feed::models::CacheEntry;
use crate::config::Config;
use crate::error::{storage_error, AppResult};
use redis::{AsyncCommands, Client as RedisClient};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::info;

// Storage key constants
pub mod keys {
    /// The single cache slot for the grouped event snapshot
    pub const CHAMBER_EVENTS: &str = "chamber_events";
}

/// Backing store for the actor
enum StorageBackend {
    Redis(RedisClient),
    Memory(HashMap<String, String>),
}

/// The storage actor that processes messages
pub struct StorageActor {
    backend: StorageBackend,
    command_rx: mpsc::Receiver<StorageCommand>,
}

/// Commands that can be sent to the storage actor
pub enum StorageCommand {
    GetEntry(String, mpsc::Sender<AppResult<Option<CacheEntry>>>),
    SaveEntry(String, CacheEntry, mpsc::Sender<AppResult<()>>),
    Shutdown,
}

/// Handle for communicating with the storage actor
#[derive(Clone)]
pub struct StorageActorHandle {
    command_tx: mpsc::Sender<StorageCommand>,
}

impl StorageActorHandle {
    /// Create a new empty handle for initialization purposes. Every call
    /// through it fails, which callers must treat as a cache miss.
    pub fn empty() -> Self {
        let (command_tx, _) = mpsc::channel(32);
        Self { command_tx }
    }

    /// Read a cache entry by key
    pub async fn get_entry(&self, key: &str) -> AppResult<Option<CacheEntry>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(StorageCommand::GetEntry(key.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Write a cache entry, replacing any previous value wholesale
    pub async fn save_entry(&self, key: &str, entry: CacheEntry) -> AppResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(StorageCommand::SaveEntry(key.to_string(), entry, response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(StorageCommand::Shutdown).await;
        Ok(())
    }
}

impl StorageActor {
    /// Create a Redis-backed actor and return its handle
    pub fn new(config: &Config) -> AppResult<(Self, StorageActorHandle)> {
        let client = RedisClient::open(config.redis_url.as_str())
            .map_err(|e| storage_error(&format!("Failed to create Redis client: {}", e)))?;
        Ok(Self::with_backend(StorageBackend::Redis(client)))
    }

    /// Create an actor over an in-memory map, used by tests
    pub fn memory() -> (Self, StorageActorHandle) {
        Self::with_backend(StorageBackend::Memory(HashMap::new()))
    }

    fn with_backend(backend: StorageBackend) -> (Self, StorageActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            backend,
            command_rx,
        };
        let handle = StorageActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Storage actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                StorageCommand::GetEntry(key, response_tx) => {
                    let result = self.get_entry(&key).await;
                    let _ = response_tx.send(result).await;
                }
                StorageCommand::SaveEntry(key, entry, response_tx) => {
                    let result = self.save_entry(&key, entry).await;
                    let _ = response_tx.send(result).await;
                }
                StorageCommand::Shutdown => {
                    info!("Storage actor shutting down");
                    break;
                }
            }
        }

        info!("Storage actor shut down");
    }

    async fn get_entry(&mut self, key: &str) -> AppResult<Option<CacheEntry>> {
        let raw = match &mut self.backend {
            StorageBackend::Memory(map) => map.get(key).cloned(),
            StorageBackend::Redis(client) => {
                let mut conn = client.get_multiplexed_async_connection().await.map_err(
                    |e| storage_error(&format!("Failed to connect to storage: {}", e)),
                )?;

                let exists: bool = conn
                    .exists(key)
                    .await
                    .map_err(|e| storage_error(&format!("Storage read error: {}", e)))?;
                if !exists {
                    None
                } else {
                    let value: String = conn.get(key).await.map_err(|e| {
                        storage_error(&format!("Storage read error: {}", e))
                    })?;
                    Some(value)
                }
            }
        };

        match raw {
            None => Ok(None),
            Some(json) => {
                let entry: CacheEntry = serde_json::from_str(&json).map_err(|e| {
                    storage_error(&format!("Failed to deserialize cache entry: {}", e))
                })?;
                Ok(Some(entry))
            }
        }
    }

    async fn save_entry(&mut self, key: &str, entry: CacheEntry) -> AppResult<()> {
        let json = serde_json::to_string(&entry)
            .map_err(|e| storage_error(&format!("Failed to serialize cache entry: {}", e)))?;

        match &mut self.backend {
            StorageBackend::Memory(map) => {
                map.insert(key.to_string(), json);
            }
            StorageBackend::Redis(client) => {
                let mut conn = client.get_multiplexed_async_connection().await.map_err(
                    |e| storage_error(&format!("Failed to connect to storage: {}", e)),
                )?;

                () = conn
                    .set(key, json)
                    .await
                    .map_err(|e| storage_error(&format!("Storage write error: {}", e)))?;
            }
        }

        Ok(())
    }
}
