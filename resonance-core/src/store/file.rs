//! Simple file-based record store (JSONL)
//!
//! One JSONL file per collection inside a directory, with every record cached
//! in memory. Inserts append a line; updates rewrite the collection file.
//!
//! Unparseable lines are skipped on load so a torn final write does not make
//! the whole store unreadable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{ArtistRecord, CollaborationRecord, InfluenceEventRecord, RecordStore};
use crate::artwork::Artwork;
use crate::error::{Error, Result};

const ARTISTS_FILE: &str = "artists.jsonl";
const ARTWORKS_FILE: &str = "artworks.jsonl";
const COLLABORATIONS_FILE: &str = "collaborations.jsonl";
const INFLUENCE_EVENTS_FILE: &str = "influence_events.jsonl";

/// Configuration for FileStore
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Directory holding the collection files
    pub dir: PathBuf,
}

impl FileStoreConfig {
    /// Create config from a directory path
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// One JSONL file and its cached records
struct Collection<T> {
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    async fn open(path: PathBuf) -> Result<Self> {
        let mut records = Vec::new();
        if fs::try_exists(&path).await? {
            let content = fs::read_to_string(&path).await?;
            for (n, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<T>(line) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!(path = %path.display(), line = n + 1, "Skipping bad record: {}", e),
                }
            }
        }
        debug!(path = %path.display(), count = records.len(), "Loaded collection");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    async fn append(&self, record: T) -> Result<()> {
        let mut records = self.records.write().await;
        let line = serde_json::to_string(&record)? + "\n";
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        records.push(record);
        Ok(())
    }

    /// Replace the first record matching `pred` and rewrite the file
    async fn replace(&self, pred: impl Fn(&T) -> bool, record: T) -> Result<bool> {
        let mut records = self.records.write().await;
        let Some(pos) = records.iter().position(|r| pred(r)) else {
            return Ok(false);
        };
        records[pos] = record;

        let mut content = String::new();
        for r in records.iter() {
            content.push_str(&serde_json::to_string(r)?);
            content.push('\n');
        }
        fs::write(&self.path, content).await?;
        Ok(true)
    }

    async fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.records.read().await.iter().find(|r| pred(r)).cloned()
    }

    async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }
}

/// A lightweight file-based record store
#[derive(Clone)]
pub struct FileStore {
    config: FileStoreConfig,
    artists: Arc<Collection<ArtistRecord>>,
    artworks: Arc<Collection<Artwork>>,
    collaborations: Arc<Collection<CollaborationRecord>>,
    influence_events: Arc<Collection<InfluenceEventRecord>>,
}

impl FileStore {
    /// Open the store in `config.dir`, creating the directory if needed
    pub async fn new(config: FileStoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.dir)
            .await
            .map_err(|e| Error::Storage(format!("cannot create {}: {}", config.dir.display(), e)))?;

        let dir = config.dir.clone();
        Ok(Self {
            artists: Arc::new(Collection::open(dir.join(ARTISTS_FILE)).await?),
            artworks: Arc::new(Collection::open(dir.join(ARTWORKS_FILE)).await?),
            collaborations: Arc::new(Collection::open(dir.join(COLLABORATIONS_FILE)).await?),
            influence_events: Arc::new(Collection::open(dir.join(INFLUENCE_EVENTS_FILE)).await?),
            config,
        })
    }

    /// Directory holding the collection files
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn create_artist(&self, record: ArtistRecord) -> Result<()> {
        if self.artists.find(|r| r.id == record.id).await.is_some() {
            return Err(Error::Storage(format!("artist already stored: {}", record.id)));
        }
        self.artists.append(record).await
    }

    async fn get_artist(&self, id: &str) -> Result<Option<ArtistRecord>> {
        Ok(self.artists.find(|r| r.id == id).await)
    }

    async fn list_artists(&self) -> Result<Vec<ArtistRecord>> {
        Ok(self.artists.all().await)
    }

    async fn update_artist(&self, record: ArtistRecord) -> Result<()> {
        let id = record.id.clone();
        if self.artists.replace(|r| r.id == id, record).await? {
            Ok(())
        } else {
            Err(Error::not_found("artist", id))
        }
    }

    async fn create_artwork(&self, artwork: Artwork) -> Result<()> {
        self.artworks.append(artwork).await
    }

    async fn get_artwork(&self, id: &str) -> Result<Option<Artwork>> {
        Ok(self.artworks.find(|w| w.id == id).await)
    }

    async fn list_artworks(&self) -> Result<Vec<Artwork>> {
        Ok(self.artworks.all().await)
    }

    async fn create_collaboration(&self, record: CollaborationRecord) -> Result<()> {
        self.collaborations.append(record).await
    }

    async fn list_collaborations(&self) -> Result<Vec<CollaborationRecord>> {
        Ok(self.collaborations.all().await)
    }

    async fn create_influence_event(&self, record: InfluenceEventRecord) -> Result<()> {
        self.influence_events.append(record).await
    }

    async fn list_influence_events(&self) -> Result<Vec<InfluenceEventRecord>> {
        Ok(self.influence_events.all().await)
    }
}
