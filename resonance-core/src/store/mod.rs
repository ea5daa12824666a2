//! Persistence of artists, artworks, collaborations and influence events
//!
//! The collective itself is in-memory; a [`RecordStore`] keeps a durable copy
//! so a restarted service can restore its artists.

mod file;
mod memory;

pub use file::{FileStore, FileStoreConfig};
pub use memory::MemoryStore;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artist::{Artist, RelationshipKind};
use crate::artwork::Artwork;
use crate::error::Result;
use crate::evolution::EvolutionEvent;
use crate::personality::Personality;

/// Flattened projection of an [`Artist`]; the portfolio lives in the artwork collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRecord {
    /// Artist id
    pub id: String,
    /// Display name
    pub name: String,
    /// Personality at the time of writing
    pub personality: Personality,
    /// Number of artworks in the portfolio
    pub portfolio_size: usize,
    /// Ids of collaborators
    #[serde(default)]
    pub collaborators: BTreeSet<String>,
    /// Ids of rivals
    #[serde(default)]
    pub rivals: BTreeSet<String>,
    /// Ids of artists this one was influenced by
    #[serde(default)]
    pub influences: BTreeSet<String>,
    /// Evolution log, oldest first
    #[serde(default)]
    pub evolution_log: Vec<EvolutionEvent>,
    /// When the record was written
    pub updated_at: DateTime<Utc>,
}

impl From<&Artist> for ArtistRecord {
    fn from(a: &Artist) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            personality: a.personality.clone(),
            portfolio_size: a.portfolio.len(),
            collaborators: a.collaborators.clone(),
            rivals: a.rivals.clone(),
            influences: a.influences.clone(),
            evolution_log: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

impl ArtistRecord {
    /// Attach the artist's evolution log
    pub fn with_evolution_log(mut self, log: Vec<EvolutionEvent>) -> Self {
        self.evolution_log = log;
        self
    }

    /// Rebuild the artist with its stored portfolio; the evolution log is not part of it
    pub fn into_artist(self, portfolio: Vec<Artwork>) -> Artist {
        let mut artist = Artist::with_personality(self.id, self.name, self.personality);
        artist.portfolio = portfolio;
        artist.collaborators = self.collaborators;
        artist.rivals = self.rivals;
        artist.influences = self.influences;
        artist
    }
}

/// A finished collaborative session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationRecord {
    /// Record id
    pub id: String,
    /// Id of the resulting artwork
    pub artwork_id: String,
    /// Resolved participants, creator first
    pub participants: Vec<String>,
    /// Title of the resulting artwork
    pub title: String,
    /// When the session finished
    pub created_at: DateTime<Utc>,
}

impl CollaborationRecord {
    /// Record for `artwork` made by `participants`
    pub fn new(artwork: &Artwork, participants: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            artwork_id: artwork.id.clone(),
            participants,
            title: artwork.title.clone(),
            created_at: Utc::now(),
        }
    }
}

/// One artist influenced by another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceEventRecord {
    /// Record id
    pub id: String,
    /// Influencing artist
    pub from: String,
    /// Influenced artist
    pub to: String,
    /// Strength of this exposure
    pub strength: f64,
    /// How the encounter behind it was classified
    pub relationship: RelationshipKind,
    /// When it happened
    pub created_at: DateTime<Utc>,
}

impl InfluenceEventRecord {
    /// Record of `to` being influenced by `from`
    pub fn new(from: impl Into<String>, to: impl Into<String>, strength: f64, relationship: RelationshipKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from: from.into(),
            to: to.into(),
            strength,
            relationship,
            created_at: Utc::now(),
        }
    }
}

/// Durable storage for the collective's records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new artist; an existing id is an error
    async fn create_artist(&self, record: ArtistRecord) -> Result<()>;
    /// Artist by id
    async fn get_artist(&self, id: &str) -> Result<Option<ArtistRecord>>;
    /// Every artist, in insertion order
    async fn list_artists(&self) -> Result<Vec<ArtistRecord>>;
    /// Replace an existing artist; an unknown id is an error
    async fn update_artist(&self, record: ArtistRecord) -> Result<()>;

    /// Insert an artwork; artworks are never updated
    async fn create_artwork(&self, artwork: Artwork) -> Result<()>;
    /// Artwork by id
    async fn get_artwork(&self, id: &str) -> Result<Option<Artwork>>;
    /// Every artwork, in insertion order
    async fn list_artworks(&self) -> Result<Vec<Artwork>>;

    /// Artworks created by `artist_id`, oldest first
    async fn artworks_by_artist(&self, artist_id: &str) -> Result<Vec<Artwork>> {
        Ok(self
            .list_artworks()
            .await?
            .into_iter()
            .filter(|w| w.creator == artist_id)
            .collect())
    }

    /// Append a finished session
    async fn create_collaboration(&self, record: CollaborationRecord) -> Result<()>;
    /// Every session, in insertion order
    async fn list_collaborations(&self) -> Result<Vec<CollaborationRecord>>;

    /// Append an influence event
    async fn create_influence_event(&self, record: InfluenceEventRecord) -> Result<()>;
    /// Every influence event, in insertion order
    async fn list_influence_events(&self) -> Result<Vec<InfluenceEventRecord>>;

    /// Insert or replace an artist
    async fn upsert_artist(&self, record: ArtistRecord) -> Result<()> {
        if self.get_artist(&record.id).await?.is_some() {
            self.update_artist(record).await
        } else {
            self.create_artist(record).await
        }
    }
}
