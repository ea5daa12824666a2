//! In-memory record store

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::{ArtistRecord, CollaborationRecord, InfluenceEventRecord, RecordStore};
use crate::artwork::Artwork;
use crate::error::{Error, Result};

/// Record store that forgets everything on drop.
///
/// Listings keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    artists: DashMap<String, ArtistRecord>,
    artist_order: RwLock<Vec<String>>,
    artworks: RwLock<Vec<Artwork>>,
    collaborations: RwLock<Vec<CollaborationRecord>>,
    influence_events: RwLock<Vec<InfluenceEventRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_artist(&self, record: ArtistRecord) -> Result<()> {
        if self.artists.contains_key(&record.id) {
            return Err(Error::Storage(format!("artist already stored: {}", record.id)));
        }
        self.artist_order.write().push(record.id.clone());
        self.artists.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_artist(&self, id: &str) -> Result<Option<ArtistRecord>> {
        Ok(self.artists.get(id).map(|r| r.clone()))
    }

    async fn list_artists(&self) -> Result<Vec<ArtistRecord>> {
        Ok(self
            .artist_order
            .read()
            .iter()
            .filter_map(|id| self.artists.get(id).map(|r| r.clone()))
            .collect())
    }

    async fn update_artist(&self, record: ArtistRecord) -> Result<()> {
        match self.artists.get_mut(&record.id) {
            Some(mut existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(Error::not_found("artist", record.id)),
        }
    }

    async fn create_artwork(&self, artwork: Artwork) -> Result<()> {
        self.artworks.write().push(artwork);
        Ok(())
    }

    async fn get_artwork(&self, id: &str) -> Result<Option<Artwork>> {
        Ok(self.artworks.read().iter().find(|w| w.id == id).cloned())
    }

    async fn list_artworks(&self) -> Result<Vec<Artwork>> {
        Ok(self.artworks.read().clone())
    }

    async fn create_collaboration(&self, record: CollaborationRecord) -> Result<()> {
        self.collaborations.write().push(record);
        Ok(())
    }

    async fn list_collaborations(&self) -> Result<Vec<CollaborationRecord>> {
        Ok(self.collaborations.read().clone())
    }

    async fn create_influence_event(&self, record: InfluenceEventRecord) -> Result<()> {
        self.influence_events.write().push(record);
        Ok(())
    }

    async fn list_influence_events(&self) -> Result<Vec<InfluenceEventRecord>> {
        Ok(self.influence_events.read().clone())
    }
}
