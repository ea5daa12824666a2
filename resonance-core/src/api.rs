//! Request facade
//!
//! [`ResonanceService`] is what a transport layer talks to: it takes a
//! [`Request`], asks the access gate, runs the collective operation, persists
//! what changed and answers with a JSON [`Response`].

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::access::{AccessAction, AccessContext, AccessGate, OpenAccess, Tier, TierGate};
use crate::artwork::{ArtForm, Artwork};
use crate::collective::Collective;
use crate::config::{ResonanceConfig, StoreKind};
use crate::error::Result;
use crate::evolution::{EvolutionKind, StyleChanges};
use crate::influence::DEFAULT_TOP;
use crate::random::{RandomSource, SeededRandom};
use crate::store::{
    ArtistRecord, CollaborationRecord, FileStore, FileStoreConfig, InfluenceEventRecord, MemoryStore,
    RecordStore,
};

fn default_pair() -> Vec<String> {
    vec!["artist-1".to_string(), "artist-2".to_string()]
}

fn default_top() -> usize {
    DEFAULT_TOP
}

/// Everything a caller can ask of the collective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    /// Overview of all artists and recent artworks
    Gallery,
    /// One artist with evolution stats
    Artist {
        /// Artist id
        id: String,
    },
    /// Evolution stats and timeline of one artist
    Evolution {
        /// Artist id
        id: String,
    },
    /// An artist creates a piece
    Create {
        /// Artist id
        id: String,
        /// Subject; a random topic when absent
        #[serde(default)]
        theme: Option<String>,
        /// Medium; visual when absent
        #[serde(default)]
        form: Option<ArtForm>,
    },
    /// An artist creates on its own initiative
    AutonomousCreate {
        /// Artist id
        artist_id: String,
        /// Subject; a random topic when absent
        #[serde(default)]
        theme: Option<String>,
    },
    /// A collaborative session
    Collaborate {
        /// Participant ids; the first creates
        #[serde(default = "default_pair")]
        artists: Vec<String>,
    },
    /// Register a new artist
    CreateArtist {
        /// Archetype name; unknown names become dreamers
        archetype: String,
    },
    /// An artist reflects on its evolution
    Reflect {
        /// Artist id
        artist_id: String,
    },
    /// One artist is influenced by another
    Influence {
        /// Influenced artist
        artist_id: String,
        /// Influencing artist
        target_artist_id: String,
    },
    /// Strongest influences on an artist
    TopInfluences {
        /// Influenced artist
        artist_id: String,
        /// Maximum number of records
        #[serde(default = "default_top")]
        limit: usize,
    },
}

impl Request {
    /// Access action this request needs, if any
    pub fn access_action(&self) -> Option<AccessAction> {
        match self {
            Self::Create { .. } | Self::AutonomousCreate { .. } => Some(AccessAction::Create),
            Self::Collaborate { .. } => Some(AccessAction::Collaborate),
            _ => None,
        }
    }
}

/// JSON answer with an HTTP-style status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// JSON payload
    pub body: Value,
}

impl Response {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Who is asking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caller {
    /// Caller id
    pub id: String,
    /// Paid tier; the service default when absent
    #[serde(default)]
    pub tier: Option<Tier>,
}

impl Caller {
    /// Caller on the default tier
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), tier: None }
    }

    /// Caller on an explicit tier
    pub fn with_tier(id: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: id.into(),
            tier: Some(tier),
        }
    }
}

fn artwork_view(w: &Artwork) -> Value {
    json!({
        "id": w.id,
        "title": w.title,
        "creator": w.creator,
        "creator_name": w.creator_name,
        "archetype": w.archetype,
        "emotional_state": w.emotional_state,
        "description": w.description,
        "form": w.content.form(),
        "style": {
            "mood": w.style.mood,
            "energy": w.style.energy,
            "complexity": w.style.complexity,
            "palette": w.style.colors,
        },
        "collaborators": w.collaborators,
        "created_at": w.created_at,
    })
}

/// The collective behind an access gate and a record store
pub struct ResonanceService {
    collective: Arc<Collective>,
    store: Arc<dyn RecordStore>,
    gate: Arc<dyn AccessGate>,
    default_tier: Tier,
}

impl ResonanceService {
    /// Assemble a service from its parts
    pub fn new(collective: Arc<Collective>, store: Arc<dyn RecordStore>, gate: Arc<dyn AccessGate>) -> Self {
        Self {
            collective,
            store,
            gate,
            default_tier: Tier::default(),
        }
    }

    /// Tier assumed for callers that do not state one
    pub fn with_default_tier(mut self, tier: Tier) -> Self {
        self.default_tier = tier;
        self
    }

    /// Build everything from configuration and bootstrap the store
    pub async fn from_config(config: &ResonanceConfig) -> Result<Self> {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        let mut collective = Collective::with_rng(rng).with_strategy(config.relationship_strategy);
        if config.seed_default_artists {
            collective = collective.with_default_artists()?;
        }

        let store: Arc<dyn RecordStore> = match config.store.kind {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
            StoreKind::File => Arc::new(FileStore::new(FileStoreConfig::new(&config.store.dir)).await?),
        };
        let gate: Arc<dyn AccessGate> = if config.access.enabled {
            Arc::new(TierGate::new())
        } else {
            Arc::new(OpenAccess)
        };

        let service = Self::new(Arc::new(collective), store, gate).with_default_tier(config.access.default_tier);
        service.bootstrap().await?;
        Ok(service)
    }

    /// Shared collective
    pub fn collective(&self) -> &Arc<Collective> {
        &self.collective
    }

    /// Record store
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Sync the collective with the store.
    ///
    /// An empty store receives every registered artist. Otherwise stored
    /// artists, evolution logs and artworks are loaded back into the
    /// collective and the influence networks are rebuilt from the stored
    /// influence events.
    pub async fn bootstrap(&self) -> Result<()> {
        let stored = self.store.list_artists().await?;
        if stored.is_empty() {
            self.persist_artists(&self.collective.artist_ids()).await?;
            info!(count = self.collective.len(), "Seeded record store");
            return Ok(());
        }

        let stored_ids: HashSet<String> = stored.iter().map(|r| r.id.clone()).collect();
        let count = stored.len();
        for mut record in stored {
            let portfolio = self.store.artworks_by_artist(&record.id).await?;
            let history = std::mem::take(&mut record.evolution_log);
            self.collective.restore_artist(record.into_artist(portfolio), history)?;
        }
        self.collective.restore_gallery(self.store.list_artworks().await?);

        let events = self.store.list_influence_events().await?;
        let mut replayed = 0usize;
        for event in &events {
            match self.collective.record_influence(&event.to, &event.from, event.strength) {
                Ok(_) => replayed += 1,
                Err(e) => warn!(from = %event.from, to = %event.to, "Skipping stored influence event: {}", e),
            }
        }

        let missing: Vec<String> = self
            .collective
            .artist_ids()
            .into_iter()
            .filter(|id| !stored_ids.contains(id))
            .collect();
        self.persist_artists(&missing).await?;
        info!(count, missing = missing.len(), replayed, "Restored artists from record store");
        Ok(())
    }

    /// Handle one request; errors become error responses
    pub async fn handle(&self, caller: &Caller, request: Request) -> Response {
        match self.dispatch(caller, request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(caller = %caller.id, status = e.status_code(), "Request failed: {}", e);
                Response {
                    status: e.status_code(),
                    body: json!({ "success": false, "error": e.to_string() }),
                }
            }
        }
    }

    /// Handle one request, propagating errors.
    ///
    /// Gated requests count against the caller's quota only when they succeed.
    pub async fn dispatch(&self, caller: &Caller, request: Request) -> Result<Response> {
        let context = request.access_action().map(|action| {
            let tier = caller.tier.unwrap_or(self.default_tier);
            AccessContext::new(caller.id.clone(), action, tier)
        });
        if let Some(context) = &context {
            self.gate.check(context)?;
        }

        let response = self.run(request).await?;
        if let Some(context) = &context {
            self.gate.commit(context);
        }
        Ok(response)
    }

    async fn run(&self, request: Request) -> Result<Response> {
        let c = &self.collective;
        match request {
            Request::Gallery => Ok(Response::ok(json!({
                "success": true,
                "resonance": c.gallery_state(),
            }))),

            Request::Artist { id } => {
                let artist = c.artist(&id)?;
                let stats = c.evolution_stats(&id)?;
                Ok(Response::ok(json!({
                    "success": true,
                    "artist": {
                        "id": artist.id,
                        "name": artist.name,
                        "archetype": artist.personality.archetype,
                        "colors": artist.personality.colors,
                        "mood": artist.personality.mood,
                        "energy": artist.personality.energy,
                        "complexity": artist.personality.complexity,
                        "curiosity": artist.personality.curiosity,
                        "evolution": artist.personality.evolution,
                        "portfolio_size": artist.portfolio.len(),
                        "evolution_stats": stats,
                        "collaborators": artist.collaborators,
                        "rivals": artist.rivals,
                        "influences": artist.influences,
                    },
                })))
            }

            Request::Evolution { id } => Ok(Response::ok(json!({
                "success": true,
                "evolution": {
                    "stats": c.evolution_stats(&id)?,
                    "timeline": c.evolution_timeline(&id)?,
                },
            }))),

            Request::Create { id, theme, form } => {
                let mut creation = crate::artist::CreationRequest::new().with_form(form.unwrap_or_default());
                creation.theme = theme;
                let artwork = c.create_artwork(&id, creation)?;
                // Pull energy back towards the snapshot if creating raised it
                let drift = artwork.style.energy - c.artist(&id)?.personality.energy;
                c.process_event(
                    &id,
                    EvolutionKind::Creation,
                    artwork.title.clone(),
                    StyleChanges::none().with_energy(drift),
                )?;
                self.persist_artwork(&artwork).await?;
                Ok(Response::created(json!({
                    "success": true,
                    "artwork": artwork_view(&artwork),
                })))
            }

            Request::AutonomousCreate { artist_id, theme } => {
                let artwork = c.create_and_evolve(&artist_id, theme.as_deref(), ArtForm::Visual)?;
                self.persist_artwork(&artwork).await?;
                let evolution = c.artist(&artist_id)?.personality.evolution;
                Ok(Response::created(json!({
                    "success": true,
                    "autonomous": true,
                    "artwork": artwork_view(&artwork),
                    "evolution_note": format!("Artist evolution: {:.1}", evolution),
                })))
            }

            Request::Collaborate { artists } => {
                let (artwork, participants) = c.collaborate(&artists)?;
                self.store.create_artwork(artwork.clone()).await?;
                self.store
                    .create_collaboration(CollaborationRecord::new(&artwork, participants.clone()))
                    .await?;
                self.persist_artists(&participants).await?;
                Ok(Response::created(json!({
                    "success": true,
                    "collaboration": {
                        "artwork": artwork_view(&artwork),
                        "participants": participants,
                        "note": format!(
                            "{} collaborated with {} artists",
                            artwork.creator_name,
                            participants.len() - 1
                        ),
                    },
                })))
            }

            Request::CreateArtist { archetype } => {
                let artist = c.create_artist(&archetype)?;
                self.store.create_artist(ArtistRecord::from(&artist)).await?;
                Ok(Response::created(json!({
                    "success": true,
                    "artist": {
                        "id": artist.id,
                        "name": artist.name,
                        "archetype": artist.personality.archetype,
                    },
                })))
            }

            Request::Reflect { artist_id } => Ok(Response::ok(json!({
                "success": true,
                "reflection": c.reflect(&artist_id)?,
            }))),

            Request::Influence {
                artist_id,
                target_artist_id,
            } => {
                let outcome = c.influence(&artist_id, &target_artist_id)?;
                self.store
                    .create_influence_event(InfluenceEventRecord::new(
                        &target_artist_id,
                        &artist_id,
                        outcome.strength,
                        outcome.relationship,
                    ))
                    .await?;
                self.persist_artists(&[artist_id, target_artist_id]).await?;
                Ok(Response::ok(json!({
                    "success": true,
                    "influence": outcome,
                })))
            }

            Request::TopInfluences { artist_id, limit } => Ok(Response::ok(json!({
                "success": true,
                "influences": c.top_influences(&artist_id, limit)?,
                "map": c.influence_map(&artist_id)?,
            }))),
        }
    }

    async fn persist_artwork(&self, artwork: &Artwork) -> Result<()> {
        self.store.create_artwork(artwork.clone()).await?;
        self.persist_artists(std::slice::from_ref(&artwork.creator)).await
    }

    async fn persist_artists(&self, ids: &[String]) -> Result<()> {
        let records = ids
            .iter()
            .map(|id| -> Result<ArtistRecord> {
                let artist = self.collective.artist(id)?;
                let log = self.collective.evolution_timeline(id)?;
                Ok(ArtistRecord::from(&artist).with_evolution_log(log))
            })
            .collect::<Result<Vec<_>>>()?;
        try_join_all(records.into_iter().map(|r| self.store.upsert_artist(r))).await?;
        Ok(())
    }
}
