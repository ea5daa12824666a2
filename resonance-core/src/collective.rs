//! The collective - registry and orchestration of artist agents
//!
//! Each artist's mutable state (personality, portfolio, relationships,
//! evolution log, influence network) sits behind its own lock, so two requests
//! touching different artists never contend. Operations spanning two artists
//! never hold both locks at once: they snapshot one side, release it, then
//! lock the side being mutated.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::artist::{Artist, CreationRequest, Relationship, RelationshipKind, RelationshipStrategy};
use crate::artwork::{ArtForm, Artwork};
use crate::error::{Error, Result};
use crate::evolution::{EvolutionEngine, EvolutionEvent, EvolutionKind, EvolutionStats, StyleChanges};
use crate::influence::{InfluenceNetwork, InfluenceRecord};
use crate::personality::{Archetype, Mood, MAX_TRAIT, MIN_TRAIT};
use crate::random::{RandomSource, SeededRandom};

/// The founding members: (id, name, archetype)
pub const DEFAULT_ARTISTS: [(&str, &str, Archetype); 5] = [
    ("artist-1", "Luna", Archetype::Dreamer),
    ("artist-2", "Atlas", Archetype::Architect),
    ("artist-3", "Phoenix", Archetype::Rebel),
    ("artist-4", "Sage", Archetype::Poet),
    ("artist-5", "Mercury", Archetype::Alchemist),
];

/// Number of artworks listed in [`GalleryState::recent_artworks`]
pub const RECENT_ARTWORKS: usize = 10;

/// Complexity requested from every participant of a collaboration
const COLLABORATION_COMPLEXITY: f64 = 0.5;
/// Complexity requested from an artist being influenced
const INFLUENCE_COMPLEXITY: f64 = 0.3;

/// Everything mutable about one artist
#[derive(Debug)]
struct ArtistSlot {
    artist: Artist,
    engine: EvolutionEngine,
    network: InfluenceNetwork,
}

type SharedSlot = Arc<Mutex<ArtistSlot>>;

/// Listing entry for one artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSummary {
    /// Artist id
    pub id: String,
    /// Display name
    pub name: String,
    /// Archetype
    pub archetype: Archetype,
    /// Mood
    pub mood: Mood,
    /// Energy (1-10)
    pub energy: f64,
    /// Complexity (1-10)
    pub complexity: f64,
    /// Curiosity (1-10)
    pub curiosity: f64,
    /// Evolution score
    pub evolution: f64,
    /// Number of artworks
    pub portfolio_size: usize,
    /// Ids of collaborators
    pub collaborators: Vec<String>,
    /// Ids of influences
    pub influences: Vec<String>,
}

impl From<&Artist> for ArtistSummary {
    fn from(a: &Artist) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            archetype: a.personality.archetype,
            mood: a.personality.mood,
            energy: a.personality.energy,
            complexity: a.personality.complexity,
            curiosity: a.personality.curiosity,
            evolution: a.personality.evolution,
            portfolio_size: a.portfolio.len(),
            collaborators: a.collaborators.iter().cloned().collect(),
            influences: a.influences.iter().cloned().collect(),
        }
    }
}

/// Listing entry for one artwork
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkSummary {
    /// Artwork id
    pub id: String,
    /// Title
    pub title: String,
    /// Id of the creating artist
    pub creator: String,
    /// Archetype of the creator
    pub archetype: Archetype,
    /// How the artist felt
    pub emotional_state: crate::artwork::EmotionalState,
    /// Ids of everyone who took part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<String>>,
    /// Creation time
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Artwork> for ArtworkSummary {
    fn from(w: &Artwork) -> Self {
        Self {
            id: w.id.clone(),
            title: w.title.clone(),
            creator: w.creator.clone(),
            archetype: w.archetype,
            emotional_state: w.emotional_state,
            collaborators: w.collaborators.clone(),
            created_at: w.created_at,
        }
    }
}

/// Gallery counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryStats {
    /// Registered artists
    pub total_artists: usize,
    /// Artworks in the gallery
    pub total_artworks: usize,
    /// Collaborative artworks
    pub collaborations: usize,
}

/// Snapshot of the whole collective for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryState {
    /// Every artist, in registration order
    pub artists: Vec<ArtistSummary>,
    /// Newest first
    pub recent_artworks: Vec<ArtworkSummary>,
    /// Counters
    pub stats: GalleryStats,
}

/// Result of a pairwise encounter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncounterOutcome {
    /// How the encounter was classified
    pub relationship: RelationshipKind,
    /// Absolute energy difference at the time of the encounter
    pub energy_gap: f64,
}

/// Result of one artist being influenced by another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceOutcome {
    /// Influenced artist
    pub artist_id: String,
    /// Influencing artist
    pub target_id: String,
    /// Name of the influencing artist
    pub from: String,
    /// Name of the influenced artist
    pub to: String,
    /// How the encounter was classified
    pub relationship: RelationshipKind,
    /// Strength of this exposure
    pub strength: f64,
    /// Accumulated strength after this exposure
    pub accumulated: f64,
    /// Human-readable summary
    pub note: String,
}

/// Influence strength of one exposure: 1.0 for equal energy, 0.0 for the widest gap
pub fn influence_strength(energy_gap: f64) -> f64 {
    (1.0 - energy_gap / (MAX_TRAIT - MIN_TRAIT)).clamp(0.0, 1.0)
}

/// Registry of artists and orchestrator of their interactions
pub struct Collective {
    artists: DashMap<String, SharedSlot>,
    /// Registration order, for stable listings
    order: RwLock<Vec<String>>,
    gallery: RwLock<Vec<Artwork>>,
    rng: Mutex<Box<dyn RandomSource>>,
    strategy: RelationshipStrategy,
}

impl Collective {
    /// Empty collective with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(Box::new(SeededRandom::from_entropy()))
    }

    /// Empty collective drawing from `rng`
    pub fn with_rng(rng: Box<dyn RandomSource>) -> Self {
        Self {
            artists: DashMap::new(),
            order: RwLock::new(Vec::new()),
            gallery: RwLock::new(Vec::new()),
            rng: Mutex::new(rng),
            strategy: RelationshipStrategy::default(),
        }
    }

    /// Set the encounter classification strategy
    pub fn with_strategy(mut self, strategy: RelationshipStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Register the five founding artists
    pub fn with_default_artists(self) -> Result<Self> {
        for (id, name, archetype) in DEFAULT_ARTISTS {
            self.add_artist(Artist::new(id, name, archetype))?;
        }
        Ok(self)
    }

    /// Encounter classification strategy in use
    pub fn strategy(&self) -> RelationshipStrategy {
        self.strategy
    }

    /// Register an artist. A duplicate id is rejected and the registered
    /// artist is left untouched.
    pub fn add_artist(&self, artist: Artist) -> Result<()> {
        let id = artist.id.clone();
        match self.artists.entry(id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(Error::invalid_input(format!("artist id already registered: {}", id)));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(ArtistSlot {
                    artist,
                    engine: EvolutionEngine::new(),
                    network: InfluenceNetwork::new(),
                })));
            }
        }
        self.order.write().push(id.clone());
        info!(artist = %id, "Registered artist");
        Ok(())
    }

    /// Put back an artist loaded from storage together with its evolution log.
    ///
    /// A registered artist with the same id takes the stored state. An empty
    /// `history` keeps the evolution log already in memory. The influence
    /// network starts empty and is rebuilt with [`Collective::record_influence`].
    pub fn restore_artist(&self, artist: Artist, history: Vec<EvolutionEvent>) -> Result<()> {
        let slot = match self.slot(&artist.id) {
            Ok(slot) => slot,
            Err(_) => {
                self.add_artist(artist.clone())?;
                self.slot(&artist.id)?
            }
        };
        let mut guard = slot.lock();
        debug!(artist = %artist.id, events = history.len(), "Restored artist state");
        if !history.is_empty() {
            guard.engine = EvolutionEngine::from_history(history);
        }
        guard.network = InfluenceNetwork::new();
        guard.artist = artist;
        Ok(())
    }

    /// Replace the gallery with stored artworks, oldest first
    pub fn restore_gallery(&self, mut artworks: Vec<Artwork>) {
        artworks.sort_by_key(|w| w.created_at);
        *self.gallery.write() = artworks;
    }

    /// Create and register a new artist of `archetype` (unknown names become dreamers)
    pub fn create_artist(&self, archetype: &str) -> Result<Artist> {
        let archetype = Archetype::parse_or_default(archetype);
        let id = format!("custom-{}", uuid::Uuid::new_v4().simple());
        let artist = Artist::new(id, archetype.custom_name(), archetype);
        self.add_artist(artist.clone())?;
        Ok(artist)
    }

    fn slot(&self, id: &str) -> Result<SharedSlot> {
        self.artists
            .get(id)
            .map(|s| Arc::clone(&s))
            .ok_or_else(|| Error::not_found("artist", id))
    }

    /// True if `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.artists.contains_key(id)
    }

    /// Number of registered artists
    pub fn len(&self) -> usize {
        self.artists.len()
    }

    /// True if no artist is registered
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    /// Registered ids in registration order
    pub fn artist_ids(&self) -> Vec<String> {
        self.order.read().clone()
    }

    /// Snapshot of one artist
    pub fn artist(&self, id: &str) -> Result<Artist> {
        Ok(self.slot(id)?.lock().artist.clone())
    }

    /// Snapshots of all artists in registration order
    pub fn artists(&self) -> Vec<Artist> {
        self.artist_ids()
            .iter()
            .filter_map(|id| self.artist(id).ok())
            .collect()
    }

    /// Every artwork created through the collective, oldest first
    pub fn gallery(&self) -> Vec<Artwork> {
        self.gallery.read().clone()
    }

    /// Find an artwork by id
    pub fn artwork(&self, id: &str) -> Result<Artwork> {
        self.gallery
            .read()
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("artwork", id))
    }

    /// Let an artist create a piece on its own
    #[instrument(skip(self, request), fields(form = ?request.form))]
    pub fn create_artwork(&self, artist_id: &str, request: CreationRequest) -> Result<Artwork> {
        let slot = self.slot(artist_id)?;
        let artwork = {
            let mut guard = slot.lock();
            let mut rng = self.rng.lock();
            guard.artist.create_artwork(request, rng.as_mut())
        };
        self.gallery.write().push(artwork.clone());
        info!(artwork = %artwork.id, title = %artwork.title, "Artwork created");
        Ok(artwork)
    }

    /// Visual piece on `theme` or a random topic
    pub fn create_autonomous_art(&self, artist_id: &str, theme: Option<&str>) -> Result<Artwork> {
        let mut request = CreationRequest::new();
        request.theme = theme.map(str::to_string);
        self.create_artwork(artist_id, request)
    }

    /// Creation followed by a `creation` evolution event
    pub fn create_and_evolve(&self, artist_id: &str, theme: Option<&str>, form: ArtForm) -> Result<Artwork> {
        let mut request = CreationRequest::new().with_form(form);
        request.theme = theme.map(str::to_string);
        let artwork = self.create_artwork(artist_id, request)?;
        self.process_event(artist_id, EvolutionKind::Creation, artwork.title.clone(), StyleChanges::none())?;
        Ok(artwork)
    }

    /// Two or more artists create one piece together.
    ///
    /// Unknown ids are dropped; at least two must resolve. The first resolved
    /// artist creates, the rest encounter it. The artwork lists every
    /// requested id.
    #[instrument(skip(self))]
    pub fn create_collaborative_session(&self, agent_ids: &[String]) -> Result<Artwork> {
        let (artwork, _) = self.run_session(agent_ids)?;
        Ok(artwork)
    }

    fn run_session(&self, agent_ids: &[String]) -> Result<(Artwork, Vec<String>)> {
        if agent_ids.len() < 2 {
            return Err(Error::invalid_input("need at least 2 artists for collaboration"));
        }

        let resolved: Vec<(String, SharedSlot)> = agent_ids
            .iter()
            .filter_map(|id| match self.slot(id) {
                Ok(slot) => Some((id.clone(), slot)),
                Err(_) => {
                    warn!(artist = %id, "Dropping unknown artist from session");
                    None
                }
            })
            .collect();
        if resolved.len() < 2 {
            return Err(Error::invalid_input("need at least 2 artists for collaboration"));
        }

        let (first_name, first_mood) = {
            let g = resolved[0].1.lock();
            (g.artist.name.clone(), g.artist.personality.mood)
        };
        let (second_name, second_mood) = {
            let g = resolved[1].1.lock();
            (g.artist.name.clone(), g.artist.personality.mood)
        };
        let theme = format!(
            "{} and {} explore {} vs {}",
            first_name, second_name, first_mood, second_mood
        );
        debug!(%theme, "Session theme");

        let primary_id = resolved[0].0.clone();
        let request = CreationRequest::new()
            .with_theme(theme)
            .with_collaborators(agent_ids.to_vec());
        let artwork = self.create_artwork(&primary_id, request)?;

        for (id, _) in resolved.iter().skip(1) {
            if *id == primary_id {
                continue;
            }
            self.encounter(id, &primary_id)?;
        }

        let participants = resolved.into_iter().map(|(id, _)| id).collect();
        Ok((artwork, participants))
    }

    /// Collaborative session followed by a `collaboration` event for every
    /// resolved participant. Returns the artwork and the resolved ids.
    pub fn collaborate(&self, agent_ids: &[String]) -> Result<(Artwork, Vec<String>)> {
        let (artwork, participants) = self.run_session(agent_ids)?;
        for id in &participants {
            self.process_event(
                id,
                EvolutionKind::Collaboration,
                artwork.title.clone(),
                StyleChanges::none().with_complexity(COLLABORATION_COMPLEXITY),
            )?;
        }
        Ok((artwork, participants))
    }

    /// `artist_id` meets `other_id`
    #[instrument(skip(self))]
    pub fn encounter(&self, artist_id: &str, other_id: &str) -> Result<EncounterOutcome> {
        if artist_id == other_id {
            return Err(Error::invalid_input("an artist cannot encounter itself"));
        }
        let own = self.slot(artist_id)?;
        let other = self.slot(other_id)?;

        let other_energy = other.lock().artist.personality.energy;

        let outcome = {
            let mut guard = own.lock();
            let own_energy = guard.artist.personality.energy;
            let relationship = {
                let mut rng = self.rng.lock();
                self.strategy.classify(own_energy, other_energy, rng.as_mut())
            };
            guard.artist.record_encounter(other_id, relationship, self.strategy);
            EncounterOutcome {
                relationship,
                energy_gap: (own_energy - other_energy).abs(),
            }
        };

        if self.strategy.is_mutual(outcome.relationship) {
            other.lock().artist.collaborators.insert(artist_id.to_string());
        }
        info!(relationship = ?outcome.relationship, gap = outcome.energy_gap, "Encounter");
        Ok(outcome)
    }

    /// Strongest relationship `artist_id` holds towards `other_id`
    pub fn relationship(&self, artist_id: &str, other_id: &str) -> Result<Relationship> {
        Ok(self.slot(artist_id)?.lock().artist.relationship_with(other_id))
    }

    /// Run one event through an artist's evolution engine
    pub fn process_event(
        &self,
        artist_id: &str,
        kind: EvolutionKind,
        trigger: impl Into<String>,
        changes: StyleChanges,
    ) -> Result<()> {
        let slot = self.slot(artist_id)?;
        let mut guard = slot.lock();
        let ArtistSlot { artist, engine, .. } = &mut *guard;
        let mut rng = self.rng.lock();
        engine.process_event(&mut artist.personality, rng.as_mut(), kind, trigger, changes);
        Ok(())
    }

    /// An artist's reflection on its recent evolution
    pub fn reflect(&self, artist_id: &str) -> Result<String> {
        let slot = self.slot(artist_id)?;
        let guard = slot.lock();
        Ok(guard.engine.reflect_on_evolution(&guard.artist.name, &guard.artist.personality))
    }

    /// Aggregate evolution counters of an artist
    pub fn evolution_stats(&self, artist_id: &str) -> Result<EvolutionStats> {
        let slot = self.slot(artist_id)?;
        let guard = slot.lock();
        Ok(guard.engine.stats(&guard.artist.personality))
    }

    /// Full evolution log of an artist
    pub fn evolution_timeline(&self, artist_id: &str) -> Result<Vec<EvolutionEvent>> {
        Ok(self.slot(artist_id)?.lock().engine.timeline())
    }

    /// Record an exposure of `observer_id` to `source_id`
    pub fn record_influence(&self, observer_id: &str, source_id: &str, strength: f64) -> Result<f64> {
        if !self.contains(source_id) {
            return Err(Error::not_found("artist", source_id));
        }
        let slot = self.slot(observer_id)?;
        let mut guard = slot.lock();
        guard.network.add_influence(source_id, strength);
        Ok(guard.network.get(source_id).map(|r| r.strength).unwrap_or_default())
    }

    /// Strongest influences on an artist
    pub fn top_influences(&self, artist_id: &str, limit: usize) -> Result<Vec<InfluenceRecord>> {
        Ok(self.slot(artist_id)?.lock().network.top_influences(limit))
    }

    /// Bar chart of the strongest influences on an artist
    pub fn influence_map(&self, artist_id: &str) -> Result<String> {
        Ok(self.slot(artist_id)?.lock().network.visualization())
    }

    /// `artist_id` is influenced by `target_id`: they meet, the exposure is
    /// recorded, and the artist evolves towards the target's palette.
    #[instrument(skip(self))]
    pub fn influence(&self, artist_id: &str, target_id: &str) -> Result<InfluenceOutcome> {
        let target = self.artist(target_id)?;
        let artist_name = self.artist(artist_id)?.name;

        let encounter = self.encounter(artist_id, target_id)?;
        let strength = influence_strength(encounter.energy_gap);
        let accumulated = self.record_influence(artist_id, target_id, strength)?;
        self.process_event(
            artist_id,
            EvolutionKind::Influence,
            format!("Influenced by {}", target.name),
            StyleChanges::none()
                .with_colors(target.personality.colors.clone())
                .with_complexity(INFLUENCE_COMPLEXITY),
        )?;

        Ok(InfluenceOutcome {
            artist_id: artist_id.to_string(),
            target_id: target_id.to_string(),
            note: format!(
                "{} was influenced by {}'s {} style",
                artist_name, target.name, target.personality.archetype
            ),
            from: target.name,
            to: artist_name,
            relationship: encounter.relationship,
            strength,
            accumulated,
        })
    }

    /// Snapshot for display
    pub fn gallery_state(&self) -> GalleryState {
        let artists: Vec<ArtistSummary> = self.artists().iter().map(ArtistSummary::from).collect();
        let gallery = self.gallery.read();
        let recent_artworks = gallery
            .iter()
            .rev()
            .take(RECENT_ARTWORKS)
            .map(ArtworkSummary::from)
            .collect();
        let stats = GalleryStats {
            total_artists: artists.len(),
            total_artworks: gallery.len(),
            collaborations: gallery.iter().filter(|w| w.is_collaborative()).count(),
        };
        GalleryState {
            artists,
            recent_artworks,
            stats,
        }
    }
}

impl Default for Collective {
    fn default() -> Self {
        Self::new()
    }
}

/// Entropy-seeded collective with the five founding artists
pub fn default_collective() -> Result<Collective> {
    Collective::new().with_default_artists()
}
