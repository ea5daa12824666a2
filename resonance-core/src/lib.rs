//! # Resonance Core - an autonomous art collective
//!
//! Artist agents with evolving personalities create artworks, meet each
//! other and influence each other's style.
//!
//! This crate provides:
//! - Personalities (`personality`) - archetypes, traits and palettes
//! - Evolution (`evolution`) - bounded style drift driven by events
//! - Influence (`influence`) - who shaped whom, and how strongly
//! - Artists (`artist`) - creation, encounters and relationships
//! - Artworks (`artwork`) - emitted pieces and their per-medium content
//! - Collective (`collective`) - registry and orchestration
//! - Service (`api`) - request facade with access control and persistence

#![warn(missing_docs)]

pub mod access;
pub mod api;
pub mod artist;
pub mod artwork;
pub mod collective;
pub mod config;
pub mod error;
pub mod evolution;
pub mod influence;
pub mod logging;
pub mod personality;
pub mod random;
pub mod store;

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::access::{AccessAction, AccessContext, AccessGate, OpenAccess, Tier, TierGate};
    pub use crate::api::{Caller, Request, ResonanceService, Response};
    pub use crate::artist::{Artist, CreationRequest, Relationship, RelationshipKind, RelationshipStrategy};
    pub use crate::artwork::{ArtContent, ArtForm, Artwork, EmotionalState};
    pub use crate::collective::{default_collective, Collective, GalleryState, InfluenceOutcome};
    pub use crate::config::ResonanceConfig;
    pub use crate::error::{Error, Result};
    pub use crate::evolution::{EvolutionEngine, EvolutionEvent, EvolutionKind, EvolutionStats, StyleChanges};
    pub use crate::influence::{InfluenceNetwork, InfluenceRecord};
    pub use crate::personality::{Archetype, Mood, Personality};
    pub use crate::random::{RandomSource, ScriptedRandom, SeededRandom};
    pub use crate::store::{FileStore, MemoryStore, RecordStore};
}
