//! Artist agents
//!
//! An artist owns its personality, an append-only portfolio and three
//! relationship sets. Relationships only ever grow: a later encounter with a
//! different energy gap adds to another set, it never removes.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::artwork::{random_topic, title_for, ArtContent, ArtForm, Artwork, Canvas, EmotionalState};
use crate::personality::{Archetype, Personality, MAX_TRAIT};
use crate::random::RandomSource;

/// Energy gap below which two artists collaborate
pub const COLLABORATE_BELOW: f64 = 3.0;
/// Energy gap above which two artists become rivals
pub const CHALLENGE_ABOVE: f64 = 6.0;
/// Creating raises energy only for artists more curious than this
pub const CREATIVE_CURIOSITY: f64 = 7.0;
/// Sample threshold for the post-creation energy boost (30% chance)
pub const CREATIVE_ENERGY_GATE: f64 = 0.7;
/// Energy gained from the post-creation boost
pub const CREATIVE_ENERGY_BOOST: f64 = 0.5;

/// Outcome of sizing up another artist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Become mutual collaborators
    Collaborate,
    /// Become (one-sided) rivals
    Challenge,
    /// Just take notice
    Observe,
    /// Acknowledge each other without any lasting tie
    Acknowledge,
}

impl RelationshipKind {
    /// Classify purely by energy gap
    pub fn from_energy_gap(gap: f64) -> Self {
        if gap < COLLABORATE_BELOW {
            Self::Collaborate
        } else if gap > CHALLENGE_ABOVE {
            Self::Challenge
        } else {
            Self::Observe
        }
    }
}

/// How encounters are classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStrategy {
    /// Deterministic, by energy gap
    #[default]
    EnergyGap,
    /// Uniform over collaborator, rival, influence, admirer, peer.
    /// Only the encountering artist is changed.
    Random,
}

const RANDOM_LABELS: [RelationshipKind; 5] = [
    RelationshipKind::Collaborate, // collaborator
    RelationshipKind::Challenge,   // rival
    RelationshipKind::Observe,     // influence
    RelationshipKind::Acknowledge, // admirer
    RelationshipKind::Acknowledge, // peer
];

impl RelationshipStrategy {
    /// Decide the relationship between two energies
    pub fn classify(&self, own_energy: f64, other_energy: f64, rng: &mut dyn RandomSource) -> RelationshipKind {
        match self {
            Self::EnergyGap => RelationshipKind::from_energy_gap((own_energy - other_energy).abs()),
            Self::Random => RANDOM_LABELS[rng.pick_index(RANDOM_LABELS.len())],
        }
    }

    /// Whether an encounter of `kind` adds the other artist to `influences`
    pub fn records_influence(&self, kind: RelationshipKind) -> bool {
        match self {
            Self::EnergyGap => kind != RelationshipKind::Acknowledge,
            Self::Random => matches!(kind, RelationshipKind::Collaborate | RelationshipKind::Observe),
        }
    }

    /// Whether the other artist also records the collaboration
    pub fn is_mutual(&self, kind: RelationshipKind) -> bool {
        *self == Self::EnergyGap && kind == RelationshipKind::Collaborate
    }
}

/// Strongest relationship one artist holds towards another
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// Never met
    Unacquainted,
    /// Met without collaborating or competing
    Observed,
    /// Competes with the other
    Rival,
    /// Works with the other
    Collaborator,
}

/// Options for a single creation
#[derive(Debug, Clone, Default)]
pub struct CreationRequest {
    /// Theme to contemplate; a random topic when absent
    pub theme: Option<String>,
    /// Medium
    pub form: ArtForm,
    /// Participants to stamp on the artwork
    pub collaborators: Option<Vec<String>>,
}

impl CreationRequest {
    /// Visual piece on a random topic
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Set the medium
    pub fn with_form(mut self, form: ArtForm) -> Self {
        self.form = form;
        self
    }

    /// Stamp participants
    pub fn with_collaborators(mut self, ids: Vec<String>) -> Self {
        self.collaborators = Some(ids);
        self
    }
}

/// An autonomous artist agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Unique id
    pub id: String,
    /// Display name
    pub name: String,
    /// Current aesthetic state
    pub personality: Personality,
    /// Everything this artist created, oldest first
    pub portfolio: Vec<Artwork>,
    /// Artists this one works with (mutual)
    pub collaborators: BTreeSet<String>,
    /// Artists this one competes with
    pub rivals: BTreeSet<String>,
    /// Artists this one has met
    pub influences: BTreeSet<String>,
}

impl Artist {
    /// Create an artist from an archetype preset
    pub fn new(id: impl Into<String>, name: impl Into<String>, archetype: Archetype) -> Self {
        Self::with_personality(id, name, Personality::from_archetype(archetype))
    }

    /// Create an artist from an archetype name; unknown names become dreamers
    pub fn from_archetype_name(id: impl Into<String>, name: impl Into<String>, archetype: &str) -> Self {
        Self::new(id, name, Archetype::parse_or_default(archetype))
    }

    /// Create an artist with an explicit personality
    pub fn with_personality(id: impl Into<String>, name: impl Into<String>, personality: Personality) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            personality,
            portfolio: Vec::new(),
            collaborators: BTreeSet::new(),
            rivals: BTreeSet::new(),
            influences: BTreeSet::new(),
        }
    }

    /// The artist's statement about a topic
    pub fn reason_about_art(&self, topic: &str) -> String {
        let p = &self.personality;
        format!(
            "{} contemplates {}. Through {} vision, expressed in {} colors, with {}/10 energy.",
            self.name,
            topic,
            p.mood,
            p.colors.len(),
            p.energy
        )
    }

    /// Create a piece, add it to the portfolio and evolve.
    ///
    /// Samples are drawn in the order topic (only without a theme), title,
    /// emotional state, energy boost (only for curious artists).
    pub fn create_artwork(&mut self, request: CreationRequest, rng: &mut dyn RandomSource) -> Artwork {
        let topic = match request.theme {
            Some(theme) => theme,
            None => random_topic(rng).to_string(),
        };
        let description = self.reason_about_art(&topic);
        let title = title_for(self.personality.archetype, rng);
        let emotional_state = EmotionalState::random(rng);

        let artwork = Artwork {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            creator: self.id.clone(),
            creator_name: self.name.clone(),
            archetype: self.personality.archetype,
            style: self.personality.clone(),
            content: ArtContent::compose(request.form, &self.personality, &topic, &description),
            description,
            emotional_state,
            canvas: Canvas::from_personality(&self.personality),
            collaborators: request.collaborators,
            created_at: Utc::now(),
        };

        self.portfolio.push(artwork.clone());
        self.evolve_after_creation(rng);
        artwork
    }

    /// Visual piece on `theme` or a random topic
    pub fn create_autonomous_art(&mut self, theme: Option<&str>, rng: &mut dyn RandomSource) -> Artwork {
        let mut request = CreationRequest::new();
        request.theme = theme.map(str::to_string);
        self.create_artwork(request, rng)
    }

    fn evolve_after_creation(&mut self, rng: &mut dyn RandomSource) {
        let p = &mut self.personality;
        p.evolution += 0.1;
        if p.curiosity > CREATIVE_CURIOSITY && rng.next_f64() > CREATIVE_ENERGY_GATE {
            p.energy = (p.energy + CREATIVE_ENERGY_BOOST).min(MAX_TRAIT);
        }
    }

    /// Record this artist's side of an encounter with `other_id`
    pub fn record_encounter(&mut self, other_id: &str, kind: RelationshipKind, strategy: RelationshipStrategy) {
        match kind {
            RelationshipKind::Collaborate => {
                self.collaborators.insert(other_id.to_string());
            }
            RelationshipKind::Challenge => {
                self.rivals.insert(other_id.to_string());
            }
            RelationshipKind::Observe | RelationshipKind::Acknowledge => {}
        }
        if strategy.records_influence(kind) {
            self.influences.insert(other_id.to_string());
        }
    }

    /// Meet another artist. Under the energy-gap strategy collaboration is
    /// mutual; nothing else touches `other`.
    pub fn encounter(
        &mut self,
        other: &mut Artist,
        strategy: RelationshipStrategy,
        rng: &mut dyn RandomSource,
    ) -> RelationshipKind {
        let kind = strategy.classify(self.personality.energy, other.personality.energy, rng);
        self.record_encounter(&other.id, kind, strategy);
        if strategy.is_mutual(kind) {
            other.collaborators.insert(self.id.clone());
        }
        kind
    }

    /// Strongest relationship held towards `other_id`
    pub fn relationship_with(&self, other_id: &str) -> Relationship {
        if self.collaborators.contains(other_id) {
            Relationship::Collaborator
        } else if self.rivals.contains(other_id) {
            Relationship::Rival
        } else if self.influences.contains(other_id) {
            Relationship::Observed
        } else {
            Relationship::Unacquainted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn artist(id: &str, archetype: Archetype, energy: f64) -> Artist {
        Artist::with_personality(id, id, Personality::from_archetype(archetype).with_energy(energy))
    }

    #[test]
    fn test_gap_classification() {
        assert_eq!(RelationshipKind::from_energy_gap(2.9), RelationshipKind::Collaborate);
        assert_eq!(RelationshipKind::from_energy_gap(3.0), RelationshipKind::Observe);
        assert_eq!(RelationshipKind::from_energy_gap(6.0), RelationshipKind::Observe);
        assert_eq!(RelationshipKind::from_energy_gap(6.1), RelationshipKind::Challenge);
    }

    #[test]
    fn test_encounter_collaborate_is_mutual() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut x = artist("x", Archetype::Dreamer, 3.0);
        let mut y = artist("y", Archetype::Poet, 2.0);

        let kind = x.encounter(&mut y, RelationshipStrategy::EnergyGap, &mut rng);
        assert_eq!(kind, RelationshipKind::Collaborate);
        assert!(x.collaborators.contains("y"));
        assert!(y.collaborators.contains("x"));
        assert!(x.influences.contains("y"));
        assert!(y.influences.is_empty());
    }

    #[test]
    fn test_encounter_challenge_is_one_sided() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut a = artist("a", Archetype::Dreamer, 3.0);
        let mut b = artist("b", Archetype::Rebel, 10.0);

        assert_eq!(a.encounter(&mut b, RelationshipStrategy::EnergyGap, &mut rng), RelationshipKind::Challenge);
        assert!(a.rivals.contains("b"));
        assert!(a.influences.contains("b"));
        assert!(a.collaborators.is_empty());
        assert!(b.rivals.is_empty());
        assert_eq!(a.relationship_with("b"), Relationship::Rival);
        assert_eq!(b.relationship_with("a"), Relationship::Unacquainted);
    }

    #[test]
    fn test_encounter_observe() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut a = artist("a", Archetype::Architect, 5.0);
        let mut b = artist("b", Archetype::Rebel, 10.0);

        a.encounter(&mut b, RelationshipStrategy::EnergyGap, &mut rng);
        assert!(a.collaborators.is_empty());
        assert!(a.rivals.is_empty());
        assert_eq!(a.relationship_with("b"), Relationship::Observed);
    }

    #[test]
    fn test_relationships_are_additive() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut a = artist("a", Archetype::Dreamer, 3.0);
        let mut b = artist("b", Archetype::Rebel, 10.0);
        a.encounter(&mut b, RelationshipStrategy::EnergyGap, &mut rng);

        a.personality.energy = 9.0;
        a.encounter(&mut b, RelationshipStrategy::EnergyGap, &mut rng);
        assert!(a.rivals.contains("b"));
        assert!(a.collaborators.contains("b"));
        assert_eq!(a.relationship_with("b"), Relationship::Collaborator);
    }

    #[test]
    fn test_random_strategy() {
        let mut a = artist("a", Archetype::Dreamer, 3.0);
        let mut b = artist("b", Archetype::Dreamer, 3.0);
        // 0.2 * 5 = 1 -> rival, even though the energy gap is zero
        let mut rng = ScriptedRandom::new([0.2]);
        assert_eq!(a.encounter(&mut b, RelationshipStrategy::Random, &mut rng), RelationshipKind::Challenge);
        assert!(a.rivals.contains("b"));
        assert!(!a.influences.contains("b"));
    }

    #[test]
    fn test_random_strategy_is_one_sided() {
        let mut a = artist("a", Archetype::Dreamer, 3.0);
        let mut b = artist("b", Archetype::Dreamer, 3.0);
        // collaborator, then admirer
        let mut rng = ScriptedRandom::new([0.0, 0.7]);

        assert_eq!(a.encounter(&mut b, RelationshipStrategy::Random, &mut rng), RelationshipKind::Collaborate);
        assert!(a.collaborators.contains("b"));
        assert!(a.influences.contains("b"));
        assert!(b.collaborators.is_empty());

        let mut c = artist("c", Archetype::Poet, 2.0);
        assert_eq!(a.encounter(&mut c, RelationshipStrategy::Random, &mut rng), RelationshipKind::Acknowledge);
        assert_eq!(a.relationship_with("c"), Relationship::Unacquainted);
        assert!(!a.influences.contains("c"));
    }

    #[test]
    fn test_create_autonomous_art() {
        let mut luna = Artist::new("artist-1", "Luna", Archetype::Dreamer);
        // title 0.0, emotion 0.0, energy boost 0.8 (curiosity 9 > 7)
        let mut rng = ScriptedRandom::new([0.0, 0.0, 0.8]);
        let art = luna.create_autonomous_art(Some("the sea"), &mut rng);

        assert_eq!(art.title, "Cosmic Reverie");
        assert_eq!(art.emotional_state, EmotionalState::Wonder);
        assert_eq!(art.creator, "artist-1");
        assert!(art.description.starts_with("Luna contemplates the sea."));
        assert!(art.description.contains("expressed in 5 colors, with 3/10 energy"));
        assert_eq!(art.style.energy, 3.0);
        assert!(art.canvas.ambient);
        assert_eq!(luna.portfolio.len(), 1);
        assert!((luna.personality.energy - 3.5).abs() < 1e-9);
        assert!((luna.personality.evolution - 0.1).abs() < 1e-9);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_incurious_artist_draws_no_boost_sample() {
        let mut atlas = Artist::new("artist-2", "Atlas", Archetype::Architect);
        let mut rng = ScriptedRandom::new([0.1, 0.5, 0.5, 0.99]);
        atlas.create_autonomous_art(None, &mut rng);
        assert_eq!(atlas.personality.energy, 5.0);
        assert_eq!(rng.remaining(), 1);
    }
}
