//! Personality system for artist agents
//!
//! Every artist starts from one of five archetype presets. The numeric traits
//! (energy, complexity, curiosity) live on a 1.0 to 10.0 scale and are clamped
//! on every mutation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lower bound of every numeric trait
pub const MIN_TRAIT: f64 = 1.0;
/// Upper bound of every numeric trait
pub const MAX_TRAIT: f64 = 10.0;
/// Maximum number of colors an artist keeps in its palette
pub const MAX_PALETTE: usize = 6;

/// Clamp a trait value into `[MIN_TRAIT, MAX_TRAIT]`
pub fn clamp_trait(value: f64) -> f64 {
    value.clamp(MIN_TRAIT, MAX_TRAIT)
}

/// The five artistic archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Ethereal, layered, cosmic
    Dreamer,
    /// Ordered, geometric, calm
    Architect,
    /// Loud, gestural, chaotic
    Rebel,
    /// Soft, fragile, textual
    Poet,
    /// Transformative, symbolic, textured
    Alchemist,
}

impl Archetype {
    /// All archetypes in catalogue order
    pub const ALL: [Archetype; 5] = [
        Archetype::Dreamer,
        Archetype::Architect,
        Archetype::Rebel,
        Archetype::Poet,
        Archetype::Alchemist,
    ];

    /// Lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dreamer => "dreamer",
            Self::Architect => "architect",
            Self::Rebel => "rebel",
            Self::Poet => "poet",
            Self::Alchemist => "alchemist",
        }
    }

    /// Parse a name, falling back to [`Archetype::Dreamer`] for unknown input
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or(Self::Dreamer)
    }

    /// Mood assigned at creation
    pub fn mood(&self) -> Mood {
        match self {
            Self::Dreamer => Mood::Ethereal,
            Self::Architect => Mood::Serene,
            Self::Rebel => Mood::Chaotic,
            Self::Poet => Mood::Subtle,
            Self::Alchemist => Mood::Transformative,
        }
    }

    /// Starting palette
    pub fn palette(&self) -> [&'static str; 5] {
        match self {
            Self::Dreamer => ["#4B0082", "#483D8B", "#9370DB", "#E6E6FA", "#191970"],
            Self::Architect => ["#2F4F4F", "#708090", "#A9A9A9", "#D3D3D3", "#F5F5F5"],
            Self::Rebel => ["#FF0000", "#FF4500", "#DC143C", "#8B0000", "#FF6347"],
            Self::Poet => ["#FFB6C1", "#DDA0DD", "#E6E6FA", "#FFF0F5", "#FFE4E1"],
            Self::Alchemist => ["#FFD700", "#006400", "#4B0082", "#8B4513", "#556B2F"],
        }
    }

    /// Starting (energy, complexity, curiosity)
    pub fn base_traits(&self) -> (f64, f64, f64) {
        match self {
            Self::Dreamer => (3.0, 8.0, 9.0),
            Self::Architect => (5.0, 7.0, 4.0),
            Self::Rebel => (10.0, 9.0, 8.0),
            Self::Poet => (2.0, 6.0, 7.0),
            Self::Alchemist => (6.0, 9.0, 10.0),
        }
    }

    /// Recurring subjects of this archetype
    pub fn themes(&self) -> [&'static str; 4] {
        match self {
            Self::Dreamer => ["dreams", "mysticism", "surrealism", "cosmos"],
            Self::Architect => ["structure", "geometry", "order", "minimalism"],
            Self::Rebel => ["chaos", "rebellion", "passion", "disruption"],
            Self::Poet => ["nature", "fragility", "beauty", "transience"],
            Self::Alchemist => ["transformation", "nature", "symbolism", "alchemy"],
        }
    }

    /// Full studio technique repertoire
    pub fn studio_techniques(&self) -> [&'static str; 4] {
        match self {
            Self::Dreamer => ["layering", "bleeding", "blending", "transparency"],
            Self::Architect => ["precision", "grids", "symmetry", "clean_lines"],
            Self::Rebel => ["gesture", "impasto", "collage", "drips"],
            Self::Poet => ["washes", "stippling", "fine_lines", "text"],
            Self::Alchemist => ["texture", "metallic", "layering", "encaustic"],
        }
    }

    /// Name given to artists created on demand
    pub fn custom_name(&self) -> &'static str {
        match self {
            Self::Dreamer => "Aether",
            Self::Architect => "Pillar",
            Self::Rebel => "Storm",
            Self::Poet => "Whisper",
            Self::Alchemist => "Quicksilver",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == lowered)
            .ok_or_else(|| Error::invalid_input(format!("unknown archetype: {}", s)))
    }
}

/// Emotional register of an artist, fixed by its archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Dreamers
    Ethereal,
    /// Architects
    Serene,
    /// Rebels
    Chaotic,
    /// Poets
    Subtle,
    /// Alchemists
    Transformative,
}

impl Mood {
    /// Lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ethereal => "ethereal",
            Self::Serene => "serene",
            Self::Chaotic => "chaotic",
            Self::Subtle => "subtle",
            Self::Transformative => "transformative",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutable aesthetic state of one artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// Archetype the artist was created from
    pub archetype: Archetype,
    /// Palette, oldest color first
    pub colors: Vec<String>,
    /// Mood (never changed by evolution)
    pub mood: Mood,
    /// Energy (1-10)
    pub energy: f64,
    /// Complexity (1-10)
    pub complexity: f64,
    /// Curiosity (1-10) - how much the artist explores
    pub curiosity: f64,
    /// Accumulated evolution score
    pub evolution: f64,
}

impl Personality {
    /// Preset personality for an archetype
    pub fn from_archetype(archetype: Archetype) -> Self {
        let (energy, complexity, curiosity) = archetype.base_traits();
        Self {
            archetype,
            colors: archetype.palette().iter().map(|c| c.to_string()).collect(),
            mood: archetype.mood(),
            energy,
            complexity,
            curiosity,
            evolution: 0.0,
        }
    }

    /// Override energy (clamped)
    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = clamp_trait(energy);
        self
    }

    /// Override complexity (clamped)
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = clamp_trait(complexity);
        self
    }

    /// Override curiosity (clamped)
    pub fn with_curiosity(mut self, curiosity: f64) -> Self {
        self.curiosity = clamp_trait(curiosity);
        self
    }

    /// Add a color unless already present, evicting the oldest past the cap.
    ///
    /// Returns `true` if the palette changed.
    pub fn adopt_color(&mut self, color: &str) -> bool {
        if self.colors.iter().any(|c| c == color) {
            return false;
        }
        self.colors.push(color.to_string());
        if self.colors.len() > MAX_PALETTE {
            self.colors.remove(0);
        }
        true
    }

    /// Check the trait bounds and palette cap
    pub fn is_within_bounds(&self) -> bool {
        let in_range = |v: f64| (MIN_TRAIT..=MAX_TRAIT).contains(&v);
        in_range(self.energy)
            && in_range(self.complexity)
            && in_range(self.curiosity)
            && self.colors.len() <= MAX_PALETTE
    }

    /// One-line description of the current temperament
    pub fn describe(&self) -> String {
        format!(
            "{} {} - Energy({:.1}/10), Complexity({:.1}/10), Curiosity({:.1}/10), Evolution({:.1})",
            self.mood, self.archetype, self.energy, self.complexity, self.curiosity, self.evolution
        )
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::from_archetype(Archetype::Dreamer)
    }
}
