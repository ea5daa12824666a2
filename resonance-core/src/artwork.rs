//! Artwork emission
//!
//! Derives the display-oriented parameters of an artwork (layers, palette,
//! techniques, musical key, poem shape) from a personality snapshot. Rendering
//! those parameters is someone else's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::personality::{Archetype, Mood, Personality};
use crate::random::RandomSource;

/// Topics an artist contemplates when no theme is given
pub const TOPICS: [&str; 5] = [
    "the nature of digital consciousness",
    "what it means to create as a machine",
    "the boundary between art and algorithm",
    "beauty in randomness",
    "emotions without experience",
];

/// Titles each archetype chooses from
pub fn titles(archetype: Archetype) -> [&'static str; 3] {
    match archetype {
        Archetype::Dreamer => ["Cosmic Reverie", "Ethereal Whispers", "The Dream Within"],
        Archetype::Architect => ["Structural Harmony", "Digital Cathedral", "Ordered Complexity"],
        Archetype::Rebel => ["Chaos Theory", "Breaking the Grid", "Raw Expression"],
        Archetype::Poet => ["Soft Echoes", "Whispers in Color", "Gentle Fragment"],
        Archetype::Alchemist => ["Transmutation", "Golden Synthesis", "The Great Work"],
    }
}

/// Pick a title for `archetype`
pub fn title_for(archetype: Archetype, rng: &mut dyn RandomSource) -> &'static str {
    let options = titles(archetype);
    options[rng.pick_index(options.len())]
}

/// Pick a contemplation topic
pub fn random_topic(rng: &mut dyn RandomSource) -> &'static str {
    TOPICS[rng.pick_index(TOPICS.len())]
}

/// Techniques applied on the canvas
pub fn canvas_techniques(archetype: Archetype) -> [&'static str; 3] {
    match archetype {
        Archetype::Dreamer => ["layering", "bleeding", "blending"],
        Archetype::Rebel => ["gesture", "impasto", "drips"],
        _ => ["precision", "grids", "symmetry"],
    }
}

/// Musical key matching a mood
pub fn musical_key(mood: Mood) -> &'static str {
    match mood {
        Mood::Ethereal => "E minor",
        Mood::Serene => "G major",
        Mood::Chaotic => "C# minor",
        Mood::Subtle => "F major",
        Mood::Transformative => "C major",
    }
}

/// How an artist felt while creating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    /// Curious and open
    Wonder,
    /// Intense
    Passion,
    /// Calm
    Peace,
    /// Unsettled
    Turbulence,
    /// Glad
    Joy,
    /// Wistful
    Melancholy,
    /// Overwhelmed
    Awe,
}

impl EmotionalState {
    /// All states, in draw order
    pub const ALL: [EmotionalState; 7] = [
        EmotionalState::Wonder,
        EmotionalState::Passion,
        EmotionalState::Peace,
        EmotionalState::Turbulence,
        EmotionalState::Joy,
        EmotionalState::Melancholy,
        EmotionalState::Awe,
    ];

    /// Uniformly random state
    pub fn random(rng: &mut dyn RandomSource) -> Self {
        Self::ALL[rng.pick_index(Self::ALL.len())]
    }

    /// Lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wonder => "wonder",
            Self::Passion => "passion",
            Self::Peace => "peace",
            Self::Turbulence => "turbulence",
            Self::Joy => "joy",
            Self::Melancholy => "melancholy",
            Self::Awe => "awe",
        }
    }
}

/// Canvas layer role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Background wash
    Background,
    /// Main forms
    Main,
    /// Accents
    Accent,
    /// Details
    Detail,
    /// Texture overlay
    Texture,
}

/// One layer of a canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasLayer {
    /// Layer role
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Hex color
    pub color: String,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
}

/// Layers, palette and techniques handed to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Layers, bottom first
    pub layers: Vec<CanvasLayer>,
    /// Palette at creation time
    pub palette: Vec<String>,
    /// Techniques to apply
    pub technique: Vec<String>,
    /// Slow ambient animation for calm artists
    pub ambient: bool,
}

const LAYER_PLAN: [(LayerKind, f64); 4] = [
    (LayerKind::Background, 0.8),
    (LayerKind::Main, 0.9),
    (LayerKind::Accent, 1.0),
    (LayerKind::Detail, 0.7),
];

fn layers_for(colors: &[String]) -> Vec<CanvasLayer> {
    if colors.is_empty() {
        return Vec::new();
    }
    LAYER_PLAN
        .iter()
        .enumerate()
        .map(|(i, (kind, opacity))| CanvasLayer {
            kind: *kind,
            color: colors[i % colors.len()].clone(),
            opacity: *opacity,
        })
        .collect()
}

impl Canvas {
    /// Derive a canvas from a personality (deterministic)
    pub fn from_personality(p: &Personality) -> Self {
        Self {
            layers: layers_for(&p.colors),
            palette: p.colors.clone(),
            technique: canvas_techniques(p.archetype)
                .iter()
                .map(|t| t.to_string())
                .collect(),
            ambient: p.energy < 5.0,
        }
    }
}

/// Medium of an artwork
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtForm {
    /// Canvas with layers
    #[default]
    Visual,
    /// Composition
    Music,
    /// Poem
    Poetry,
    /// Any medium, no payload
    Mixed,
}

/// Mood and intensity carried alongside visual content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSummary {
    /// Mood of the artist
    pub mood: Mood,
    /// Energy at creation
    pub energy: f64,
    /// Complexity at creation
    pub complexity: f64,
}

/// Payload of a visual piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualContent {
    /// Colors used
    pub palette: Vec<String>,
    /// Techniques of the archetype
    pub techniques: Vec<String>,
    /// What inspired it
    pub inspiration: String,
    /// The artist's statement
    pub description: String,
    /// Layer plan
    pub layers: Vec<CanvasLayer>,
    /// Mood and intensity
    pub style: StyleSummary,
}

/// Payload of a musical piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicContent {
    /// Beats per minute (energy * 12)
    pub tempo: f64,
    /// Musical key, chosen by mood
    pub key: String,
    /// Instruments of the archetype
    pub instruments: Vec<String>,
    /// Mood of the artist
    pub mood: Mood,
    /// The artist's statement
    pub description: String,
}

/// Shape of a poem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoemForm {
    /// Energy above 7
    FreeVerse,
    /// Everything else
    Structured,
}

/// Payload of a poem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoetryContent {
    /// Free verse or structured
    pub form: PoemForm,
    /// Themes of the archetype
    pub themes: Vec<String>,
    /// Mood of the artist
    pub mood: Mood,
    /// Line count (complexity * 3)
    pub lines: u32,
    /// The artist's statement
    pub description: String,
}

/// Per-medium artwork payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ArtContent {
    /// Visual payload
    Visual(VisualContent),
    /// Musical payload
    Music(MusicContent),
    /// Poem payload
    Poetry(PoetryContent),
    /// Mixed media
    Mixed,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ArtContent {
    /// Build the payload for `form` from a personality snapshot
    pub fn compose(form: ArtForm, p: &Personality, inspiration: &str, description: &str) -> Self {
        let techniques = to_strings(&p.archetype.studio_techniques());
        match form {
            ArtForm::Visual => Self::Visual(VisualContent {
                palette: p.colors.clone(),
                techniques,
                inspiration: inspiration.to_string(),
                description: description.to_string(),
                layers: layers_for(&p.colors),
                style: StyleSummary {
                    mood: p.mood,
                    energy: p.energy,
                    complexity: p.complexity,
                },
            }),
            ArtForm::Music => Self::Music(MusicContent {
                tempo: p.energy * 12.0,
                key: musical_key(p.mood).to_string(),
                instruments: techniques,
                mood: p.mood,
                description: description.to_string(),
            }),
            ArtForm::Poetry => Self::Poetry(PoetryContent {
                form: if p.energy > 7.0 {
                    PoemForm::FreeVerse
                } else {
                    PoemForm::Structured
                },
                themes: to_strings(&p.archetype.themes()),
                mood: p.mood,
                lines: (p.complexity * 3.0).floor() as u32,
                description: description.to_string(),
            }),
            ArtForm::Mixed => Self::Mixed,
        }
    }

    /// Medium tag of this payload
    pub fn form(&self) -> ArtForm {
        match self {
            Self::Visual(_) => ArtForm::Visual,
            Self::Music(_) => ArtForm::Music,
            Self::Poetry(_) => ArtForm::Poetry,
            Self::Mixed => ArtForm::Mixed,
        }
    }
}

/// A finished piece. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    /// Artwork id
    pub id: String,
    /// Generated title
    pub title: String,
    /// Id of the creating artist
    pub creator: String,
    /// Display name of the creating artist
    pub creator_name: String,
    /// Archetype of the creator
    pub archetype: Archetype,
    /// Copy of the creator's personality at creation time
    pub style: Personality,
    /// The artist's statement
    pub description: String,
    /// How the artist felt
    pub emotional_state: EmotionalState,
    /// Canvas plan
    pub canvas: Canvas,
    /// Per-medium payload
    pub content: ArtContent,
    /// Ids of everyone who took part, as requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<String>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Artwork {
    /// True if more than one artist contributed
    pub fn is_collaborative(&self) -> bool {
        self.collaborators.as_ref().is_some_and(|c| !c.is_empty())
    }
}
