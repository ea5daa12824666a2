//! Style evolution engine
//!
//! Artists drift in response to what happens to them: creating, collaborating,
//! reflecting and being influenced. Each event nudges the personality by a
//! small, bounded amount and is recorded in an append-only log.
//!
//! The nudges are a biased random walk gated by coin flips. The thresholds and
//! magnitudes below are part of the observable behavior.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::personality::{clamp_trait, Personality, MAX_TRAIT};
use crate::random::RandomSource;

/// Added to `Personality::evolution` for every processed event
pub const EVOLUTION_STEP: f64 = 0.1;
/// Energy moves by exactly this much, in the direction of the request
pub const ENERGY_NUDGE: f64 = 0.3;
/// Complexity moves by `(r - 0.5) * COMPLEXITY_SPREAD`, i.e. within ±0.2
pub const COMPLEXITY_SPREAD: f64 = 0.4;
/// Curiosity grows only when a sample exceeds this (40% chance)
pub const CURIOSITY_GATE: f64 = 0.6;
/// Curiosity growth per successful flip
pub const CURIOSITY_STEP: f64 = 0.2;
/// A candidate color is adopted only when a sample exceeds this (30% chance)
pub const COLOR_GATE: f64 = 0.7;
/// Number of recent events considered by a reflection
pub const REFLECTION_WINDOW: usize = 10;

/// What caused an evolution event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionKind {
    /// The artist made something
    Creation,
    /// The artist worked with others
    Collaboration,
    /// The artist looked back at its own work
    Reflection,
    /// The artist was exposed to another artist
    Influence,
}

/// Requested personality deltas.
///
/// Only the presence and sign of each field matter; the engine decides the
/// actual magnitude.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleChanges {
    /// Requested energy direction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    /// Requested complexity change (any non-zero value triggers a random step)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<f64>,
    /// Requested curiosity change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curiosity: Option<f64>,
    /// Candidate colors to maybe adopt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl StyleChanges {
    /// No requested changes
    pub fn none() -> Self {
        Self::default()
    }

    /// Request an energy change
    pub fn with_energy(mut self, delta: f64) -> Self {
        self.energy = Some(delta);
        self
    }

    /// Request a complexity change
    pub fn with_complexity(mut self, delta: f64) -> Self {
        self.complexity = Some(delta);
        self
    }

    /// Request a curiosity change
    pub fn with_curiosity(mut self, delta: f64) -> Self {
        self.curiosity = Some(delta);
        self
    }

    /// Offer candidate colors
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }
}

/// `Some(v)` with `v` non-zero and not NaN
fn requested(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// One entry of the evolution log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionEvent {
    /// Event type
    #[serde(rename = "type")]
    pub kind: EvolutionKind,
    /// Free-text description of what caused it
    pub trigger: String,
    /// Requested (not applied) changes
    pub changes: StyleChanges,
    /// When it was processed
    pub timestamp: DateTime<Utc>,
}

/// Aggregate view over an artist's evolution log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Total events processed
    pub total_events: usize,
    /// Creation events
    pub creations: usize,
    /// Collaboration events
    pub collaborations: usize,
    /// Reflection events
    pub reflections: usize,
    /// Influence events
    pub influences: usize,
    /// Mean of requested energy changes (missing counts as 0)
    pub avg_energy: f64,
    /// Current `Personality::evolution`
    pub evolution_score: f64,
}

/// Evolution engine bound to one artist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionEngine {
    history: Vec<EvolutionEvent>,
}

impl EvolutionEngine {
    /// Create an engine with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a stored log, oldest event first
    pub fn from_history(history: Vec<EvolutionEvent>) -> Self {
        Self { history }
    }

    /// Record an event and apply its bounded mutation to `personality`.
    ///
    /// Never fails. Random samples are drawn in the order complexity,
    /// curiosity, colors, and only for fields that were requested.
    pub fn process_event(
        &mut self,
        personality: &mut Personality,
        rng: &mut dyn RandomSource,
        kind: EvolutionKind,
        trigger: impl Into<String>,
        changes: StyleChanges,
    ) {
        Self::apply_changes(personality, rng, &changes);
        personality.evolution += EVOLUTION_STEP;

        let event = EvolutionEvent {
            kind,
            trigger: trigger.into(),
            changes,
            timestamp: Utc::now(),
        };
        debug!(
            kind = ?event.kind,
            trigger = %event.trigger,
            energy = personality.energy,
            complexity = personality.complexity,
            curiosity = personality.curiosity,
            "Processed evolution event"
        );
        self.history.push(event);
    }

    fn apply_changes(p: &mut Personality, rng: &mut dyn RandomSource, changes: &StyleChanges) {
        if let Some(energy) = requested(changes.energy) {
            let step = if energy > 0.0 { ENERGY_NUDGE } else { -ENERGY_NUDGE };
            p.energy = clamp_trait(p.energy + step);
        }

        if requested(changes.complexity).is_some() {
            let drift = (rng.next_f64() - 0.5) * COMPLEXITY_SPREAD;
            p.complexity = clamp_trait(p.complexity + drift);
        }

        // Curious artists become more curious
        if requested(changes.curiosity).is_some()
            && p.curiosity < MAX_TRAIT
            && rng.next_f64() > CURIOSITY_GATE
        {
            p.curiosity = (p.curiosity + CURIOSITY_STEP).min(MAX_TRAIT);
        }

        if let Some(candidates) = &changes.colors {
            if rng.next_f64() > COLOR_GATE && !candidates.is_empty() {
                let color = &candidates[rng.pick_index(candidates.len())];
                p.adopt_color(color);
            }
        }
    }

    /// Describe how the last few events shaped the artist
    pub fn reflect_on_evolution(&self, name: &str, personality: &Personality) -> String {
        let start = self.history.len().saturating_sub(REFLECTION_WINDOW);
        let recent = &self.history[start..];

        let energy_shifts = recent
            .iter()
            .filter(|e| requested(e.changes.energy).is_some())
            .count();
        let complexity_avg = recent
            .iter()
            .map(|e| requested(e.changes.complexity).unwrap_or(5.0))
            .sum::<f64>()
            / recent.len().max(1) as f64;
        let collaborations = recent
            .iter()
            .filter(|e| e.kind == EvolutionKind::Collaboration)
            .count();

        let direction = if personality.energy > 6.0 {
            "becoming more dynamic"
        } else {
            "finding inner peace"
        };
        let drive = if personality.curiosity > 7.0 {
            "Curiosity drives exploration."
        } else {
            "Focus deepens."
        };

        format!(
            "{}'s style has evolved:\n\
             - Energy shifts: {} times\n\
             - Complexity average: {:.1}/10\n\
             - Collaborations: {}\n\n\
             The artist is {}.\n{}",
            name, energy_shifts, complexity_avg, collaborations, direction, drive
        )
    }

    /// Aggregate counts over the whole log
    pub fn stats(&self, personality: &Personality) -> EvolutionStats {
        let count = |kind: EvolutionKind| self.history.iter().filter(|e| e.kind == kind).count();
        let energy_sum: f64 = self
            .history
            .iter()
            .map(|e| e.changes.energy.unwrap_or(0.0))
            .sum();

        EvolutionStats {
            total_events: self.history.len(),
            creations: count(EvolutionKind::Creation),
            collaborations: count(EvolutionKind::Collaboration),
            reflections: count(EvolutionKind::Reflection),
            influences: count(EvolutionKind::Influence),
            avg_energy: energy_sum / self.history.len().max(1) as f64,
            evolution_score: personality.evolution,
        }
    }

    /// Full event log, oldest first
    pub fn timeline(&self) -> Vec<EvolutionEvent> {
        self.history.clone()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personality::{Archetype, MAX_PALETTE};
    use crate::random::{ScriptedRandom, SeededRandom};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_energy_only_sign_matters() {
        let mut engine = EvolutionEngine::new();
        let mut p = Personality::from_archetype(Archetype::Architect);
        let mut rng = ScriptedRandom::constant(0.99);

        engine.process_event(&mut p, &mut rng, EvolutionKind::Creation, "big", StyleChanges::none().with_energy(42.0));
        assert!(approx(p.energy, 5.3));

        engine.process_event(&mut p, &mut rng, EvolutionKind::Creation, "small", StyleChanges::none().with_energy(-0.01));
        assert!(approx(p.energy, 5.0));

        // zero is treated as "not requested"
        engine.process_event(&mut p, &mut rng, EvolutionKind::Creation, "zero", StyleChanges::none().with_energy(0.0));
        assert!(approx(p.energy, 5.0));
        assert_eq!(engine.len(), 3);
    }

    #[test]
    fn test_ten_positive_energy_events() {
        let mut engine = EvolutionEngine::new();
        let mut p = Personality::from_archetype(Archetype::Dreamer);
        let mut rng = SeededRandom::new(7);
        for _ in 0..10 {
            engine.process_event(&mut p, &mut rng, EvolutionKind::Creation, "x", StyleChanges::none().with_energy(1.0));
        }
        assert!(approx(p.energy, 6.0));
        assert!(approx(p.evolution, 1.0));
    }

    #[test]
    fn test_complexity_random_walk_range() {
        let mut engine = EvolutionEngine::new();
        let mut p = Personality::from_archetype(Archetype::Poet);

        let mut high = ScriptedRandom::new([1.0]);
        engine.process_event(&mut p, &mut high, EvolutionKind::Collaboration, "t", StyleChanges::none().with_complexity(0.5));
        assert!(approx(p.complexity, 6.2));

        let mut low = ScriptedRandom::new([0.0]);
        engine.process_event(&mut p, &mut low, EvolutionKind::Collaboration, "t", StyleChanges::none().with_complexity(0.5));
        assert!(approx(p.complexity, 6.0));
    }

    #[test]
    fn test_curiosity_gate() {
        let mut engine = EvolutionEngine::new();
        let mut p = Personality::from_archetype(Archetype::Poet);
        let changes = StyleChanges::none().with_curiosity(1.0);

        let mut miss = ScriptedRandom::new([0.6]);
        engine.process_event(&mut p, &mut miss, EvolutionKind::Reflection, "t", changes.clone());
        assert!(approx(p.curiosity, 7.0));

        let mut hit = ScriptedRandom::new([0.61]);
        engine.process_event(&mut p, &mut hit, EvolutionKind::Reflection, "t", changes.clone());
        assert!(approx(p.curiosity, 7.2));

        // already at the cap: no sample is drawn
        let mut maxed = Personality::from_archetype(Archetype::Alchemist);
        let mut rng = ScriptedRandom::new([0.99]);
        engine.process_event(&mut maxed, &mut rng, EvolutionKind::Reflection, "t", changes);
        assert_eq!(maxed.curiosity, 10.0);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn test_color_adoption() {
        let mut engine = EvolutionEngine::new();
        let mut p = Personality::from_archetype(Archetype::Dreamer);
        let candidates = StyleChanges::none().with_colors(["#111111", "#222222"]);

        let mut miss = ScriptedRandom::new([0.7]);
        engine.process_event(&mut p, &mut miss, EvolutionKind::Influence, "t", candidates.clone());
        assert_eq!(p.colors.len(), 5);

        let mut hit = ScriptedRandom::new([0.8, 0.6]);
        engine.process_event(&mut p, &mut hit, EvolutionKind::Influence, "t", candidates.clone());
        assert_eq!(p.colors.len(), 6);
        assert_eq!(p.colors[5], "#222222");

        let mut hit_again = ScriptedRandom::new([0.8, 0.1]);
        engine.process_event(&mut p, &mut hit_again, EvolutionKind::Influence, "t", candidates);
        assert_eq!(p.colors.len(), MAX_PALETTE);
        assert_eq!(p.colors[0], "#483D8B");
        assert_eq!(p.colors[5], "#111111");
    }

    #[test]
    fn test_stats_and_reflection() {
        let mut engine = EvolutionEngine::new();
        let mut p = Personality::from_archetype(Archetype::Rebel);
        let mut rng = ScriptedRandom::constant(0.5);

        engine.process_event(&mut p, &mut rng, EvolutionKind::Creation, "a", StyleChanges::none().with_energy(2.0));
        engine.process_event(&mut p, &mut rng, EvolutionKind::Collaboration, "b", StyleChanges::none().with_complexity(0.5));
        engine.process_event(&mut p, &mut rng, EvolutionKind::Influence, "c", StyleChanges::none());

        let stats = engine.stats(&p);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.creations, 1);
        assert_eq!(stats.collaborations, 1);
        assert_eq!(stats.influences, 1);
        assert!(approx(stats.avg_energy, 2.0 / 3.0));
        assert!(approx(stats.evolution_score, 0.3));

        let text = engine.reflect_on_evolution("Phoenix", &p);
        assert!(text.starts_with("Phoenix's style has evolved"));
        assert!(text.contains("Energy shifts: 1 times"));
        // (5 + 0.5 + 5) / 3 = 3.5
        assert!(text.contains("Complexity average: 3.5/10"));
        assert!(text.contains("Collaborations: 1"));
        assert!(text.contains("becoming more dynamic"));
        assert!(text.contains("Curiosity drives exploration."));
    }

    #[test]
    fn test_empty_engine() {
        let engine = EvolutionEngine::new();
        let p = Personality::from_archetype(Archetype::Poet);
        let stats = engine.stats(&p);
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.avg_energy, 0.0);

        let text = engine.reflect_on_evolution("Sage", &p);
        assert!(text.contains("Complexity average: 0.0/10"));
        assert!(text.contains("finding inner peace"));
        assert!(engine.timeline().is_empty());
    }
}
