//! Influence network
//!
//! Tracks, for one observing artist, how strongly each other artist has
//! influenced it. The first exposure sets the strength; later exposures only
//! contribute a tenth of the new sample.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Share of a repeat sample that is added to an existing record
pub const REPEAT_WEIGHT: f64 = 0.1;
/// Default size of a top-influences query
pub const DEFAULT_TOP: usize = 3;
/// Number of entries shown by [`InfluenceNetwork::visualization`]
pub const VISUALIZATION_TOP: usize = 5;

/// Accumulated influence from one source artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceRecord {
    /// Source artist
    pub agent_id: String,
    /// Strength in `[0, 1]`
    pub strength: f64,
    /// Number of exposures
    pub events: u32,
}

/// Influence records of one observer, in first-seen order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfluenceNetwork {
    records: Vec<InfluenceRecord>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl InfluenceNetwork {
    /// Empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an exposure to `agent_id`
    pub fn add_influence(&mut self, agent_id: &str, strength: f64) {
        self.reindex_if_stale();
        match self.index.get(agent_id) {
            Some(&pos) => {
                let record = &mut self.records[pos];
                record.strength = (record.strength + strength * REPEAT_WEIGHT).clamp(0.0, 1.0);
                record.events += 1;
            }
            None => {
                self.index.insert(agent_id.to_string(), self.records.len());
                self.records.push(InfluenceRecord {
                    agent_id: agent_id.to_string(),
                    strength: strength.clamp(0.0, 1.0),
                    events: 1,
                });
            }
        }
    }

    /// Up to `limit` records, strongest first.
    ///
    /// Ties keep first-seen order; callers should not rely on it.
    pub fn top_influences(&self, limit: usize) -> Vec<InfluenceRecord> {
        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        ranked.truncate(limit);
        ranked
    }

    /// Record for one source, if any
    pub fn get(&self, agent_id: &str) -> Option<&InfluenceRecord> {
        self.records.iter().find(|r| r.agent_id == agent_id)
    }

    /// Bar chart of the strongest influences
    pub fn visualization(&self) -> String {
        self.top_influences(VISUALIZATION_TOP)
            .iter()
            .map(|r| {
                let bar = "█".repeat((r.strength * 10.0).floor() as usize);
                format!("{}: {} {:.0}%", r.agent_id, bar, r.strength * 100.0)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of distinct sources
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no influence has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // The index is not serialized; rebuild it after deserialization.
    fn reindex_if_stale(&mut self) {
        if self.index.len() != self.records.len() {
            self.index = self
                .records
                .iter()
                .enumerate()
                .map(|(i, r)| (r.agent_id.clone(), i))
                .collect();
        }
    }
}
