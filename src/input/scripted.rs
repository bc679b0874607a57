//! Scripted observation source.
//!
//! A script is newline-delimited JSON, one [`Observation`] per line. Blank
//! lines and lines starting with `#` are skipped.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::{Observation, ObservationSource};

/// Replays a fixed list of observations in order
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    queue: VecDeque<Observation>,
}

impl ScriptedSource {
    pub fn new(observations: impl IntoIterator<Item = Observation>) -> Self {
        Self {
            queue: observations.into_iter().collect(),
        }
    }

    /// Parse an NDJSON script
    pub fn parse(text: &str) -> Result<Self> {
        let mut queue = VecDeque::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let obs: Observation = serde_json::from_str(line)
                .with_context(|| format!("invalid observation on line {}", idx + 1))?;
            queue.push_back(obs);
        }
        Ok(Self { queue })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse script {}", path.display()))
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ObservationSource for ScriptedSource {
    fn next_observation(&mut self) -> Option<Observation> {
        self.queue.pop_front()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
