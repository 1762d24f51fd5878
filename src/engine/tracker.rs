//! Bookkeeping for transient voices the breath loop has committed.
//!
//! Lookahead scheduling means cue voices are queued up to 1.5 seconds before
//! they sound; stopping the loop cannot un-send them. The tracker remembers
//! which voice ids are still alive (or pending) so a stop can force-silence
//! exactly those, while letting naturally finished voices age out.

/// Identifier the controller assigns to each scheduled voice.
pub type NodeId = u64;

/// Live transient voices, with the clock time each one naturally ends.
#[derive(Default)]
pub struct NodeTracker {
    entries: Vec<(NodeId, f64)>,
}

impl NodeTracker {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a voice that will have finished by `ends_at` (clock seconds).
    pub fn track(&mut self, id: NodeId, ends_at: f64) {
        self.entries.push((id, ends_at));
    }

    /// Forget voices whose natural end has passed.
    pub fn prune(&mut self, now: f64) {
        self.entries.retain(|&(_, ends_at)| ends_at > now);
    }

    /// Drain every tracked id for force-stopping. Ids already finished on
    /// the mixer side are harmless; the mixer ignores unknown ids.
    pub fn stop_all(&mut self) -> Vec<NodeId> {
        self.entries.drain(..).map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.iter().any(|&(tracked, _)| tracked == id)
    }
}
