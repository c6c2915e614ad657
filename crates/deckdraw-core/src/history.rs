//! Linear undo/redo history built from full-scene snapshots.

use crate::shapes::{SerializableColor, Shape};
use serde::{Deserialize, Serialize};

/// Default maximum number of snapshots to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Scene state captured at one committed mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Objects back to front; list order is z-order.
    pub objects: Vec<Shape>,
    pub background_color: SerializableColor,
}

impl HistorySnapshot {
    pub fn new(objects: Vec<Shape>, background_color: SerializableColor) -> Self {
        Self {
            objects,
            background_color,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Snapshot sequence plus a cursor at the active entry.
///
/// Recording after an undo discards everything past the cursor.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    snapshots: Vec<HistorySnapshot>,
    /// `None` while the history is empty.
    cursor: Option<usize>,
    /// Maximum snapshots kept; 0 = unbounded.
    limit: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    /// Create an empty history with the default limit.
    pub fn new() -> Self {
        Self::with_limit(MAX_UNDO_HISTORY)
    }

    /// Create an empty history keeping at most `limit` snapshots (0 = unbounded).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: None,
            limit,
        }
    }

    /// Record a new snapshot as the active entry.
    pub fn record(&mut self, snapshot: HistorySnapshot) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        let discarded = self.snapshots.len() - keep;
        if discarded > 0 {
            log::debug!("Discarding {} redo snapshot(s)", discarded);
        }
        self.snapshots.truncate(keep);
        self.snapshots.push(snapshot);

        if self.limit > 0 && self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Step back one entry and return the snapshot to restore.
    /// Returns `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.snapshots.get(c - 1)
            }
            _ => None,
        }
    }

    /// Step forward one entry and return the snapshot to restore.
    /// Returns `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        match self.cursor {
            Some(c) if c + 1 < self.snapshots.len() => {
                self.cursor = Some(c + 1);
                self.snapshots.get(c + 1)
            }
            _ => None,
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.snapshots.len())
    }

    /// Index of the active snapshot, `None` if empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The active snapshot.
    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.cursor.and_then(|c| self.snapshots.get(c))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;
    use kurbo::Point;

    /// Snapshot tagged by its object count so tests can tell them apart.
    fn snap(count: usize) -> HistorySnapshot {
        let objects = (0..count)
            .map(|i| Shape::Rectangle(Rectangle::new(Point::new(i as f64, 0.0), 10.0, 10.0)))
            .collect();
        HistorySnapshot::new(objects, SerializableColor::white())
    }

    #[test]
    fn test_empty_history() {
        let mut history = HistoryManager::new();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_moves_cursor() {
        let mut history = HistoryManager::new();
        history.record(snap(1));
        history.record(snap(2));
        history.record(snap(3));
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.current().map(|s| s.len()), Some(3));
    }

    #[test]
    fn test_undo_then_record_truncates() {
        let mut history = HistoryManager::new();
        history.record(snap(1));
        history.record(snap(2));
        history.record(snap(3));

        let restored = history.undo().map(|s| s.len());
        assert_eq!(restored, Some(2));
        assert_eq!(history.cursor(), Some(1));

        history.record(snap(5));
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.current().map(|s| s.len()), Some(5));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_floor() {
        let mut history = HistoryManager::new();
        history.record(snap(1));
        assert_eq!(history.cursor(), Some(0));

        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), Some(0));
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_redo_symmetry() {
        let mut history = HistoryManager::new();
        history.record(snap(1));
        history.record(snap(2));

        assert_eq!(history.undo().map(|s| s.len()), Some(1));
        assert!(history.can_redo());
        assert_eq!(history.redo().map(|s| s.len()), Some(2));
        assert_eq!(history.cursor(), Some(1));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = HistoryManager::with_limit(3);
        for i in 1..=5 {
            history.record(snap(i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));

        assert_eq!(history.undo().map(|s| s.len()), Some(4));
        assert_eq!(history.undo().map(|s| s.len()), Some(3));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_unbounded_limit() {
        let mut history = HistoryManager::with_limit(0);
        for i in 0..200 {
            history.record(snap(i % 3));
        }
        assert_eq!(history.len(), 200);
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryManager::new();
        history.record(snap(1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn test_snapshot_json_keeps_order() {
        let snapshot = snap(3);
        let ids: Vec<_> = snapshot.objects.iter().map(|s| s.id()).collect();
        let json = snapshot.to_json().unwrap();
        let back: HistorySnapshot = serde_json::from_str(&json).unwrap();
        let back_ids: Vec<_> = back.objects.iter().map(|s| s.id()).collect();
        assert_eq!(ids, back_ids);
        assert_eq!(back.background_color, SerializableColor::white());
    }
}
