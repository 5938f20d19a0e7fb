//! Concurrent store of the latest point per key.

use super::Point;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

/// Errors returned by [`PointStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("point does not exist: {0}")]
    NotFound(String),
}

/// Keyed container holding the latest [`Point`] for every measurement.
///
/// The lock is taken for a single map operation at a time. A [`keys`]
/// snapshot may therefore be stale by the time the caller reads each key,
/// but every individual `set`/`get` is atomic.
///
/// Counter points are replaced wholesale: rsyslog already reports
/// cumulative values, so the store never adds a new value to an old one.
///
/// [`keys`]: PointStore::keys
#[derive(Debug, Default)]
pub struct PointStore {
    points: RwLock<HashMap<String, Point>>,
}

impl PointStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the point, replacing any point with the same key.
    pub fn set(&self, point: Point) -> Result<(), StoreError> {
        let key = point.key();
        self.points.write().insert(key, point);
        Ok(())
    }

    /// Returns a copy of the point stored under `key`.
    pub fn get(&self, key: &str) -> Result<Point, StoreError> {
        self.points
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    /// Removes a key. Not used by the ingest path.
    pub fn delete(&self, key: &str) -> Option<Point> {
        self.points.write().remove(key)
    }

    /// Returns all known keys in lexicographic order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.points.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    /// Returns true if no point has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }
}
