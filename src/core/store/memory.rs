//! In-memory vector store used by tests and offline validation.

use crate::core::error::Result;
use crate::core::store::{IndexPoint, VectorStore};
use crate::core::types::IndexRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A [`VectorStore`] backed by a `HashMap`.
///
/// Behaves like the real backend for sync purposes (upsert replaces by
/// id, deletes are idempotent) and counts every call so tests can assert
/// that skip decisions avoided store traffic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    points: Mutex<HashMap<String, IndexPoint>>,
    upsert_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points currently held
    pub fn len(&self) -> usize {
        self.points.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a point by id, if present
    pub fn get(&self, point_id: &str) -> Option<IndexPoint> {
        self.points
            .lock()
            .ok()
            .and_then(|p| p.get(point_id).cloned())
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn ensure_collection(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, points: &[IndexPoint]) -> Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut held) = self.points.lock() {
            for point in points {
                held.insert(point.id.clone(), point.clone());
            }
        }
        Ok(())
    }

    async fn delete_points(&self, point_ids: &[String]) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut held) = self.points.lock() {
            for id in point_ids {
                held.remove(id);
            }
        }
        Ok(())
    }

    async fn delete_by_file(&self, file_id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut held) = self.points.lock() {
            held.retain(|_, point| point.payload.file_id != file_id);
        }
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<IndexRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut records: Vec<IndexRecord> = self
            .points
            .lock()
            .map(|held| {
                held.iter()
                    .map(|(id, point)| point.payload.to_record(id.clone()))
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by(|a, b| a.point_id.cmp(&b.point_id));
        Ok(records)
    }
}
