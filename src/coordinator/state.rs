//! Cache contents and refresh bookkeeping.

use std::sync::Arc;
use std::time::SystemTime;

use crate::api::{FailureKind, FetchError, MedalPayload};

/// Last refresh failure, kept for display.
#[derive(Debug, Clone)]
pub struct RefreshFailure {
    pub kind: FailureKind,
    pub message: String,
    pub timestamp: SystemTime,
}

/// One cached payload plus refresh status.
///
/// The payload is swapped as a whole; readers clone the `Arc` and never
/// see a half-written value.
#[derive(Debug)]
pub struct CacheState {
    payload: Option<Arc<MedalPayload>>,
    last_update_success: bool,
    last_error: Option<RefreshFailure>,
    last_success_at: Option<SystemTime>,
    generation: u64,
    disposed: bool,
}

impl CacheState {
    pub fn new() -> Self {
        Self {
            payload: None,
            last_update_success: true,
            last_error: None,
            last_success_at: None,
            generation: 0,
            disposed: false,
        }
    }

    /// Replaces the payload and returns the new generation.
    ///
    /// Returns `None` once the cache is disposed; the payload is dropped.
    pub fn store(&mut self, payload: MedalPayload) -> Option<u64> {
        if self.disposed {
            return None;
        }

        self.payload = Some(Arc::new(payload));
        self.last_update_success = true;
        self.last_error = None;
        self.last_success_at = Some(SystemTime::now());
        self.generation += 1;
        Some(self.generation)
    }

    /// Records a failed refresh. The previous payload is kept.
    pub fn record_failure(&mut self, err: &FetchError) -> bool {
        if self.disposed {
            return false;
        }

        self.last_update_success = false;
        self.last_error = Some(RefreshFailure {
            kind: err.kind(),
            message: err.to_string(),
            timestamp: SystemTime::now(),
        });
        true
    }

    /// Drops the payload and refuses further writes.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.payload = None;
    }

    pub fn payload(&self) -> Option<Arc<MedalPayload>> {
        self.payload.clone()
    }

    pub fn last_update_success(&self) -> bool {
        self.last_update_success
    }

    pub fn last_error(&self) -> Option<RefreshFailure> {
        self.last_error.clone()
    }

    pub fn last_success_at(&self) -> Option<SystemTime> {
        self.last_success_at
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for CacheState {
    fn default() -> Self {
        Self::new()
    }
}
