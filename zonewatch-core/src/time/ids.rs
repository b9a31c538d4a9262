use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::model::AlertId;

/// Mints alert ids.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> AlertId;
}

/// Random UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> AlertId {
        AlertId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic ids: `alert-000001`, `alert-000002`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> AlertId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        AlertId::new(format!("alert-{n:06}"))
    }
}
