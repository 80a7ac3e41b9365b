use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::Result;

/// Start/stop hooks the host calls around a component's lifetime.
///
/// `start` runs before the component sees any event; after `stop` no further
/// events are delivered to it.
pub trait Lifecycle {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Active,
    Destroyed,
}

/// Owner side of a liveness flag. Revoked when the component is stopped.
#[derive(Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    pub fn token(&self) -> LivenessToken {
        LivenessToken(Arc::clone(&self.0))
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Copy of the liveness flag carried by work that may outlive its component.
#[derive(Debug, Clone)]
pub struct LivenessToken(Arc<AtomicBool>);

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
