//! Admission gate bounding the number of jobs in flight
//!
//! A counting semaphore shared by every job task, instrumented so the number
//! of simultaneously held permits can be observed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Fixed-capacity gate shared by all jobs of a run
///
/// Cloning yields another handle to the same gate.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

/// A held gate slot, released when dropped
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `capacity` holders at once
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Waits for a free slot
    ///
    /// Waiters are admitted in the order they started waiting.
    pub async fn acquire(&self) -> Result<GatePermit, AcquireError> {
        let permit = self.semaphore.clone().acquire_owned().await?;

        let held = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(held, Ordering::SeqCst);

        Ok(GatePermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Maximum number of simultaneous holders
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of permits ever held at the same time
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        // Runs before the semaphore permit field is dropped, so the counter
        // never exceeds the capacity.
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
