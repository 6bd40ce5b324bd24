//! Per-passport in-flight tracking.
//!
//! Only one activation may run for a given passport at a time. A ticket is
//! held for the duration of a run and releases the id when dropped.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex, PoisonError},
};

use crate::passport::PassportId;

#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
  active: Arc<Mutex<HashSet<PassportId>>>,
}

impl InFlightGuard {
  pub fn new() -> Self { Self::default() }

  /// Claim `id`, or `None` if a run for it is already in flight.
  pub fn try_acquire(&self, id: PassportId) -> Option<InFlightTicket> {
    let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
    active.insert(id).then(|| InFlightTicket {
      id,
      active: Arc::clone(&self.active),
    })
  }

  pub fn is_in_flight(&self, id: PassportId) -> bool {
    self
      .active
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .contains(&id)
  }
}

/// Proof that a run for [`InFlightTicket::id`] is in progress.
#[derive(Debug)]
pub struct InFlightTicket {
  id:     PassportId,
  active: Arc<Mutex<HashSet<PassportId>>>,
}

impl InFlightTicket {
  pub fn id(&self) -> PassportId { self.id }
}

impl Drop for InFlightTicket {
  fn drop(&mut self) {
    self
      .active
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&self.id);
  }
}
