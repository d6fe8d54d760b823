use std::fmt;

use crate::song::clip::ClipId;

/// Notifications emitted to views and caches observing a track's clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEvent {
  /// Data or extent changed, any derived visualization is stale.
  Changed,
  /// Only the playback direction flipped, peak data is still valid.
  Reversed,
  /// The clip left its track.
  Removed,
}

pub trait ClipObserver {
  fn notify(&mut self, clip: ClipId, event: ClipEvent);
}

impl<F> ClipObserver for F
where
  F: FnMut(ClipId, ClipEvent),
{
  fn notify(&mut self, clip: ClipId, event: ClipEvent) {
    (self)(clip, event)
  }
}

pub type SubscriptionId = usize;

#[derive(Default)]
pub struct Observers {
  next_id: SubscriptionId,
  observers: Vec<(SubscriptionId, Box<dyn ClipObserver>)>,
}

impl Observers {
  pub fn new() -> Observers {
    Observers::default()
  }

  pub fn subscribe(&mut self, observer: Box<dyn ClipObserver>) -> SubscriptionId {
    let id = self.next_id;
    self.next_id += 1;
    self.observers.push((id, observer));
    id
  }

  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let len = self.observers.len();
    self.observers.retain(|(observer_id, _)| *observer_id != id);
    self.observers.len() != len
  }

  pub fn len(&self) -> usize {
    self.observers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.observers.is_empty()
  }

  pub fn notify(&mut self, clip: ClipId, event: ClipEvent) {
    for (_, observer) in self.observers.iter_mut() {
      observer.notify(clip, event);
    }
  }
}

impl fmt::Debug for Observers {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Observers")
      .field("count", &self.observers.len())
      .finish()
  }
}
