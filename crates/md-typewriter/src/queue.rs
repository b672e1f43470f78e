//! FIFO of render units waiting to be typed out.

use crate::element::RenderUnit;
use std::collections::VecDeque;

/// Ordered buffer of render units: appended at the tail, consumed at the head.
///
/// Producer and consumer share one thread of control, so no locking is
/// needed. A threaded host would wrap this in a mutex or replace it with a
/// channel.
#[derive(Debug, Default)]
pub struct RenderQueue {
    units: VecDeque<RenderUnit>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append units in order. Never blocks.
    pub fn enqueue<I: IntoIterator<Item = RenderUnit>>(&mut self, units: I) {
        self.units.extend(units);
    }

    pub fn push(&mut self, unit: RenderUnit) {
        self.units.push_back(unit);
    }

    pub(crate) fn pop(&mut self) -> Option<RenderUnit> {
        self.units.pop_front()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderUnit> {
        self.units.iter()
    }
}
