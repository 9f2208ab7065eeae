//! Events that move the envelope between segments.
//!
//! Natural completion and the three control events all funnel into the same
//! step: force a segment index, then advance to the following segment.
//! [`EnvelopeEvent::entry_index`] is that first half, as a pure function of
//! the current index.

use crate::segment::IDLE_INDEX;

/// Cause of a segment transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvelopeEvent {
    /// The level crossed the active segment's boundary.
    NaturalBoundary,
    /// Rising trigger while the gate is held: restart Attack.
    Trigger,
    /// Gate went low: jump to Release.
    GateRelease,
    /// Hard voice reset: silence and return to Idle.
    Reset,
}

impl EnvelopeEvent {
    /// Index to force before advancing, or `None` if the event is ignored
    /// in the current segment.
    ///
    /// Gate release applies during Attack, Decay and Sustain only; Release
    /// is already underway and Idle has nothing to release.
    ///
    /// # Example
    /// ```rust
    /// use contour_core::EnvelopeEvent;
    ///
    /// // Sustain (2) released: stays at 2, next advance enters Release (3)
    /// assert_eq!(EnvelopeEvent::GateRelease.entry_index(2), Some(2));
    /// assert_eq!(EnvelopeEvent::GateRelease.entry_index(3), None);
    /// ```
    pub const fn entry_index(self, current: i32) -> Option<i32> {
        match self {
            EnvelopeEvent::NaturalBoundary => Some(current),
            EnvelopeEvent::Trigger => Some(IDLE_INDEX),
            EnvelopeEvent::GateRelease => {
                if current > IDLE_INDEX && current < 3 {
                    Some(2)
                } else {
                    None
                }
            }
            EnvelopeEvent::Reset => Some(3),
        }
    }
}
