//! Envelope segment identities.

/// Segment index of the rest state, about to start Attack.
pub const IDLE_INDEX: i32 = -1;

/// One phase of the envelope.
///
/// The state machine works on raw indices (-1 = Idle, 0..=3 =
/// Attack..Release) because several events force an index before stepping
/// to the next one; `Segment` is the typed view of that index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Resting at zero, waiting for a trigger.
    #[default]
    Idle,
    /// Rising toward the peak level.
    Attack,
    /// Falling from the peak toward the sustain level.
    Decay,
    /// Holding the sustain level while the gate is held.
    Sustain,
    /// Falling to zero after the gate is released.
    Release,
}

impl Segment {
    /// Map a raw segment index to its segment. Anything outside 0..=3 is Idle.
    pub const fn from_index(index: i32) -> Self {
        match index {
            0 => Segment::Attack,
            1 => Segment::Decay,
            2 => Segment::Sustain,
            3 => Segment::Release,
            _ => Segment::Idle,
        }
    }

    /// Raw index of this segment.
    pub const fn index(self) -> i32 {
        match self {
            Segment::Idle => IDLE_INDEX,
            Segment::Attack => 0,
            Segment::Decay => 1,
            Segment::Sustain => 2,
            Segment::Release => 3,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Segment::Idle => "Idle",
            Segment::Attack => "Attack",
            Segment::Decay => "Decay",
            Segment::Sustain => "Sustain",
            Segment::Release => "Release",
        }
    }

    /// Returns `true` for segments that hold a flat level.
    pub const fn is_steady(self) -> bool {
        matches!(self, Segment::Idle | Segment::Sustain)
    }
}

impl core::fmt::Display for Segment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
