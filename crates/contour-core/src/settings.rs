//! Envelope configuration as a struct of named fields.

use crate::param_info::{ParamDescriptor, ParamId};

/// Descriptors for the continuous envelope controls, in parameter-index order.
pub const ENVELOPE_PARAMS: [ParamDescriptor; 7] = [
    ParamDescriptor::rate("Attack", "Attack", 0.3).with_id(ParamId(100), "attack"),
    ParamDescriptor::rate("Decay", "Decay", 0.5).with_id(ParamId(101), "decay"),
    ParamDescriptor::level("Sustain", "Sustain", 0.7).with_id(ParamId(102), "sustain"),
    ParamDescriptor::rate("Release", "Release", 0.5).with_id(ParamId(103), "release"),
    ParamDescriptor::curve("Attack Curve", "A Curve", 0.5).with_id(ParamId(104), "attack_curve"),
    ParamDescriptor::curve("Decay Curve", "D Curve", 0.5).with_id(ParamId(105), "decay_curve"),
    ParamDescriptor::curve("Release Curve", "R Curve", 0.5)
        .with_id(ParamId(106), "release_curve"),
];

/// Rates, curve amounts and sustain level of an envelope.
///
/// Rates are voltage-like (1.0 = 10 V) and map exponentially to the time of
/// a full-scale swing. Curve amounts are signed: positive for normal
/// (concave-down) segments, negative for inverted ones.
///
/// # Example
///
/// ```rust
/// use contour_core::EnvelopeSettings;
///
/// let settings = EnvelopeSettings {
///     attack: 0.1,
///     sustain: 1.4,
///     ..EnvelopeSettings::default()
/// }
/// .sanitized();
/// assert_eq!(settings.sustain, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSettings {
    /// Attack rate.
    pub attack: f64,
    /// Decay rate.
    pub decay: f64,
    /// Sustain level, 0..1.
    pub sustain: f64,
    /// Release rate.
    pub release: f64,
    /// Attack curve amount.
    pub attack_curve: f64,
    /// Decay curve amount.
    pub decay_curve: f64,
    /// Release curve amount.
    pub release_curve: f64,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        Self {
            attack: ENVELOPE_PARAMS[0].default,
            decay: ENVELOPE_PARAMS[1].default,
            sustain: ENVELOPE_PARAMS[2].default,
            release: ENVELOPE_PARAMS[3].default,
            attack_curve: ENVELOPE_PARAMS[4].default,
            decay_curve: ENVELOPE_PARAMS[5].default,
            release_curve: ENVELOPE_PARAMS[6].default,
        }
    }
}

impl EnvelopeSettings {
    /// Sustain clamped to 0..1 and curve amounts to -1..1.
    ///
    /// Rates are left alone: the curve solver clamps them to
    /// [`MAX_RATE`](crate::curve::MAX_RATE) itself.
    pub fn sanitized(self) -> Self {
        Self {
            sustain: self.sustain.clamp(0.0, 1.0),
            attack_curve: self.attack_curve.clamp(-1.0, 1.0),
            decay_curve: self.decay_curve.clamp(-1.0, 1.0),
            release_curve: self.release_curve.clamp(-1.0, 1.0),
            ..self
        }
    }

    /// Value by parameter index.
    pub fn get(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.attack),
            1 => Some(self.decay),
            2 => Some(self.sustain),
            3 => Some(self.release),
            4 => Some(self.attack_curve),
            5 => Some(self.decay_curve),
            6 => Some(self.release_curve),
            _ => None,
        }
    }

    /// Set by parameter index, clamped to the descriptor range.
    ///
    /// Returns `false` for an unknown index.
    pub fn set(&mut self, index: usize, value: f64) -> bool {
        let Some(desc) = ENVELOPE_PARAMS.get(index) else {
            return false;
        };
        let value = desc.clamp(value);
        match index {
            0 => self.attack = value,
            1 => self.decay = value,
            2 => self.sustain = value,
            3 => self.release = value,
            4 => self.attack_curve = value,
            5 => self.decay_curve = value,
            _ => self.release_curve = value,
        }
        true
    }
}
