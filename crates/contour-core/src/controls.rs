//! Control inputs delivered by the host once per control update.
//!
//! Each input carries its current value plus an "updated" flag that the host
//! sets when the value changed since the previous update. Edge-triggered
//! behaviour (trigger, gate release, voice reset) looks at both; level
//! controls only at the value.
//!
//! # Example
//!
//! ```rust
//! use contour_core::EnvelopeControls;
//!
//! let mut controls = EnvelopeControls::default();
//! controls.note_on();
//! assert!(controls.is_trigger_rising());
//!
//! controls.clear_updated();
//! controls.note_off();
//! assert!(controls.is_gate_falling());
//! ```

use crate::settings::EnvelopeSettings;

/// Voice-reset value that requests a hard reset.
pub const VOICE_RESET_ACTIVE: f32 = 1.0;

/// A control value with an "updated this block" flag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Control<T> {
    value: T,
    updated: bool,
}

impl<T: Copy> Control<T> {
    /// A control holding `value`, not marked updated.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            updated: false,
        }
    }

    /// Store a new value and mark the control updated.
    #[inline]
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.updated = true;
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> T {
        self.value
    }

    /// Whether the value was set since the last [`clear_updated`](Self::clear_updated).
    #[inline]
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    /// Clear the updated flag, keeping the value.
    #[inline]
    pub fn clear_updated(&mut self) {
        self.updated = false;
    }
}

/// All inputs of the envelope generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeControls {
    /// Restarts Attack on a rising edge while the gate is held.
    pub trigger: Control<bool>,
    /// Note held. Falling edge starts Release.
    pub gate: Control<bool>,
    /// Attack rate.
    pub attack: Control<f64>,
    /// Decay rate.
    pub decay: Control<f64>,
    /// Sustain level.
    pub sustain: Control<f64>,
    /// Release rate.
    pub release: Control<f64>,
    /// Attack curve amount.
    pub attack_curve: Control<f64>,
    /// Decay curve amount.
    pub decay_curve: Control<f64>,
    /// Release curve amount.
    pub release_curve: Control<f64>,
    /// Hard reset when updated to exactly [`VOICE_RESET_ACTIVE`].
    pub voice_reset: Control<f32>,
}

impl Default for EnvelopeControls {
    fn default() -> Self {
        Self::from_settings(&EnvelopeSettings::default())
    }
}

impl EnvelopeControls {
    /// Controls carrying `settings`, gate low, nothing marked updated.
    pub fn from_settings(settings: &EnvelopeSettings) -> Self {
        Self {
            trigger: Control::new(false),
            gate: Control::new(false),
            attack: Control::new(settings.attack),
            decay: Control::new(settings.decay),
            sustain: Control::new(settings.sustain),
            release: Control::new(settings.release),
            attack_curve: Control::new(settings.attack_curve),
            decay_curve: Control::new(settings.decay_curve),
            release_curve: Control::new(settings.release_curve),
            voice_reset: Control::new(0.0),
        }
    }

    /// Snapshot of the continuous controls.
    pub fn settings(&self) -> EnvelopeSettings {
        EnvelopeSettings {
            attack: self.attack.get(),
            decay: self.decay.get(),
            sustain: self.sustain.get(),
            release: self.release.get(),
            attack_curve: self.attack_curve.get(),
            decay_curve: self.decay_curve.get(),
            release_curve: self.release_curve.get(),
        }
    }

    /// Write every continuous control from `settings`, marking them updated.
    pub fn apply_settings(&mut self, settings: &EnvelopeSettings) {
        self.attack.set(settings.attack);
        self.decay.set(settings.decay);
        self.sustain.set(settings.sustain);
        self.release.set(settings.release);
        self.attack_curve.set(settings.attack_curve);
        self.decay_curve.set(settings.decay_curve);
        self.release_curve.set(settings.release_curve);
    }

    /// Set a continuous control by parameter index (see
    /// [`ENVELOPE_PARAMS`](crate::ENVELOPE_PARAMS)), clamped to its range
    /// and marked updated.
    ///
    /// Returns `false` for an unknown index.
    pub fn set_param(&mut self, index: usize, value: f64) -> bool {
        let mut settings = self.settings();
        if !settings.set(index, value) {
            return false;
        }
        let Some(value) = settings.get(index) else {
            return false;
        };
        let control = match index {
            0 => &mut self.attack,
            1 => &mut self.decay,
            2 => &mut self.sustain,
            3 => &mut self.release,
            4 => &mut self.attack_curve,
            5 => &mut self.decay_curve,
            _ => &mut self.release_curve,
        };
        control.set(value);
        true
    }

    /// Raise gate and trigger together.
    pub fn note_on(&mut self) {
        self.gate.set(true);
        self.trigger.set(true);
    }

    /// Drop gate and trigger.
    pub fn note_off(&mut self) {
        self.gate.set(false);
        self.trigger.set(false);
    }

    /// Pulse the trigger without touching the gate.
    pub fn retrigger(&mut self) {
        self.trigger.set(true);
    }

    /// Request a hard voice reset.
    pub fn request_reset(&mut self) {
        self.voice_reset.set(VOICE_RESET_ACTIVE);
    }

    /// Voice reset was updated to the active value.
    pub fn is_reset_requested(&self) -> bool {
        self.voice_reset.is_updated() && self.voice_reset.get() == VOICE_RESET_ACTIVE
    }

    /// Trigger was updated to high while the gate is high.
    pub fn is_trigger_rising(&self) -> bool {
        self.trigger.is_updated() && self.trigger.get() && self.gate.get()
    }

    /// Gate was updated to low.
    pub fn is_gate_falling(&self) -> bool {
        self.gate.is_updated() && !self.gate.get()
    }

    /// Whether any control was updated.
    pub fn any_updated(&self) -> bool {
        self.trigger.is_updated()
            || self.gate.is_updated()
            || self.attack.is_updated()
            || self.decay.is_updated()
            || self.sustain.is_updated()
            || self.release.is_updated()
            || self.attack_curve.is_updated()
            || self.decay_curve.is_updated()
            || self.release_curve.is_updated()
            || self.voice_reset.is_updated()
    }

    /// Clear every updated flag. Call after the update has been delivered.
    pub fn clear_updated(&mut self) {
        self.trigger.clear_updated();
        self.gate.clear_updated();
        self.attack.clear_updated();
        self.decay.clear_updated();
        self.sustain.clear_updated();
        self.release.clear_updated();
        self.attack_curve.clear_updated();
        self.decay_curve.clear_updated();
        self.release_curve.clear_updated();
        self.voice_reset.clear_updated();
    }
}
