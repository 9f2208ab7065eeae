//! Exponential-segment ADSR envelope generator.
//!
//! The generator walks through Attack, Decay, Sustain and Release, each a
//! segment solved by the curve solver in [`crate::curve`]. Curved segments
//! end when the level crosses their boundary; flat segments (Sustain, Idle)
//! hold until a control event moves them on.
//!
//! ```text
//!          Attack   Decay     Sustain        Release
//!   1.0 ─    ╱╲
//!           ╱  ╲___
//!   sus ─  ╱       ‾‾‾──────────────────╲
//!         ╱                              ╲___
//!   0.0 ─╱                                   ‾‾──── Idle
//!        ^ trigger + gate                ^ gate off
//! ```
//!
//! Every transition, natural or event-driven, goes through
//! [`CurveEnvelope::transition`].

use crate::controls::EnvelopeControls;
use crate::curve::{CurveCoefficients, PEAK_LEVEL, solve_curve, solve_steady_state};
use crate::event::EnvelopeEvent;
use crate::modulation::ModulationSource;
use crate::param_info::{ParamDescriptor, ParameterInfo};
use crate::processor::{BlockProcessor, StreamingChange};
use crate::segment::{IDLE_INDEX, Segment};
use crate::settings::{ENVELOPE_PARAMS, EnvelopeSettings};

/// Level every segment after Release falls to.
const END_LEVEL: f64 = 0.0;

/// ADSR envelope with per-segment exponential curve shaping.
///
/// One instance per voice. Level and recurrence state are `f64`; output
/// buffers are `f32`.
///
/// # Example
///
/// ```rust
/// use contour_core::{CurveEnvelope, EnvelopeSettings, Segment};
///
/// let mut env = CurveEnvelope::with_settings(
///     48000.0,
///     EnvelopeSettings {
///         attack: 0.0, // 1 ms full swing
///         sustain: 0.6,
///         ..EnvelopeSettings::default()
///     },
/// );
///
/// env.note_on();
/// assert_eq!(env.segment(), Segment::Attack);
///
/// let mut block = [0.0f32; 256];
/// env.process_block(&mut block, 0);
/// assert_eq!(env.segment(), Segment::Decay);
///
/// env.note_off();
/// assert_eq!(env.segment(), Segment::Release);
/// ```
#[derive(Debug, Clone)]
pub struct CurveEnvelope {
    level: f64,
    curve: CurveCoefficients,
    /// Intended arrival level of the active segment.
    segment_target: f64,
    segment_index: i32,
    sample_rate: f64,
    settings: EnvelopeSettings,
    streaming: bool,
    streaming_change: Option<StreamingChange>,
    /// Absolute position of the next sample to be produced.
    position: u64,
}

impl Default for CurveEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl CurveEnvelope {
    /// Create an idle envelope with default settings.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_settings(sample_rate, EnvelopeSettings::default())
    }

    /// Create an idle envelope with the given settings.
    pub fn with_settings(sample_rate: f64, settings: EnvelopeSettings) -> Self {
        Self {
            level: END_LEVEL,
            curve: solve_steady_state(END_LEVEL),
            segment_target: END_LEVEL,
            segment_index: IDLE_INDEX,
            sample_rate,
            settings: settings.sanitized(),
            streaming: false,
            streaming_change: Some(StreamingChange {
                position: 0,
                streaming: false,
            }),
            position: 0,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &EnvelopeSettings {
        &self.settings
    }

    /// Replace the settings. Segments already running keep their curve;
    /// the new values apply from the next transition.
    pub fn set_settings(&mut self, settings: EnvelopeSettings) {
        self.settings = settings.sanitized();
    }

    /// Change the sample rate. Applies from the next transition.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Current level without advancing.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Active segment.
    pub fn segment(&self) -> Segment {
        Segment::from_index(self.segment_index)
    }

    /// Raw segment index (-1 Idle, 0..=3 Attack..Release).
    pub fn segment_index(&self) -> i32 {
        self.segment_index
    }

    /// Level the active segment is heading for.
    pub fn segment_target(&self) -> f64 {
        self.segment_target
    }

    /// Recurrence parameters of the active segment.
    pub fn coefficients(&self) -> &CurveCoefficients {
        &self.curve
    }

    /// Whether the envelope is anywhere but Idle.
    pub fn is_active(&self) -> bool {
        self.segment() != Segment::Idle
    }

    /// Whether the output is currently changing every sample.
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Most recent streaming-state change since the last call.
    pub fn take_streaming_change(&mut self) -> Option<StreamingChange> {
        self.streaming_change.take()
    }

    /// Start Attack from the current level.
    pub fn note_on(&mut self) {
        self.transition(EnvelopeEvent::Trigger);
    }

    /// Jump to Release if the envelope is in Attack, Decay or Sustain.
    pub fn note_off(&mut self) {
        self.transition(EnvelopeEvent::GateRelease);
    }

    /// Silence immediately and return to Idle.
    pub fn reset(&mut self) {
        self.transition(EnvelopeEvent::Reset);
    }

    /// Apply `event`. Returns `false` if the event does nothing in the
    /// current segment.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contour_core::{CurveEnvelope, EnvelopeEvent, Segment};
    ///
    /// let mut env = CurveEnvelope::new(48000.0);
    /// assert!(!env.transition(EnvelopeEvent::GateRelease));
    /// assert!(env.transition(EnvelopeEvent::Trigger));
    /// assert_eq!(env.segment(), Segment::Attack);
    /// ```
    pub fn transition(&mut self, event: EnvelopeEvent) -> bool {
        let Some(entry) = event.entry_index(self.segment_index) else {
            return false;
        };
        self.segment_index = entry;
        self.advance_segment();

        if event == EnvelopeEvent::Reset {
            self.level = END_LEVEL;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            ?event,
            segment = %self.segment(),
            level = self.level,
            position = self.position,
            "envelope transition"
        );
        true
    }

    /// Step to the next segment and solve its curve from the current level.
    pub fn advance_segment(&mut self) {
        self.segment_index += 1;
        let settings = self.settings;

        match self.segment_index {
            0 => self.enter_curve(settings.attack, settings.attack_curve, PEAK_LEVEL),
            1 => self.enter_curve(settings.decay, settings.decay_curve, settings.sustain),
            2 => self.enter_steady_state(settings.sustain),
            3 => self.enter_curve(settings.release, settings.release_curve, END_LEVEL),
            _ => {
                self.segment_index = IDLE_INDEX;
                self.enter_steady_state(END_LEVEL);
            }
        }
    }

    fn enter_curve(&mut self, rate: f64, curve_amount: f64, target: f64) {
        self.segment_target = target;
        self.set_streaming(true);
        self.curve = solve_curve(self.level, self.sample_rate, rate, target, curve_amount);
    }

    fn enter_steady_state(&mut self, target: f64) {
        self.segment_target = target;
        self.set_streaming(false);
        self.curve = solve_steady_state(target);
    }

    fn set_streaming(&mut self, streaming: bool) {
        if self.streaming != streaming {
            self.streaming = streaming;
            self.streaming_change = Some(StreamingChange {
                position: self.position,
                streaming,
            });
        }
    }

    #[inline]
    fn tick(&mut self) -> f64 {
        self.level = self.curve.step(self.level);
        if !self.curve.contains(self.level) {
            // undo overshoot
            self.level = self.segment_target;
            self.transition(EnvelopeEvent::NaturalBoundary);
        }
        self.position += 1;
        self.level
    }

    /// Advance by one sample and return the new level.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.tick() as f32
    }

    /// Fill `output` with consecutive samples. `position` is the absolute
    /// sample position of `output[0]`.
    pub fn process_block(&mut self, output: &mut [f32], position: u64) {
        self.position = position;
        for sample in output.iter_mut() {
            *sample = self.tick() as f32;
        }
    }

    /// Take in a control update at `position`.
    ///
    /// The continuous controls replace the settings for subsequent segment
    /// solves. Then, in order: a voice reset returns to Idle, a rising
    /// trigger with the gate held restarts Attack, and a falling gate
    /// starts Release. A reset and a trigger in the same update therefore
    /// end in Attack.
    pub fn on_control_inputs_changed(&mut self, controls: &EnvelopeControls, position: u64) {
        self.position = position;
        self.settings = controls.settings().sanitized();

        if controls.is_reset_requested() {
            #[cfg(feature = "tracing")]
            tracing::debug!(position, level = self.level, "envelope hard reset");
            self.transition(EnvelopeEvent::Reset);
        }

        if controls.is_trigger_rising() {
            self.transition(EnvelopeEvent::Trigger);
        }

        if controls.is_gate_falling() {
            self.transition(EnvelopeEvent::GateRelease);
        }
    }
}

impl ParameterInfo for CurveEnvelope {
    fn param_count(&self) -> usize {
        ENVELOPE_PARAMS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        ENVELOPE_PARAMS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f64 {
        self.settings.get(index).unwrap_or(0.0)
    }

    fn set_param(&mut self, index: usize, value: f64) {
        self.settings.set(index, value);
    }
}

impl BlockProcessor for CurveEnvelope {
    fn set_sample_rate(&mut self, sample_rate: f64) {
        CurveEnvelope::set_sample_rate(self, sample_rate);
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn on_control_inputs_changed(&mut self, controls: &EnvelopeControls, position: u64) {
        CurveEnvelope::on_control_inputs_changed(self, controls, position);
    }

    fn process_block(&mut self, output: &mut [f32], position: u64) {
        CurveEnvelope::process_block(self, output, position);
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn take_streaming_change(&mut self) -> Option<StreamingChange> {
        CurveEnvelope::take_streaming_change(self)
    }

    fn value(&self) -> f32 {
        self.level as f32
    }
}

impl ModulationSource for CurveEnvelope {
    fn mod_advance(&mut self) -> f32 {
        self.advance()
    }

    fn is_bipolar(&self) -> bool {
        false
    }

    fn mod_reset(&mut self) {
        self.reset();
    }

    fn mod_value(&self) -> f32 {
        self.level as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    /// 1 ms attack (48 samples), 10 ms full-swing decay and release.
    fn fast_settings() -> EnvelopeSettings {
        EnvelopeSettings {
            attack: 0.0,
            decay: 0.25,
            sustain: 0.5,
            release: 0.25,
            attack_curve: 0.5,
            decay_curve: 0.5,
            release_curve: 0.5,
        }
    }

    fn fast_env() -> CurveEnvelope {
        CurveEnvelope::with_settings(SR, fast_settings())
    }

    /// Advance until the segment changes. Returns samples taken.
    fn run_segment(env: &mut CurveEnvelope, limit: usize) -> usize {
        let start = env.segment();
        for n in 1..=limit {
            env.advance();
            if env.segment() != start {
                return n;
            }
        }
        panic!("{start} did not finish within {limit} samples");
    }

    #[test]
    fn test_idle_holds_zero() {
        let mut env = fast_env();
        assert_eq!(env.segment(), Segment::Idle);
        for _ in 0..1000 {
            assert_eq!(env.advance(), 0.0);
        }
        assert_eq!(env.segment(), Segment::Idle);
    }

    #[test]
    fn test_full_cycle() {
        let mut env = fast_env();
        env.note_on();
        assert_eq!(env.segment(), Segment::Attack);
        assert_eq!(env.segment_target(), 1.0);

        let attack = run_segment(&mut env, 1000);
        assert!((47..=50).contains(&attack), "attack took {attack}");
        assert_eq!(env.segment(), Segment::Decay);
        assert_eq!(env.level(), 1.0, "corrected to the attack target");
        assert_eq!(env.segment_target(), 0.5);

        let decay = run_segment(&mut env, 10_000);
        assert!((238..=242).contains(&decay), "decay took {decay}");
        assert_eq!(env.segment(), Segment::Sustain);
        assert_eq!(env.level(), 0.5);

        for _ in 0..5000 {
            assert_eq!(env.advance(), 0.5);
        }

        env.note_off();
        assert_eq!(env.segment(), Segment::Release);
        let release = run_segment(&mut env, 10_000);
        assert!((238..=242).contains(&release), "release took {release}");
        assert_eq!(env.segment(), Segment::Idle);
        assert_eq!(env.segment_index(), -1);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn test_gate_release_during_attack_jumps_to_release() {
        let mut env = fast_env();
        env.note_on();
        for _ in 0..20 {
            env.advance();
        }
        let level = env.level();
        assert!(level > 0.0 && level < 1.0);

        env.note_off();
        assert_eq!(env.segment(), Segment::Release);
        assert_eq!(env.level(), level, "release starts where attack stopped");
        assert_eq!(env.segment_target(), 0.0);
    }

    #[test]
    fn test_gate_release_during_decay() {
        let mut env = fast_env();
        env.note_on();
        run_segment(&mut env, 1000);
        assert_eq!(env.segment(), Segment::Decay);
        env.note_off();
        assert_eq!(env.segment(), Segment::Release);
    }

    #[test]
    fn test_gate_release_ignored_when_idle_or_releasing() {
        let mut env = fast_env();
        assert!(!env.transition(EnvelopeEvent::GateRelease));
        assert_eq!(env.segment(), Segment::Idle);

        env.note_on();
        env.note_off();
        assert_eq!(env.segment(), Segment::Release);
        let before = *env.coefficients();
        assert!(!env.transition(EnvelopeEvent::GateRelease));
        assert_eq!(*env.coefficients(), before);
    }

    #[test]
    fn test_reset_silences_immediately() {
        let mut env = fast_env();
        env.note_on();
        for _ in 0..30 {
            env.advance();
        }
        assert!(env.level() > 0.3);

        env.reset();
        assert_eq!(env.segment(), Segment::Idle);
        assert_eq!(env.level(), 0.0);
        assert!(env.coefficients().is_steady());
        assert_eq!(env.advance(), 0.0);
    }

    #[test]
    fn test_retrigger_in_sustain_starts_from_sustain_level() {
        let mut env = fast_env();
        env.note_on();
        run_segment(&mut env, 1000);
        run_segment(&mut env, 10_000);
        assert_eq!(env.segment(), Segment::Sustain);

        env.note_on();
        assert_eq!(env.segment(), Segment::Attack);
        assert_eq!(env.level(), 0.5);

        // half the distance, half the samples
        let attack = run_segment(&mut env, 1000);
        assert!((23..=26).contains(&attack), "attack took {attack}");
    }

    #[test]
    fn test_degenerate_segment_skips_on_next_sample() {
        let mut env = CurveEnvelope::with_settings(
            SR,
            EnvelopeSettings {
                sustain: 1.0,
                ..fast_settings()
            },
        );
        env.note_on();
        run_segment(&mut env, 1000);
        assert_eq!(env.segment(), Segment::Decay);

        // decay from 1.0 to 1.0 has nothing to do
        assert_eq!(run_segment(&mut env, 10), 1);
        assert_eq!(env.segment(), Segment::Sustain);
        assert_eq!(env.level(), 1.0);
    }

    #[test]
    fn test_streaming_flags() {
        let mut env = fast_env();
        assert!(!env.is_streaming());
        assert_eq!(
            env.take_streaming_change(),
            Some(StreamingChange {
                position: 0,
                streaming: false
            })
        );
        assert_eq!(env.take_streaming_change(), None);

        env.note_on();
        assert!(env.is_streaming());
        assert!(env.take_streaming_change().is_some_and(|c| c.streaming));

        // attack -> decay keeps streaming, no change reported
        run_segment(&mut env, 1000);
        assert_eq!(env.take_streaming_change(), None);

        run_segment(&mut env, 10_000);
        assert!(!env.is_streaming());
        assert!(env.take_streaming_change().is_some_and(|c| !c.streaming));
    }

    #[test]
    fn test_transition_is_sample_accurate() {
        let mut env = fast_env();
        let mut controls = EnvelopeControls::from_settings(&fast_settings());
        controls.note_on();
        env.on_control_inputs_changed(&controls, 1000);
        env.take_streaming_change();

        let mut block = [0.0f32; 512];
        env.process_block(&mut block, 1000);

        let change = env
            .take_streaming_change()
            .expect("decay should have ended inside the block");
        assert!(!change.streaming);
        let offset = (change.position - 1000) as usize;
        assert_eq!(block[offset], 0.5, "sustain starts at the reported sample");
        assert!(block[offset - 1] > 0.5);
    }

    #[test]
    fn test_settings_apply_at_next_transition() {
        let mut env = fast_env();
        env.note_on();
        let attack = *env.coefficients();

        env.set_settings(EnvelopeSettings {
            attack: 0.8,
            sustain: 0.2,
            ..fast_settings()
        });
        assert_eq!(*env.coefficients(), attack);

        run_segment(&mut env, 1000);
        assert_eq!(env.segment_target(), 0.2);
    }

    #[test]
    fn test_parameter_info() {
        let mut env = fast_env();
        assert_eq!(env.param_count(), 7);
        let idx = env.find_param_by_name("release_curve").unwrap();
        env.set_param(idx, -0.25);
        assert_eq!(env.settings().release_curve, -0.25);
        assert_eq!(env.get_param(idx), -0.25);
        assert_eq!(env.get_param(99), 0.0);
    }

    #[test]
    fn test_modulation_source() {
        let mut env = fast_env();
        assert!(!env.is_bipolar());
        assert_eq!(env.mod_advance_bipolar(), -1.0);
        env.note_on();
        let v = env.mod_advance_scaled(100.0, 50.0);
        assert!(v > 100.0 && v < 150.0);

        // attack reaches the peak within 48 samples: full depth
        let mut block = [0.0f32; 64];
        env.mod_fill(&mut block, 100.0, 50.0);
        assert!(block.contains(&150.0));
        assert!(block.iter().all(|&x| (100.0..=150.0).contains(&x)));

        env.mod_reset();
        assert_eq!(env.mod_value(), 0.0);
        assert_eq!(env.mod_advance_scaled(100.0, 50.0), 100.0);
    }
}
