//! Host-facing block processing interface.
//!
//! A host drives a processor in two kinds of calls:
//!
//! 1. [`BlockProcessor::on_control_inputs_changed`] whenever a watched
//!    control changes (at most once per sample position), and
//! 2. [`BlockProcessor::process_block`] for every run of samples between
//!    control changes.
//!
//! Both receive the absolute sample position at which they start so that
//! transitions and streaming-state changes can be reported sample-accurately.

use crate::controls::EnvelopeControls;
use crate::param_info::ParameterInfo;

/// A change of the output's streaming state.
///
/// A streaming output changes every sample and must be propagated sample by
/// sample; a static output holds one value and may be sent once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingChange {
    /// Absolute sample position of the change.
    pub position: u64,
    /// New state.
    pub streaming: bool,
}

/// Control-driven block processor producing one output signal.
///
/// The trait is object safe; registries hand out `Box<dyn BlockProcessor + Send>`.
pub trait BlockProcessor: ParameterInfo {
    /// Change the sample rate. Takes effect at the next segment solve.
    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Current sample rate in Hz.
    fn sample_rate(&self) -> f64;

    /// React to a control update starting at `position`.
    fn on_control_inputs_changed(&mut self, controls: &EnvelopeControls, position: u64);

    /// Fill `output`, whose first sample sits at `position`.
    fn process_block(&mut self, output: &mut [f32], position: u64);

    /// Whether the output is currently time-varying.
    fn is_streaming(&self) -> bool;

    /// Take the most recent streaming-state change, if any happened since
    /// the last call.
    fn take_streaming_change(&mut self) -> Option<StreamingChange>;

    /// Current output value.
    fn value(&self) -> f32;
}
