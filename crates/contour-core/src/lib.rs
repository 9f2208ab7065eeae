//! Contour Core - exponential-segment ADSR envelope kernel
//!
//! This crate provides an Attack/Decay/Sustain/Release envelope whose
//! segments follow exponential curves of adjustable shape, plus the block
//! processing interface a host uses to drive it sample-accurately.
//!
//! # Core Abstractions
//!
//! ## Envelope
//!
//! - [`CurveEnvelope`] - Per-voice envelope state machine
//! - [`Segment`] - Attack, Decay, Sustain, Release or Idle
//! - [`EnvelopeEvent`] - Natural boundary, trigger, gate release, reset
//!
//! ## Curve Solver
//!
//! - [`solve_curve`] - Recurrence parameters for a shaped segment
//! - [`solve_steady_state`] - Parameters for a flat hold
//! - [`voltage_to_time`] - Rate control to full-swing time
//!
//! ## Host Interface
//!
//! - [`BlockProcessor`] - Object-safe block/control processing trait
//! - [`EnvelopeControls`] - Edge-flagged control inputs
//! - [`EnvelopeSettings`] - Rates, curve amounts and sustain level
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Parameter introspection
//! - [`ModulationSource`] - Use the envelope as a generic modulator
//!
//! # no_std Support
//!
//! The kernel uses `libm` for its math and allocates nothing. Disable the
//! default `std` feature to build it for embedded targets:
//!
//! ```toml
//! [dependencies]
//! contour-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to log segment transitions.
//!
//! # Example
//!
//! ```rust
//! use contour_core::{BlockProcessor, CurveEnvelope, EnvelopeControls, Segment};
//!
//! let mut env = CurveEnvelope::new(48000.0);
//! let mut controls = EnvelopeControls::default();
//! let mut block = [0.0f32; 64];
//!
//! controls.note_on();
//! env.on_control_inputs_changed(&controls, 0);
//! controls.clear_updated();
//! env.process_block(&mut block, 0);
//! assert!(block[63] > block[0]);
//!
//! controls.note_off();
//! env.on_control_inputs_changed(&controls, 64);
//! assert_eq!(env.segment(), Segment::Release);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **Sample-accurate**: Transitions land on the exact sample they occur at
//! - **Object-safe traits**: Registries hand out boxed processors

#![cfg_attr(not(feature = "std"), no_std)]

pub mod controls;
pub mod curve;
pub mod envelope;
pub mod event;
pub mod modulation;
pub mod param_info;
pub mod processor;
pub mod segment;
pub mod settings;

// Re-export main types at crate root
pub use controls::{Control, EnvelopeControls, VOICE_RESET_ACTIVE};
pub use curve::{
    CurveCoefficients, MAX_RATE, MIN_DELTA_Y, MIN_TIME_CONSTANTS, PEAK_LEVEL, segment_samples,
    solve_curve, solve_steady_state, voltage_to_time,
};
pub use envelope::CurveEnvelope;
pub use event::EnvelopeEvent;
pub use modulation::ModulationSource;
pub use param_info::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
pub use processor::{BlockProcessor, StreamingChange};
pub use segment::{IDLE_INDEX, Segment};
pub use settings::{ENVELOPE_PARAMS, EnvelopeSettings};
