//! Envelopes as modulation generators.
//!
//! An envelope's output is usually routed to some other parameter (filter
//! cutoff, oscillator pitch, amplitude). [`ModulationSource`] exposes the
//! generator through a per-sample interface with depth scaling, so the
//! routing code does not need to know it is driving an ADSR.

/// A per-sample control signal that can be scaled onto a destination.
///
/// Envelopes are unipolar (0 to 1). Bipolar sources (-1 to 1) use the same
/// scaling, so a unipolar source only ever pushes its destination up from
/// `center`.
///
/// # Example
///
/// ```rust
/// use contour_core::{CurveEnvelope, ModulationSource};
///
/// let mut env = CurveEnvelope::new(48000.0);
/// env.note_on();
///
/// // Sweep a cutoff up to two octaves above 500 Hz
/// let mut cutoff = [0.0f32; 64];
/// env.mod_fill(&mut cutoff, 500.0, 1500.0);
/// assert!(cutoff.iter().all(|&hz| (500.0..=2000.0).contains(&hz)));
/// assert!(cutoff[63] > cutoff[0]);
/// ```
pub trait ModulationSource {
    /// Advance one sample and return the new value.
    fn mod_advance(&mut self) -> f32;

    /// Whether values span -1..1 rather than 0..1.
    fn is_bipolar(&self) -> bool;

    /// Return to the resting state.
    fn mod_reset(&mut self);

    /// Value of the most recent sample.
    fn mod_value(&self) -> f32;

    /// Advance and return `center + value * depth`.
    fn mod_advance_scaled(&mut self, center: f32, depth: f32) -> f32 {
        center + self.mod_advance() * depth
    }

    /// Fill `output` with consecutive values scaled as in
    /// [`mod_advance_scaled`](Self::mod_advance_scaled).
    fn mod_fill(&mut self, output: &mut [f32], center: f32, depth: f32) {
        for value in output {
            *value = self.mod_advance_scaled(center, depth);
        }
    }

    /// Advance and return the value mapped onto -1..1.
    fn mod_advance_bipolar(&mut self) -> f32 {
        let value = self.mod_advance();
        if self.is_bipolar() {
            value
        } else {
            value * 2.0 - 1.0
        }
    }
}
