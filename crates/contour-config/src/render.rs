//! Offline rendering of scenarios.
//!
//! The renderer plays host: it creates the scenario's module from the
//! registry, delivers control updates at their exact sample positions and
//! renders the gaps between them in blocks of at most `block_size` samples.
//! Events sharing a sample position are delivered as a single update.
//!
//! # Example
//!
//! ```rust
//! use contour_config::{ControlAction, Scenario, ScenarioRenderer};
//!
//! let scenario = Scenario::new("blip")
//!     .with_duration(0.1)
//!     .with_event(0.0, ControlAction::GateOn)
//!     .with_event(0.05, ControlAction::GateOff);
//!
//! let rendering = ScenarioRenderer::new().render(&scenario).unwrap();
//! assert_eq!(rendering.samples.len(), 4800);
//! assert!(rendering.peak() > 0.0);
//! ```

use contour_core::{BlockProcessor, EnvelopeControls, StreamingChange};
use contour_registry::ModuleRegistry;

use crate::error::ConfigError;
use crate::scenario::{ControlAction, Scenario};
use crate::validation::{ScenarioValidator, ValidationError};

/// Output of a render.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    /// Rendered envelope, one value per sample.
    pub samples: Vec<f32>,
    /// Streaming-state changes in the order they happened.
    pub streaming_changes: Vec<StreamingChange>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Rendering {
    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Largest sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().copied().fold(0.0, f32::max)
    }

    /// Number of samples during which the output was streaming.
    pub fn streaming_samples(&self) -> u64 {
        let end = self.samples.len() as u64;
        let mut total = 0;
        for (i, change) in self.streaming_changes.iter().enumerate() {
            if change.streaming {
                let until = self
                    .streaming_changes
                    .get(i + 1)
                    .map_or(end, |next| next.position.min(end));
                total += until.saturating_sub(change.position);
            }
        }
        total
    }
}

/// Renders scenarios through modules from the registry.
pub struct ScenarioRenderer {
    validator: ScenarioValidator,
    registry: ModuleRegistry,
    block_size: Option<usize>,
}

impl Default for ScenarioRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRenderer {
    /// Create a renderer backed by the built-in registry.
    pub fn new() -> Self {
        Self {
            validator: ScenarioValidator::new(),
            registry: ModuleRegistry::new(),
            block_size: None,
        }
    }

    /// Override the scenario's block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Validate and render a scenario.
    pub fn render(&self, scenario: &Scenario) -> Result<Rendering, ConfigError> {
        self.validator.validate(scenario)?;
        let block_size = self.block_size.unwrap_or(scenario.block_size);
        if block_size == 0 {
            return Err(ValidationError::InvalidBlockSize.into());
        }

        let processor = self
            .registry
            .create(&scenario.module, f64::from(scenario.sample_rate))
            .ok_or_else(|| ConfigError::UnknownModule(scenario.module.clone()))?;

        let total = scenario.total_samples();
        let mut session = Session {
            processor,
            controls: EnvelopeControls::from_settings(&scenario.settings()),
            position: 0,
            block: vec![0.0; block_size],
            rendering: Rendering {
                samples: Vec::with_capacity(total as usize),
                streaming_changes: Vec::new(),
                sample_rate: scenario.sample_rate,
            },
        };

        tracing::debug!(
            scenario = %scenario.name,
            module = %scenario.module,
            total,
            block_size,
            "rendering scenario"
        );

        // hand the initial settings to the module
        session.controls.apply_settings(&scenario.settings());
        session.deliver();

        let schedule = scenario.schedule();
        let mut events = schedule.iter().peekable();
        while let Some(first) = events.next() {
            let at = first.position.min(total);
            session.render_until(at);
            self.apply(scenario, first.action, &mut session.controls)?;
            while let Some(next) = events.next_if(|e| e.position.min(total) == at) {
                self.apply(scenario, next.action, &mut session.controls)?;
            }
            tracing::trace!(position = at, "control update");
            session.deliver();
        }
        session.render_until(total);

        tracing::info!(
            scenario = %scenario.name,
            samples = session.rendering.samples.len(),
            changes = session.rendering.streaming_changes.len(),
            "render complete"
        );
        Ok(session.rendering)
    }

    fn apply(
        &self,
        scenario: &Scenario,
        action: &ControlAction,
        controls: &mut EnvelopeControls,
    ) -> Result<(), ConfigError> {
        match action {
            ControlAction::GateOn => controls.note_on(),
            ControlAction::GateOff => controls.note_off(),
            ControlAction::Trigger => controls.retrigger(),
            ControlAction::Reset => controls.request_reset(),
            ControlAction::Set { param, value } => {
                let index = self
                    .validator
                    .validate_param_value(&scenario.module, param, *value)?;
                controls.set_param(index, *value);
            }
        }
        Ok(())
    }
}

/// Mutable state of one render.
struct Session {
    processor: Box<dyn BlockProcessor + Send>,
    controls: EnvelopeControls,
    position: u64,
    block: Vec<f32>,
    rendering: Rendering,
}

impl Session {
    fn render_until(&mut self, end: u64) {
        while self.position < end {
            let len = ((end - self.position) as usize).min(self.block.len());
            let block = &mut self.block[..len];
            self.processor.process_block(block, self.position);
            self.rendering.samples.extend_from_slice(block);
            self.position += len as u64;
            self.collect_change();
        }
    }

    fn deliver(&mut self) {
        self.processor.on_control_inputs_changed(&self.controls, self.position);
        self.controls.clear_updated();
        self.collect_change();
    }

    fn collect_change(&mut self) {
        if let Some(change) = self.processor.take_streaming_change() {
            self.rendering.streaming_changes.push(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_core::EnvelopeSettings;

    fn fast() -> EnvelopeSettings {
        EnvelopeSettings {
            attack: 0.0,
            decay: 0.25,
            sustain: 0.5,
            release: 0.25,
            ..EnvelopeSettings::default()
        }
    }

    #[test]
    fn test_silent_without_events() {
        let scenario = Scenario::new("silence").with_duration(0.01);
        let rendering = ScenarioRenderer::new().render(&scenario).unwrap();
        assert_eq!(rendering.samples.len(), 480);
        assert!(rendering.samples.iter().all(|&s| s == 0.0));
        assert_eq!(
            rendering.streaming_changes,
            [StreamingChange {
                position: 0,
                streaming: false
            }]
        );
        assert_eq!(rendering.streaming_samples(), 0);
    }

    #[test]
    fn test_full_note() {
        let scenario = Scenario::new("note")
            .with_envelope(fast())
            .with_duration(0.1)
            .with_event(0.001, ControlAction::GateOn)
            .with_event(0.05, ControlAction::GateOff);

        let rendering = ScenarioRenderer::new().render(&scenario).unwrap();
        assert_eq!(rendering.peak(), 1.0);
        assert_eq!(rendering.samples[2399], 0.5, "sustain before gate off");
        assert_eq!(*rendering.samples.last().unwrap(), 0.0);

        let flags: Vec<bool> = rendering
            .streaming_changes
            .iter()
            .map(|c| c.streaming)
            .collect();
        assert_eq!(flags, [false, true, false, true, false]);
        assert_eq!(rendering.streaming_changes[1].position, 48);
        assert_eq!(rendering.streaming_changes[3].position, 2400);
    }

    #[test]
    fn test_block_size_does_not_change_output() {
        let scenario = Scenario::new("note")
            .with_envelope(fast())
            .with_duration(0.05)
            .with_event(0.0, ControlAction::GateOn)
            .with_event(0.003, ControlAction::Trigger)
            .with_event(0.02, ControlAction::GateOff);

        let reference = ScenarioRenderer::new()
            .with_block_size(1)
            .render(&scenario)
            .unwrap();
        for block_size in [7, 64, 4096] {
            let rendering = ScenarioRenderer::new()
                .with_block_size(block_size)
                .render(&scenario)
                .unwrap();
            assert_eq!(rendering, reference, "block size {block_size}");
        }
    }

    #[test]
    fn test_same_position_events_share_one_update() {
        let scenario = Scenario::new("reset and trigger")
            .with_envelope(fast())
            .with_duration(0.05)
            .with_event(0.0, ControlAction::GateOn)
            .with_event(0.03, ControlAction::Reset)
            .with_event(0.03, ControlAction::Trigger);

        let rendering = ScenarioRenderer::new().render(&scenario).unwrap();
        let at = 1440;
        assert_eq!(rendering.samples[at - 1], 0.5);
        assert!(rendering.samples[at] > 0.0, "attack restarted from silence");
        assert!(rendering.samples[at] < 0.2);
    }

    #[test]
    fn test_set_event_changes_sustain() {
        let scenario = Scenario::new("set")
            .with_envelope(fast())
            .with_duration(0.05)
            .with_event(0.0, ControlAction::GateOn)
            .with_event(
                0.0,
                ControlAction::Set {
                    param: "sustain".to_string(),
                    value: 0.25,
                },
            );

        let rendering = ScenarioRenderer::new().render(&scenario).unwrap();
        assert_eq!(*rendering.samples.last().unwrap(), 0.25);
    }

    #[test]
    fn test_invalid_scenario_rejected() {
        let scenario = Scenario::new("bad").with_module("vca");
        let err = ScenarioRenderer::new().render(&scenario).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::UnknownModule(_))
        ));

        let err = ScenarioRenderer::new()
            .with_block_size(0)
            .render(&Scenario::new("zero"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::InvalidBlockSize)
        ));
    }
}
