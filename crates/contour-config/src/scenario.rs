//! Render scenario file format and operations.

use std::fmt;
use std::path::Path;

use contour_core::EnvelopeSettings;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Envelope settings as stored in a scenario file.
///
/// Missing fields take the module defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Attack rate (1.0 = 10 V).
    pub attack: f64,
    /// Decay rate.
    pub decay: f64,
    /// Sustain level.
    pub sustain: f64,
    /// Release rate.
    pub release: f64,
    /// Attack curve amount, -1..1.
    pub attack_curve: f64,
    /// Decay curve amount, -1..1.
    pub decay_curve: f64,
    /// Release curve amount, -1..1.
    pub release_curve: f64,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        EnvelopeSettings::default().into()
    }
}

impl From<EnvelopeSettings> for EnvelopeConfig {
    fn from(s: EnvelopeSettings) -> Self {
        Self {
            attack: s.attack,
            decay: s.decay,
            sustain: s.sustain,
            release: s.release,
            attack_curve: s.attack_curve,
            decay_curve: s.decay_curve,
            release_curve: s.release_curve,
        }
    }
}

impl From<EnvelopeConfig> for EnvelopeSettings {
    fn from(c: EnvelopeConfig) -> Self {
        Self {
            attack: c.attack,
            decay: c.decay,
            sustain: c.sustain,
            release: c.release,
            attack_curve: c.attack_curve,
            decay_curve: c.decay_curve,
            release_curve: c.release_curve,
        }
    }
}

/// What happens to the controls at an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlAction {
    /// Raise gate and trigger.
    GateOn,
    /// Drop gate and trigger.
    GateOff,
    /// Pulse the trigger, gate unchanged.
    Trigger,
    /// Hard voice reset.
    Reset,
    /// Change a continuous control.
    Set {
        /// Parameter name, short name or string id.
        param: String,
        /// New value.
        value: f64,
    },
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::GateOn => f.write_str("gate_on"),
            ControlAction::GateOff => f.write_str("gate_off"),
            ControlAction::Trigger => f.write_str("trigger"),
            ControlAction::Reset => f.write_str("reset"),
            ControlAction::Set { param, value } => write!(f, "set {param}={value}"),
        }
    }
}

/// A control action at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEvent {
    /// Time in seconds from the start of the render.
    pub at: f64,
    /// The action.
    #[serde(flatten)]
    pub action: ControlAction,
}

/// A control action resolved to a sample position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent<'a> {
    /// Absolute sample position.
    pub position: u64,
    /// The action.
    pub action: &'a ControlAction,
}

/// Offline render description: which module, how long, with which settings
/// and which control events.
///
/// # TOML Format
///
/// ```toml
/// name = "Pluck"
/// description = "Fast attack, no sustain"
/// module = "adsr4"
/// sample_rate = 48000
/// block_size = 64
/// duration = 0.6
///
/// [envelope]
/// attack = 0.0
/// decay = 0.35
/// sustain = 0.0
///
/// [[events]]
/// at = 0.0
/// kind = "gate_on"
///
/// [[events]]
/// at = 0.1
/// kind = "set"
/// param = "release_curve"
/// value = -0.5
///
/// [[events]]
/// at = 0.4
/// kind = "gate_off"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Name of the scenario.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registry id of the module to render.
    #[serde(default = "default_module")]
    pub module: String,

    /// Sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Maximum samples per processing block.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Render length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// Initial envelope settings.
    #[serde(default)]
    pub envelope: EnvelopeConfig,

    /// Control events, in time order.
    #[serde(default)]
    pub events: Vec<ControlEvent>,
}

fn default_module() -> String {
    "adsr4".to_string()
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_block_size() -> usize {
    64
}

fn default_duration() -> f64 {
    1.0
}

impl Scenario {
    /// Create an empty one-second scenario.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            module: default_module(),
            sample_rate: default_sample_rate(),
            block_size: default_block_size(),
            duration: default_duration(),
            envelope: EnvelopeConfig::default(),
            events: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the module id.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the duration in seconds.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the initial envelope settings.
    pub fn with_envelope(mut self, settings: EnvelopeSettings) -> Self {
        self.envelope = settings.into();
        self
    }

    /// Append an event at `at` seconds.
    pub fn with_event(mut self, at: f64, action: ControlAction) -> Self {
        self.events.push(ControlEvent { at, action });
        self
    }

    /// Load a scenario from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a scenario from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the scenario to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the scenario to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Initial envelope settings.
    pub fn settings(&self) -> EnvelopeSettings {
        self.envelope.into()
    }

    /// Sample position of a time in seconds, rounded to the nearest sample.
    pub fn sample_position(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * f64::from(self.sample_rate)).round() as u64
    }

    /// Total number of samples rendered.
    pub fn total_samples(&self) -> u64 {
        self.sample_position(self.duration)
    }

    /// Events resolved to sample positions, sorted by position.
    ///
    /// Events sharing a position keep their file order.
    pub fn schedule(&self) -> Vec<ScheduledEvent<'_>> {
        let mut schedule: Vec<_> = self
            .events
            .iter()
            .map(|e| ScheduledEvent {
                position: self.sample_position(e.at),
                action: &e.action,
            })
            .collect();
        schedule.sort_by_key(|e| e.position);
        schedule
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUCK: &str = r#"
name = "Pluck"
duration = 0.5

[envelope]
attack = 0.0
sustain = 0.0

[[events]]
at = 0
kind = "gate_on"

[[events]]
at = 0.25
kind = "set"
param = "release_curve"
value = -0.5

[[events]]
at = 0.4
kind = "gate_off"
"#;

    #[test]
    fn test_parse_with_defaults() {
        let scenario = Scenario::from_toml(PLUCK).unwrap();
        assert_eq!(scenario.name, "Pluck");
        assert_eq!(scenario.module, "adsr4");
        assert_eq!(scenario.sample_rate, 48000);
        assert_eq!(scenario.block_size, 64);
        assert_eq!(scenario.envelope.attack, 0.0);
        assert_eq!(scenario.envelope.decay, EnvelopeSettings::default().decay);
        assert_eq!(scenario.events.len(), 3);
        assert_eq!(scenario.events[0].action, ControlAction::GateOn);
        assert_eq!(
            scenario.events[1].action,
            ControlAction::Set {
                param: "release_curve".to_string(),
                value: -0.5
            }
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let scenario = Scenario::new("Roundtrip")
            .with_description("all event kinds")
            .with_duration(2.0)
            .with_event(0.0, ControlAction::GateOn)
            .with_event(0.5, ControlAction::Trigger)
            .with_event(
                0.75,
                ControlAction::Set {
                    param: "sustain".to_string(),
                    value: 0.25,
                },
            )
            .with_event(1.0, ControlAction::Reset)
            .with_event(1.5, ControlAction::GateOff);

        let toml = scenario.to_toml().unwrap();
        assert!(toml.contains("kind = \"gate_on\""), "got:\n{toml}");
        assert_eq!(Scenario::from_toml(&toml).unwrap(), scenario);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = Scenario::from_toml(
            r#"
name = "Bad"
[[events]]
at = 0.0
kind = "strum"
"#,
        );
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_schedule_rounds_and_sorts() {
        let scenario = Scenario::new("Order")
            .with_sample_rate(1000)
            .with_event(0.5, ControlAction::GateOff)
            .with_event(0.0004, ControlAction::GateOn)
            .with_event(0.5, ControlAction::Reset);

        let schedule = scenario.schedule();
        let positions: Vec<u64> = schedule.iter().map(|e| e.position).collect();
        assert_eq!(positions, [0, 500, 500]);
        assert_eq!(*schedule[1].action, ControlAction::GateOff);
        assert_eq!(*schedule[2].action, ControlAction::Reset);
        assert_eq!(scenario.total_samples(), 1000);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(ControlAction::GateOn.to_string(), "gate_on");
        let set = ControlAction::Set {
            param: "decay".to_string(),
            value: 0.5,
        };
        assert_eq!(set.to_string(), "set decay=0.5");
    }
}
