//! Scenario validation.
//!
//! Checks a [`Scenario`] against the module registry before rendering:
//! the module must exist, settings and `set` events must name known
//! parameters within their ranges, and events must be in time order inside
//! the render window. All problems are collected, not just the first.
//!
//! # Example
//!
//! ```rust
//! use contour_config::{ControlAction, Scenario, ValidationError, validate_scenario};
//!
//! let ok = Scenario::new("ok").with_event(0.0, ControlAction::GateOn);
//! assert!(validate_scenario(&ok).is_ok());
//!
//! let late = Scenario::new("late").with_event(5.0, ControlAction::GateOn);
//! assert!(matches!(
//!     validate_scenario(&late),
//!     Err(ValidationError::EventOutOfWindow { .. })
//! ));
//! ```

use contour_core::{ENVELOPE_PARAMS, EnvelopeSettings, ParamDescriptor};
use contour_registry::ModuleRegistry;
use thiserror::Error;

use crate::scenario::{ControlAction, Scenario};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Sample rate of zero.
    #[error("sample rate must be positive, got {0}")]
    InvalidSampleRate(u32),

    /// Block size of zero.
    #[error("block size must be at least 1")]
    InvalidBlockSize,

    /// Duration not positive or not finite.
    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    /// Module id not in the registry.
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// Unknown parameter name.
    #[error("unknown parameter '{param}' for module '{module}'")]
    UnknownParameter {
        /// Module id.
        module: String,
        /// Name of the unrecognized parameter.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Event time outside `[0, duration]`.
    #[error("event {index} at {at}s lies outside the render window [0, {duration}]")]
    EventOutOfWindow {
        /// Index of the event in the file.
        index: usize,
        /// Event time in seconds.
        at: f64,
        /// Render duration in seconds.
        duration: f64,
    },

    /// Event earlier than its predecessor.
    #[error("event {index} at {at}s comes before the previous event at {previous}s")]
    UnsortedEvents {
        /// Index of the event in the file.
        index: usize,
        /// Event time in seconds.
        at: f64,
        /// Time of the preceding event.
        previous: f64,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validator for scenarios and module parameters.
pub struct ScenarioValidator {
    registry: ModuleRegistry,
}

impl Default for ScenarioValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioValidator {
    /// Create a validator backed by the built-in module registry.
    pub fn new() -> Self {
        Self {
            registry: ModuleRegistry::new(),
        }
    }

    /// Validate that a module id (current or legacy) exists.
    pub fn validate_module(&self, module: &str) -> ValidationResult<()> {
        if self.registry.get(module).is_some() {
            Ok(())
        } else {
            Err(ValidationError::UnknownModule(module.to_string()))
        }
    }

    /// Resolve a parameter name to its descriptor.
    pub fn param(&self, module: &str, param: &str) -> ValidationResult<(usize, ParamDescriptor)> {
        let descriptor = self
            .registry
            .get(module)
            .ok_or_else(|| ValidationError::UnknownModule(module.to_string()))?;
        self.registry
            .param_index_by_name(module, param)
            .and_then(|i| descriptor.params.get(i).map(|d| (i, *d)))
            .ok_or_else(|| ValidationError::UnknownParameter {
                module: module.to_string(),
                param: param.to_string(),
            })
    }

    /// Validate a parameter value for a module.
    pub fn validate_param_value(
        &self,
        module: &str,
        param: &str,
        value: f64,
    ) -> ValidationResult<usize> {
        let (index, desc) = self.param(module, param)?;
        check_range(&desc, param, value)?;
        Ok(index)
    }

    /// Validate a whole scenario, collecting every problem found.
    pub fn validate(&self, scenario: &Scenario) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if scenario.sample_rate == 0 {
            errors.push(ValidationError::InvalidSampleRate(scenario.sample_rate));
        }
        if scenario.block_size == 0 {
            errors.push(ValidationError::InvalidBlockSize);
        }
        if !(scenario.duration.is_finite() && scenario.duration > 0.0) {
            errors.push(ValidationError::InvalidDuration(scenario.duration));
        }

        match self.validate_module(&scenario.module) {
            Ok(()) => {
                errors.extend(validate_settings(&scenario.settings()));
                for event in &scenario.events {
                    if let ControlAction::Set { param, value } = &event.action
                        && let Err(e) = self.validate_param_value(&scenario.module, param, *value)
                    {
                        errors.push(e);
                    }
                }
            }
            Err(e) => errors.push(e),
        }

        let mut previous: Option<f64> = None;
        for (index, event) in scenario.events.iter().enumerate() {
            if !(0.0..=scenario.duration).contains(&event.at) {
                errors.push(ValidationError::EventOutOfWindow {
                    index,
                    at: event.at,
                    duration: scenario.duration,
                });
            }
            if let Some(previous) = previous
                && event.at < previous
            {
                errors.push(ValidationError::UnsortedEvents {
                    index,
                    at: event.at,
                    previous,
                });
            }
            previous = Some(event.at);
        }

        collect(errors)
    }
}

fn check_range(desc: &ParamDescriptor, param: &str, value: f64) -> ValidationResult<()> {
    if desc.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        })
    }
}

/// Range-check every envelope setting against its descriptor.
pub fn validate_settings(settings: &EnvelopeSettings) -> Vec<ValidationError> {
    ENVELOPE_PARAMS
        .iter()
        .enumerate()
        .filter_map(|(i, desc)| {
            let value = settings.get(i)?;
            check_range(desc, desc.string_id, value).err()
        })
        .collect()
}

/// Validate a scenario against the built-in registry.
pub fn validate_scenario(scenario: &Scenario) -> ValidationResult<()> {
    ScenarioValidator::new().validate(scenario)
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
