//! Render scenarios for contour envelope generators.
//!
//! This crate describes offline renders as TOML documents, validates them
//! against the module registry and plays them through a module the way a
//! host would.
//!
//! # Features
//!
//! - **Scenarios**: Load and save render descriptions from TOML files
//! - **Validation**: Module ids, parameter names and ranges, event ordering
//! - **Rendering**: Sample-accurate control delivery with block splitting
//! - **Factory Scenarios**: Built-in scenarios covering common shapes
//!
//! # Example
//!
//! ```rust,no_run
//! use contour_config::{ControlAction, Scenario, ScenarioRenderer};
//!
//! let scenario = Scenario::load("pluck.toml").unwrap();
//! let rendering = ScenarioRenderer::new().render(&scenario).unwrap();
//! println!("{} samples, peak {}", rendering.samples.len(), rendering.peak());
//!
//! // Or build one programmatically
//! let scenario = Scenario::new("Gate")
//!     .with_duration(0.5)
//!     .with_event(0.0, ControlAction::GateOn)
//!     .with_event(0.25, ControlAction::GateOff);
//! scenario.save("gate.toml").unwrap();
//! ```

mod error;
mod render;
mod scenario;

/// Scenario validation.
pub mod validation;

/// Factory scenarios bundled with the library.
pub mod factory_scenarios;

pub use error::ConfigError;
pub use factory_scenarios::{
    FACTORY_SCENARIO_NAMES, factory_scenario_names, factory_scenarios, get_factory_scenario,
    is_factory_scenario,
};
pub use render::{Rendering, ScenarioRenderer};
pub use scenario::{ControlAction, ControlEvent, EnvelopeConfig, Scenario, ScheduledEvent};
pub use validation::{
    ScenarioValidator, ValidationError, ValidationResult, validate_scenario, validate_settings,
};

/// Re-export commonly used types from contour-registry
pub use contour_registry::{ModuleCategory, ModuleDescriptor, ModuleRegistry};
