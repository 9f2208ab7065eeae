//! Parameter introspection for envelope controls.
//!
//! The continuous controls of an envelope (rates, curve amounts, sustain
//! level) are exposed through the index-based [`ParameterInfo`] trait, each
//! described by a [`ParamDescriptor`]. Hosts and tools use this to list,
//! validate and set parameters by name without knowing the concrete type.
//!
//! # Example
//!
//! ```rust
//! use contour_core::{CurveEnvelope, ParameterInfo};
//!
//! let mut env = CurveEnvelope::new(48000.0);
//! let sustain = env.find_param_by_name("sustain").unwrap();
//! env.set_param(sustain, 0.25);
//! assert_eq!(env.get_param(sustain), 0.25);
//! ```

use crate::curve::MAX_RATE;

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParamId(pub u32);

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Rate control, 1.0 = 10 V, mapped exponentially to time.
    Volts,
    /// Signed curve amount, -1 (inverted) to 1 (normal).
    Curve,
    /// Output level, 0 to 1.
    Level,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contour_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Volts.suffix(), " V");
    /// assert_eq!(ParamUnit::Level.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Volts => " V",
            ParamUnit::Curve | ParamUnit::Level => "",
        }
    }

    /// Scale from the stored value to the displayed value.
    pub const fn display_scale(&self) -> f64 {
        match self {
            ParamUnit::Volts => 10.0,
            ParamUnit::Curve | ParamUnit::Level => 1.0,
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Attack Curve").
    pub name: &'static str,
    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,
    /// Stable snake_case identifier used in scenario files.
    pub string_id: &'static str,
    /// Stable numeric ID.
    pub id: ParamId,
    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f64,
    /// Maximum allowed value.
    pub max: f64,
    /// Value on construction.
    pub default: f64,
    /// Recommended step increment for encoder-based control.
    pub step: f64,
}

impl ParamDescriptor {
    /// Rate control, stored as 0.0..[`MAX_RATE`] (0..20 V). Panel values
    /// stop at 1.0 (10 V); the rest of the range is reached by modulation.
    pub const fn rate(name: &'static str, short_name: &'static str, default: f64) -> Self {
        Self {
            name,
            short_name,
            string_id: "",
            id: ParamId(0),
            unit: ParamUnit::Volts,
            min: 0.0,
            max: MAX_RATE,
            default,
            step: 0.01,
        }
    }

    /// Signed curve amount in -1..1.
    pub const fn curve(name: &'static str, short_name: &'static str, default: f64) -> Self {
        Self {
            name,
            short_name,
            string_id: "",
            id: ParamId(0),
            unit: ParamUnit::Curve,
            min: -1.0,
            max: 1.0,
            default,
            step: 0.01,
        }
    }

    /// Level in 0..1.
    pub const fn level(name: &'static str, short_name: &'static str, default: f64) -> Self {
        Self {
            name,
            short_name,
            string_id: "",
            id: ParamId(0),
            unit: ParamUnit::Level,
            min: 0.0,
            max: 1.0,
            default,
            step: 0.01,
        }
    }

    /// Sets the stable numeric and string identifiers.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contour_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::curve("Attack Curve", "A Curve", 0.5);
    /// assert_eq!(desc.clamp(-3.0), -1.0);
    /// assert_eq!(desc.clamp(0.25), 0.25);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Converts a plain value to 0.0..1.0.
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) / range
    }

    /// Converts a 0.0..1.0 value back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f64) -> f64 {
        self.min + normalized * (self.max - self.min)
    }
}

/// Index-based access to a processor's continuous parameters.
///
/// Indices are stable for the lifetime of the instance. Out-of-range
/// indices return `None` / `0.0` and are ignored by setters.
pub trait ParameterInfo {
    /// Number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index`.
    fn get_param(&self, index: usize) -> f64;

    /// Set the parameter at `index`, clamped to its descriptor range.
    fn set_param(&mut self, index: usize, value: f64);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches the full name, the short name and the string id.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Finds a parameter index by its stable [`ParamId`].
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}
