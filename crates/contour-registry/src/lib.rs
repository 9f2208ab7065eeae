//! Module registry and factory for contour envelope generators.
//!
//! Hosts look modules up by identifier and get back a boxed
//! [`BlockProcessor`] together with the metadata needed to build a UI or
//! map parameters by name.
//!
//! # Example
//!
//! ```rust
//! use contour_core::EnvelopeControls;
//! use contour_registry::ModuleRegistry;
//!
//! let registry = ModuleRegistry::new();
//!
//! for module in registry.all_modules() {
//!     println!("{}: {}", module.name, module.description);
//! }
//!
//! // Both the current and the legacy identifier resolve
//! let mut env = registry.create("adsr4", 48000.0).unwrap();
//! assert!(registry.create("SE ADSR4", 48000.0).is_some());
//!
//! let mut controls = EnvelopeControls::default();
//! controls.note_on();
//! env.on_control_inputs_changed(&controls, 0);
//!
//! let mut block = [0.0f32; 32];
//! env.process_block(&mut block, 0);
//! assert!(block[31] > 0.0);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! contour-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use contour_core::{BlockProcessor, CurveEnvelope, ENVELOPE_PARAMS, ParamDescriptor};

/// Category of module for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleCategory {
    /// Gate-driven contour generators
    Envelope,
}

impl ModuleCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            ModuleCategory::Envelope => "Envelope",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            ModuleCategory::Envelope => "Gate and trigger driven envelope generators",
        }
    }
}

/// Describes a module in the registry.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Unique identifier (lowercase, no spaces).
    pub id: &'static str,
    /// Identifier used by older patches, if any.
    pub legacy_id: Option<&'static str>,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the module.
    pub description: &'static str,
    /// Category for organization.
    pub category: ModuleCategory,
    /// Continuous parameters, in index order.
    pub params: &'static [ParamDescriptor],
}

impl ModuleDescriptor {
    /// Whether `id` names this module, by current or legacy identifier.
    pub fn matches(&self, id: &str) -> bool {
        self.id == id || self.legacy_id == Some(id)
    }

    /// Number of continuous parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

/// Factory function type for creating modules.
type ModuleFactory = fn(f64) -> Box<dyn BlockProcessor + Send>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: ModuleDescriptor,
    factory: ModuleFactory,
}

/// Registry of all available modules.
pub struct ModuleRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Create a new registry with all built-in modules registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(1),
        };
        registry.register_builtin_modules();
        registry
    }

    fn register_builtin_modules(&mut self) {
        // ADSR with curve shaping
        self.register(
            ModuleDescriptor {
                id: "adsr4",
                legacy_id: Some("SE ADSR4"),
                name: "ADSR 4",
                description: "Attack/decay/sustain/release with per-segment exponential curves",
                category: ModuleCategory::Envelope,
                params: &ENVELOPE_PARAMS,
            },
            |sr| Box::new(CurveEnvelope::new(sr)),
        );
    }

    fn register(&mut self, descriptor: ModuleDescriptor, factory: ModuleFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    fn entry(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.matches(id))
    }

    /// Returns descriptors for all registered modules.
    pub fn all_modules(&self) -> Vec<&ModuleDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for modules in a specific category.
    pub fn modules_in_category(&self, category: ModuleCategory) -> Vec<&ModuleDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by current or legacy identifier.
    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.entry(id).map(|e| &e.descriptor)
    }

    /// Create a module instance by current or legacy identifier.
    ///
    /// Returns `None` if the identifier is not registered.
    pub fn create(&self, id: &str, sample_rate: f64) -> Option<Box<dyn BlockProcessor + Send>> {
        self.entry(id).map(|e| (e.factory)(sample_rate))
    }

    /// Find a parameter index by name, short name or string id.
    ///
    /// Returns `None` if the module or parameter is not found.
    pub fn param_index_by_name(&self, module_id: &str, param_name: &str) -> Option<usize> {
        self.get(module_id)?.params.iter().position(|desc| {
            desc.name.eq_ignore_ascii_case(param_name)
                || desc.short_name.eq_ignore_ascii_case(param_name)
                || desc.string_id.eq_ignore_ascii_case(param_name)
        })
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_core::{EnvelopeControls, ParameterInfo};

    #[test]
    fn test_registry_creation() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_module() {
        let registry = ModuleRegistry::new();

        let adsr = registry.get("adsr4").unwrap();
        assert_eq!(adsr.name, "ADSR 4");
        assert_eq!(adsr.category, ModuleCategory::Envelope);
        assert_eq!(adsr.param_count(), 7);

        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_legacy_id_resolves() {
        let registry = ModuleRegistry::new();
        let legacy = registry.get("SE ADSR4").unwrap();
        assert_eq!(legacy.id, "adsr4");
        assert!(registry.get("se adsr4").is_none(), "legacy id is exact");
    }

    #[test]
    fn test_create_module() {
        let registry = ModuleRegistry::new();
        let mut module = registry.create("adsr4", 44100.0).unwrap();
        assert_eq!(module.sample_rate(), 44100.0);
        assert_eq!(module.param_count(), 7);

        let mut controls = EnvelopeControls::default();
        controls.note_on();
        module.on_control_inputs_changed(&controls, 0);
        assert!(module.is_streaming());

        let mut block = [0.0f32; 16];
        module.process_block(&mut block, 0);
        assert!(block.iter().all(|s| s.is_finite() && *s > 0.0));
    }

    #[test]
    fn test_param_lookup() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.param_index_by_name("adsr4", "Sustain"), Some(2));
        assert_eq!(registry.param_index_by_name("adsr4", "R Curve"), Some(6));
        assert_eq!(registry.param_index_by_name("adsr4", "decay_curve"), Some(5));
        assert_eq!(registry.param_index_by_name("adsr4", "cutoff"), None);
        assert_eq!(registry.param_index_by_name("nope", "attack"), None);
    }

    #[test]
    fn test_descriptor_params_match_instance() {
        let registry = ModuleRegistry::new();
        for descriptor in registry.all_modules() {
            let module = registry.create(descriptor.id, 48000.0).unwrap();
            assert_eq!(module.param_count(), descriptor.param_count());
            for (i, desc) in descriptor.params.iter().enumerate() {
                assert_eq!(module.param_info(i), Some(*desc));
                assert_eq!(module.get_param(i), desc.default, "{}", desc.name);
            }
        }
    }

    #[test]
    fn test_category_filter() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.modules_in_category(ModuleCategory::Envelope).len(), 1);
        assert_eq!(ModuleCategory::Envelope.name(), "Envelope");
    }
}
