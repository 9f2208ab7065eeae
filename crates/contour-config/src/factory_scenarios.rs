//! Factory scenarios bundled with the library.
//!
//! Built-in render scenarios that exercise the envelope's shapes and control
//! handling without requiring external files.

use crate::Scenario;

/// Array of factory scenario names for external access.
pub static FACTORY_SCENARIO_NAMES: &[&str] =
    &["pluck", "pad", "swell", "retrigger", "hard_reset"];

/// TOML content for factory scenarios, embedded at compile time.
static FACTORY_SCENARIOS_TOML: &[(&str, &str)] = &[
    ("pluck", PLUCK_SCENARIO),
    ("pad", PAD_SCENARIO),
    ("swell", SWELL_SCENARIO),
    ("retrigger", RETRIGGER_SCENARIO),
    ("hard_reset", HARD_RESET_SCENARIO),
];

/// Percussive envelope: instant attack, decay to silence.
const PLUCK_SCENARIO: &str = r#"
name = "Pluck"
description = "Instant attack decaying to silence, short release"
sample_rate = 48000
block_size = 64
duration = 0.6

[envelope]
attack = 0.0
decay = 0.35
sustain = 0.0
release = 0.3
attack_curve = 0.5
decay_curve = 0.7
release_curve = 0.5

[[events]]
at = 0.0
kind = "gate_on"

[[events]]
at = 0.4
kind = "gate_off"
"#;

/// Slow pad with a long, gently curved attack.
const PAD_SCENARIO: &str = r#"
name = "Pad"
description = "Slow, nearly linear attack into a high sustain with a long release"
sample_rate = 48000
block_size = 128
duration = 3.0

[envelope]
attack = 0.55
decay = 0.5
sustain = 0.8
release = 0.6
attack_curve = 0.1
decay_curve = 0.5
release_curve = 0.6

[[events]]
at = 0.1
kind = "gate_on"

[[events]]
at = 1.5
kind = "gate_off"
"#;

/// Inverted curves: slow start, fast finish.
const SWELL_SCENARIO: &str = r#"
name = "Swell"
description = "Inverted attack and decay curves that accelerate toward their target"
sample_rate = 48000
block_size = 64
duration = 1.5

[envelope]
attack = 0.6
decay = 0.45
sustain = 0.6
release = 0.5
attack_curve = -0.8
decay_curve = -0.5
release_curve = -0.3

[[events]]
at = 0.0
kind = "gate_on"

[[events]]
at = 1.0
kind = "gate_off"
"#;

/// Trigger pulses while the gate is held, with a sustain change mid-way.
const RETRIGGER_SCENARIO: &str = r#"
name = "Retrigger"
description = "Trigger pulses during a held gate restart the attack from the current level"
sample_rate = 48000
block_size = 64
duration = 1.5

[envelope]
attack = 0.3
decay = 0.4
sustain = 0.5
release = 0.45
attack_curve = 0.5
decay_curve = 0.5
release_curve = 0.5

[[events]]
at = 0.0
kind = "gate_on"

[[events]]
at = 0.25
kind = "trigger"

[[events]]
at = 0.5
kind = "set"
param = "sustain"
value = 0.3

[[events]]
at = 0.5
kind = "trigger"

[[events]]
at = 0.75
kind = "trigger"

[[events]]
at = 1.0
kind = "gate_off"
"#;

/// Voice resets: one alone, one together with a trigger.
const HARD_RESET_SCENARIO: &str = r#"
name = "Hard Reset"
description = "Voice reset silences at once; a trigger in the same update restarts the attack"
sample_rate = 48000
block_size = 64
duration = 1.0

[envelope]
attack = 0.3
decay = 0.4
sustain = 0.7
release = 0.4

[[events]]
at = 0.0
kind = "gate_on"

[[events]]
at = 0.05
kind = "reset"

[[events]]
at = 0.3
kind = "reset"

[[events]]
at = 0.3
kind = "trigger"

[[events]]
at = 0.6
kind = "gate_off"
"#;

/// Get all factory scenarios.
pub fn factory_scenarios() -> Vec<Scenario> {
    FACTORY_SCENARIOS_TOML
        .iter()
        .filter_map(|(_, toml)| Scenario::from_toml(toml).ok())
        .collect()
}

/// Get a factory scenario by id or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use contour_config::get_factory_scenario;
///
/// let pluck = get_factory_scenario("pluck").unwrap();
/// assert_eq!(pluck.name, "Pluck");
/// assert!(get_factory_scenario("Hard Reset").is_some());
/// ```
pub fn get_factory_scenario(name: &str) -> Option<Scenario> {
    if let Some((_, toml)) = FACTORY_SCENARIOS_TOML
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(name))
    {
        return Scenario::from_toml(toml).ok();
    }

    factory_scenarios()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Get the ids of all factory scenarios.
pub fn factory_scenario_names() -> Vec<&'static str> {
    FACTORY_SCENARIOS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory scenario.
pub fn is_factory_scenario(name: &str) -> bool {
    get_factory_scenario(name).is_some()
}
