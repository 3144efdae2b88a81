//! Built-in rule sets.

/// Names accepted by `Ruleset::preset`.
pub const PRESET_NAMES: &[&str] = &["c"];

const C_RULES: &str = include_str!("../presets/c.json");

pub(crate) fn lookup(name: &str) -> Option<&'static str> {
    match name {
        "c" => Some(C_RULES),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_preset_resolves() {
        for name in PRESET_NAMES {
            assert!(lookup(name).is_some(), "missing preset {name}");
        }
        assert!(lookup("pascal").is_none());
    }
}
