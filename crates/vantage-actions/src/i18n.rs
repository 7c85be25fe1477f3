//! Localized strings for the messages this component emits.

use std::collections::BTreeMap;

/// Keyed string lookup with English defaults and `:placeholder` replacement.
///
/// Hosts override keys wholesale; anything unknown falls back to the default
/// table and finally to the key itself, so a missing translation never panics
/// and stays greppable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationBundle {
    overrides: BTreeMap<String, String>,
}

/// Key for the generic success message.
pub const KEY_ACTION_EXECUTED: &str = "action.executed";
/// Key for the generic execution-failure message.
pub const KEY_ACTION_PROBLEM: &str = "action.problem";

fn default_text(key: &str) -> Option<&'static str> {
    match key {
        "action.executed" => Some("The action was executed successfully."),
        "action.problem" => Some("There was a problem executing the action."),
        _ => None,
    }
}

impl TranslationBundle {
    /// Bundle with English defaults only.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            overrides: BTreeMap::new(),
        }
    }

    /// Bundle with host-provided overrides layered over the defaults.
    #[must_use]
    pub const fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Look up a key: overrides first, then defaults, then the key itself.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        if let Some(value) = self.overrides.get(key) {
            return value.clone();
        }
        default_text(key).map_or_else(|| key.to_string(), str::to_string)
    }

    /// Look up a key and substitute `:name` placeholders from `replacements`.
    #[must_use]
    pub fn text_with(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        let mut text = self.text(key);
        for (name, value) in replacements {
            text = text.replace(&format!(":{name}"), value);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_component_messages() {
        let bundle = TranslationBundle::new();
        assert_eq!(
            bundle.text(KEY_ACTION_EXECUTED),
            "The action was executed successfully."
        );
        assert_eq!(
            bundle.text(KEY_ACTION_PROBLEM),
            "There was a problem executing the action."
        );
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key_itself() {
        let bundle = TranslationBundle::new();
        assert_eq!(bundle.text("action.unknown"), "action.unknown");
    }

    #[test]
    fn overrides_shadow_the_defaults() {
        let bundle = TranslationBundle::with_overrides(BTreeMap::from([(
            KEY_ACTION_EXECUTED.to_string(),
            "Fertig.".to_string(),
        )]));
        assert_eq!(bundle.text(KEY_ACTION_EXECUTED), "Fertig.");
        assert_eq!(
            bundle.text(KEY_ACTION_PROBLEM),
            "There was a problem executing the action."
        );
    }

    #[test]
    fn placeholders_are_replaced() {
        let bundle = TranslationBundle::with_overrides(BTreeMap::from([(
            "action.ran".to_string(),
            "Ran :action on :count resources".to_string(),
        )]));
        assert_eq!(
            bundle.text_with("action.ran", &[("action", "Publish"), ("count", "3")]),
            "Ran Publish on 3 resources"
        );
    }
}
