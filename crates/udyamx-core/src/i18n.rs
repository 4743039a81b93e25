//! # Localization
//!
//! Translation tables and key resolution.
//!
//! ## Resolution Order
//! ```text
//! translate(locale = hi, "invoice.saveDraft")
//!
//!   hi table ──► invoice ──► saveDraft ──► "ड्राफ्ट सहेजें"   (found)
//!        │ any segment missing
//!        ▼
//!   en table ──► invoice ──► saveDraft ──► "Save Draft"      (fallback)
//!        │ still missing
//!        ▼
//!   "invoice.saveDraft"                                      (raw key)
//! ```
//!
//! Tables are nested JSON objects; keys are dotted paths into them.
//! Loading files is the app's job; this module only resolves.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Locale
// =============================================================================

/// A supported UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
    Mr,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Hi, Locale::Mr];

    /// ISO code, also the locale file stem (`locales/hi.json`).
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
            Locale::Mr => "mr",
        }
    }

    /// Name of the language in that language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Hi => "हिन्दी",
            Locale::Mr => "मराठी",
        }
    }

    /// BCP-47 tag handed to speech recognition and synthesis.
    pub fn speech_tag(&self) -> &'static str {
        match self {
            Locale::En => "en-IN",
            Locale::Hi => "hi-IN",
            Locale::Mr => "mr-IN",
        }
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "hi" => Ok(Locale::Hi),
            "mr" => Ok(Locale::Mr),
            other => Err(CoreError::UnsupportedLocale(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Translations
// =============================================================================

/// One nested JSON table per locale. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    tables: HashMap<Locale, Value>,
}

impl Translations {
    /// No tables at all: every lookup returns the raw key.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds from `(locale, table)` pairs. A later pair replaces an earlier one.
    pub fn from_tables(tables: impl IntoIterator<Item = (Locale, Value)>) -> Self {
        Translations {
            tables: tables.into_iter().collect(),
        }
    }

    /// Locales that have a table loaded.
    pub fn loaded_locales(&self) -> Vec<Locale> {
        Locale::ALL
            .into_iter()
            .filter(|l| self.tables.contains_key(l))
            .collect()
    }

    /// Dotted-path lookup in one locale only. Non-string leaves count as missing.
    pub fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        let mut node = self.tables.get(&locale)?;
        for segment in key.split('.') {
            node = node.as_object()?.get(segment)?;
        }
        node.as_str()
    }

    /// Active locale, then English, then the raw key.
    pub fn translate(&self, locale: Locale, key: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(Locale::En, key))
            .unwrap_or(key)
            .to_string()
    }

    /// [`translate`](Self::translate) then substitutes `{name}` placeholders.
    ///
    /// ## Example
    /// ```rust
    /// use serde_json::json;
    /// use udyamx_core::i18n::{Locale, Translations};
    ///
    /// let t = Translations::from_tables([(
    ///     Locale::En,
    ///     json!({"invoice": {"alerts": {"syncMessage": "{count} invoices synced"}}}),
    /// )]);
    /// assert_eq!(
    ///     t.translate_with(Locale::Hi, "invoice.alerts.syncMessage", &[("count", "2")]),
    ///     "2 invoices synced"
    /// );
    /// ```
    pub fn translate_with(&self, locale: Locale, key: &str, params: &[(&str, &str)]) -> String {
        let mut text = self.translate(locale, key);
        for (name, value) in params {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tables() -> Translations {
        Translations::from_tables([
            (
                Locale::En,
                json!({
                    "nav": {"home": "Home", "copilot": "Co-Pilot"},
                    "invoice": {"title": "Invoice Generator", "alerts": {"draftSaved": "Draft saved!"}},
                    "count": 3
                }),
            ),
            (
                Locale::Hi,
                json!({
                    "nav": {"home": "होम"},
                    "invoice": "not an object"
                }),
            ),
        ])
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("hi".parse::<Locale>().unwrap(), Locale::Hi);
        assert_eq!(" MR ".parse::<Locale>().unwrap(), Locale::Mr);
        assert!(matches!("fr".parse::<Locale>(), Err(CoreError::UnsupportedLocale(_))));
        assert_eq!(Locale::Mr.display_name(), "मराठी");
    }

    #[test]
    fn test_translate_active_locale() {
        let t = tables();
        assert_eq!(t.translate(Locale::Hi, "nav.home"), "होम");
        assert_eq!(t.translate(Locale::En, "nav.home"), "Home");
    }

    #[test]
    fn test_missing_keys_fall_back_to_english() {
        let t = tables();
        for key in ["nav.copilot", "invoice.title", "invoice.alerts.draftSaved"] {
            assert_eq!(t.translate(Locale::Hi, key), t.translate(Locale::En, key));
        }
        // Locale with no table at all
        assert_eq!(t.translate(Locale::Mr, "nav.home"), "Home");
    }

    #[test]
    fn test_unknown_key_returns_raw_key() {
        let t = tables();
        assert_eq!(t.translate(Locale::Hi, "nav.unknown"), "nav.unknown");
        assert_eq!(t.translate(Locale::En, "nav"), "nav");
        assert_eq!(t.translate(Locale::En, "count"), "count");
        assert_eq!(Translations::empty().translate(Locale::En, "a.b"), "a.b");
    }

    #[test]
    fn test_placeholders() {
        let t = Translations::from_tables([(Locale::En, json!({"msg": "{name} added {quantity} x {name}"}))]);
        assert_eq!(
            t.translate_with(Locale::En, "msg", &[("name", "Soap"), ("quantity", "2")]),
            "Soap added 2 x Soap"
        );
    }

    #[test]
    fn test_loaded_locales() {
        assert_eq!(tables().loaded_locales(), vec![Locale::En, Locale::Hi]);
    }
}
