//! # Localization State
//!
//! Translation tables loaded once at startup plus the active locale.
//!
//! ```text
//! locales/en.json ─┐
//! locales/hi.json ─┼──► load_translations() ──► Arc<Translations>  (immutable)
//! locales/mr.json ─┘            │
//!                               │ any file missing or malformed
//!                               ▼
//!                     Translations::empty()  (every t() returns its key)
//!
//! set_locale(Hi) ──► RwLock<Locale> ──► every clone sees it at once
//! ```

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::{error, info};
use udyamx_core::i18n::{Locale, Translations};

/// Reads `en.json`, `hi.json` and `mr.json` from `dir`.
///
/// All or nothing: if any file cannot be read or parsed the result is
/// empty tables, and every lookup falls back to its raw key.
pub fn load_translations(dir: &Path) -> Translations {
    let mut tables = Vec::with_capacity(Locale::ALL.len());

    for locale in Locale::ALL {
        let path = dir.join(format!("{}.json", locale.code()));
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()));

        match parsed {
            Ok(table) => tables.push((locale, table)),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load translation files");
                return Translations::empty();
            }
        }
    }

    info!(dir = %dir.display(), "Translations loaded");
    Translations::from_tables(tables)
}

/// Shared translator. Cloning is cheap and clones share the active locale.
#[derive(Debug, Clone)]
pub struct I18nState {
    translations: Arc<Translations>,
    locale: Arc<RwLock<Locale>>,
}

impl I18nState {
    pub fn new(translations: Translations, locale: Locale) -> Self {
        I18nState {
            translations: Arc::new(translations),
            locale: Arc::new(RwLock::new(locale)),
        }
    }

    pub fn locale(&self) -> Locale {
        *self.locale.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_locale(&self, locale: Locale) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale;
    }

    /// Translates `key` in the active locale.
    pub fn t(&self, key: &str) -> String {
        self.translations.translate(self.locale(), key)
    }

    /// Translates `key` and fills `{name}` placeholders.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.translations.translate_with(self.locale(), key, params)
    }
}
