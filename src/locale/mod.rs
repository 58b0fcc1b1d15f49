//! Keyed multi-locale string table with en-US fallback.
//!
//! Locale files live at `<locale_dir>/<feature-group>/{ru,uk,en_US}.json`,
//! each a flat map of key to template. Missing files are created empty on
//! startup. After ingest, every key missing a locale is filled from the
//! `en-US` table when present. Lookups with an unknown locale, or for an
//! unknown key, return the key itself so a broken translation never breaks
//! a command.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::error::AppError;

/// Locales the bot declares on its slash commands.
pub const SUPPORTED_LOCALES: [&str; 3] = ["ru", "uk", "en-US"];

/// File stem used on disk for each supported locale.
fn file_stem(locale: &str) -> &'static str {
    match locale {
        "ru" => "ru",
        "uk" => "uk",
        _ => "en_US",
    }
}

/// In-memory localization store.
pub struct Locales {
    /// locale -> key -> template
    tables: HashMap<String, HashMap<String, String>>,
}

impl Locales {
    /// Builds an empty store. Used by tests and as the degraded fallback
    /// when the locale directory is unreadable.
    pub fn empty() -> Self {
        let mut tables = HashMap::new();
        for locale in SUPPORTED_LOCALES {
            tables.insert(locale.to_string(), HashMap::new());
        }
        Self { tables }
    }

    /// Loads every feature group under `dir`.
    ///
    /// Creates missing locale files as empty JSON objects, then fills
    /// per-key gaps from the `en-US` table.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let mut store = Self::empty();
        let dir = dir.as_ref();

        if !dir.is_dir() {
            warn!("locale directory {} does not exist, starting empty", dir.display());
            return Ok(store);
        }

        for entry in std::fs::read_dir(dir).map_err(|e| AppError::InternalError(e.to_string()))? {
            let entry = entry.map_err(|e| AppError::InternalError(e.to_string()))?;
            if !entry.path().is_dir() {
                continue;
            }
            for locale in SUPPORTED_LOCALES {
                let path = entry.path().join(format!("{}.json", file_stem(locale)));
                if !path.exists() {
                    std::fs::write(&path, "{}")
                        .map_err(|e| AppError::InternalError(e.to_string()))?;
                }
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| AppError::InternalError(e.to_string()))?;
                let table: HashMap<String, String> = serde_json::from_str(&raw)?;
                store.extend(locale, table);
            }
        }

        store.fill_from_default();
        Ok(store)
    }

    /// Merges a key table into one locale. Later groups win on key clash.
    pub fn extend(&mut self, locale: &str, table: HashMap<String, String>) {
        if let Some(existing) = self.tables.get_mut(locale) {
            existing.extend(table);
        }
    }

    /// Copies `en-US` templates into every locale that is missing the key.
    pub fn fill_from_default(&mut self) {
        let defaults = match self.tables.get("en-US") {
            Some(t) => t.clone(),
            None => return,
        };

        for locale in SUPPORTED_LOCALES {
            if locale == "en-US" {
                continue;
            }
            if let Some(table) = self.tables.get_mut(locale) {
                for (key, template) in &defaults {
                    table
                        .entry(key.clone())
                        .or_insert_with(|| template.clone());
                }
            }
        }
    }

    /// Looks up and formats a template.
    ///
    /// Guarantee: returns `template.format(values)` when `(key, locale)`
    /// is defined, and the raw `key` otherwise (including invalid locales).
    pub fn get(&self, key: &str, locale: &str, values: &[&str]) -> String {
        match self.tables.get(locale).and_then(|t| t.get(key)) {
            Some(template) => format_positional(template, values),
            None => key.to_string(),
        }
    }
}

/// Maps a Discord locale tag to the closest supported locale.
pub fn matching_locale(tag: &str) -> &'static str {
    if tag.starts_with("ru") {
        "ru"
    } else if tag.starts_with("uk") {
        "uk"
    } else {
        "en-US"
    }
}

/// Substitutes positional `{}` markers with `values` in order.
///
/// Extra markers are left in place; extra values are ignored.
fn format_positional(template: &str, values: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut idx = 0usize;

    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match values.get(idx) {
            Some(v) => out.push_str(v),
            None => out.push_str("{}"),
        }
        idx += 1;
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(key: &str, ru: Option<&str>, en: Option<&str>) -> Locales {
        let mut store = Locales::empty();
        if let Some(t) = ru {
            store.extend("ru", HashMap::from([(key.to_string(), t.to_string())]));
        }
        if let Some(t) = en {
            store.extend("en-US", HashMap::from([(key.to_string(), t.to_string())]));
        }
        store
    }

    #[test]
    fn formats_positional_values() {
        let store = store_with("pay.done", None, Some("{} paid {} coins"));
        assert_eq!(
            store.get("pay.done", "en-US", &["alice", "75"]),
            "alice paid 75 coins"
        );
    }

    #[test]
    fn unknown_key_returns_key() {
        let store = Locales::empty();
        assert_eq!(store.get("missing.key", "en-US", &[]), "missing.key");
    }

    #[test]
    fn invalid_locale_returns_key() {
        let store = store_with("hello", None, Some("hi"));
        assert_eq!(store.get("hello", "de", &[]), "hello");
    }

    #[test]
    fn missing_locale_falls_back_to_default_after_fill() {
        let mut store = store_with("hello", None, Some("hi"));
        store.fill_from_default();
        assert_eq!(store.get("hello", "ru", &[]), "hi");
    }

    #[test]
    fn existing_translation_survives_fill() {
        let mut store = store_with("hello", Some("привет"), Some("hi"));
        store.fill_from_default();
        assert_eq!(store.get("hello", "ru", &[]), "привет");
    }

    #[test]
    fn surplus_markers_are_left_in_place() {
        assert_eq!(format_positional("{} and {}", &["a"]), "a and {}");
    }

    #[test]
    fn locale_tags_match_by_prefix() {
        assert_eq!(matching_locale("ru"), "ru");
        assert_eq!(matching_locale("uk"), "uk");
        assert_eq!(matching_locale("en-GB"), "en-US");
        assert_eq!(matching_locale("de"), "en-US");
    }
}
