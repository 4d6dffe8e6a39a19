//! Lightweight i18n translation registry.
//!
//! Provides a centralized, static translation map keyed by `(locale, message_key)`.
//! Supported locales: `en` and `id` (Bahasa Indonesia). No external i18n
//! framework dependency.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Default locale when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Supported locales.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "id"];

/// Central translation registry.
pub struct Translations {
    map: HashMap<(&'static str, &'static str), &'static str>,
}

impl Translations {
    /// Get a translated string for the given locale and key.
    /// Falls back to `en` if the locale is not found, then to the provided default.
    pub fn get<'a>(&self, locale: &str, key: &str, default: &'a str) -> &'a str {
        if let Some(&val) = self.map.get(&(locale, key)) {
            return val;
        }
        if locale != "en" {
            if let Some(&val) = self.map.get(&("en", key)) {
                return val;
            }
        }
        default
    }
}

/// Global translation singleton.
pub static TRANSLATIONS: LazyLock<Translations> = LazyLock::new(|| {
    let mut map = HashMap::new();

    macro_rules! t {
        ($locale:expr, $key:expr, $val:expr) => {
            map.insert(($locale, $key), $val);
        };
    }

    // ---- Alert messages ----
    t!(
        "en",
        "alert.threshold",
        "{rule}: {sensor} reading {value:.2}{unit} is {op} {limit:.2}{unit}"
    );
    t!(
        "id",
        "alert.threshold",
        "{rule}: pembacaan {sensor} {value:.2}{unit} {op} {limit:.2}{unit}"
    );

    // ---- Threshold operator display ----
    t!("en", "op.above", "above");
    t!("id", "op.above", "di atas");
    t!("en", "op.below", "below");
    t!("id", "op.below", "di bawah");
    t!("en", "op.at_or_above", "at or above");
    t!("id", "op.at_or_above", "mencapai atau di atas");
    t!("en", "op.at_or_below", "at or below");
    t!("id", "op.at_or_below", "mencapai atau di bawah");

    // ---- Severity labels ----
    t!("en", "severity.low", "Low");
    t!("id", "severity.low", "Rendah");
    t!("en", "severity.medium", "Medium");
    t!("id", "severity.medium", "Sedang");
    t!("en", "severity.high", "High");
    t!("id", "severity.high", "Tinggi");
    t!("en", "severity.critical", "Critical");
    t!("id", "severity.critical", "Kritis");

    // ---- System status labels ----
    t!("en", "status.normal", "NORMAL");
    t!("id", "status.normal", "NORMAL");
    t!("en", "status.alert", "ALERT");
    t!("id", "status.alert", "WASPADA");
    t!("en", "status.degraded", "DEGRADED");
    t!("id", "status.degraded", "TERGANGGU");

    Translations { map }
});

/// Check if a locale string is supported.
pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Normalize locale: return the locale if supported, otherwise return the default.
pub fn normalize_locale(locale: &str) -> &str {
    if is_supported_locale(locale) {
        locale
    } else {
        DEFAULT_LOCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_translation_id() {
        let t = &*TRANSLATIONS;
        assert_eq!(t.get("id", "status.alert", ""), "WASPADA");
        assert_eq!(t.get("id", "severity.critical", ""), "Kritis");
    }

    #[test]
    fn test_get_translation_en() {
        let t = &*TRANSLATIONS;
        assert_eq!(t.get("en", "status.alert", ""), "ALERT");
        assert_eq!(t.get("en", "op.above", ""), "above");
    }

    #[test]
    fn test_fallback_to_en() {
        let t = &*TRANSLATIONS;
        assert_eq!(t.get("fr", "status.degraded", ""), "DEGRADED");
    }

    #[test]
    fn test_fallback_to_default() {
        let t = &*TRANSLATIONS;
        assert_eq!(t.get("en", "nonexistent.key", "default_val"), "default_val");
    }

    #[test]
    fn test_all_keys_have_both_locales() {
        let t = &*TRANSLATIONS;
        let keys: std::collections::HashSet<&str> = t.map.keys().map(|(_, key)| *key).collect();

        for key in &keys {
            for locale in SUPPORTED_LOCALES {
                assert!(
                    t.map.contains_key(&(*locale, *key)),
                    "Missing {locale} translation for key: {key}"
                );
            }
        }
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("id"), "id");
        assert_eq!(normalize_locale("en"), "en");
        assert_eq!(normalize_locale("zh-CN"), DEFAULT_LOCALE);
    }
}
