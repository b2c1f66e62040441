//! Tablas fijas: ciudades reconocidas, categorías reconocidas y colores.
//!
//! Se modelan como datos (`Vocabulary`) que se pasan al normalizador, de modo
//! que los tests o un archivo JSON de configuración pueden sustituirlas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::StatsResult;

/// Gris usado cuando una categoría no tiene color asignado.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6c757d";

pub const CITIES: &[&str] = &[
    "المدينة المنورة",
    "العلا",
    "ينبع",
    "الحناكية",
    "مهد الذهب",
    "بدر",
    "خيبر",
    "وادي الفرع",
    "العيص",
];

pub const CATEGORIES: &[&str] = &[
    "المجال الاسعافي",
    "التعليم",
    "البيئة",
    "المساعدات الانسانية",
    "الاداري",
    "الإعلامي",
];

/// Forma corta -> forma canónica de la capital.
pub const CITY_ALIASES: &[(&str, &str)] = &[("المدينة", "المدينة المنورة")];

/// Etiquetas en inglés -> categoría canónica.
pub const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("Ambulance Field", "المجال الاسعافي"),
    ("Education", "التعليم"),
    ("Environment", "البيئة"),
    ("Humanitarian Aid", "المساعدات الانسانية"),
    ("Administrative", "الاداري"),
    ("Media", "الإعلامي"),
];

// The keys below carry the bidi control marks (U+202B, U+202C, U+200F) exactly
// as they exist in the historical dashboard. Only "الإعلامي" byte-matches its
// canonical label; the rest fall back to the default gray until the canonical
// label set is agreed on for both tables.
pub const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("الاداري\u{202c}\u{200f}", "#8B4513"),
    ("\u{202b}البيئة\u{202c}\u{200f}", "#28a745"),
    ("الإعلامي", "#007bff"),
    ("\u{202b}المجال الاسعافي\u{202c}\u{200f}", "#dc3545"),
    ("\u{202b}التعليم\u{202c}\u{200f}", "#ffc107"),
    (
        "\u{202b}المساعدات\u{202c}\u{200f} \u{202b}الانسانية\u{202c}\u{200f}",
        "#000000",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub cities: Vec<String>,
    pub categories: Vec<String>,
    #[serde(default)]
    pub city_aliases: HashMap<String, String>,
    #[serde(default)]
    pub category_aliases: HashMap<String, String>,
    #[serde(default)]
    pub category_colors: HashMap<String, String>,
    #[serde(default = "default_color")]
    pub default_color: String,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary {
            cities: CITIES.iter().map(|s| s.to_string()).collect(),
            categories: CATEGORIES.iter().map(|s| s.to_string()).collect(),
            city_aliases: to_map(CITY_ALIASES),
            category_aliases: to_map(CATEGORY_ALIASES),
            category_colors: to_map(CATEGORY_COLORS),
            default_color: default_color(),
        }
    }
}

impl Vocabulary {
    /// Carga el vocabulario desde un archivo JSON.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> StatsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reescribe la forma corta de una ciudad a su forma canónica.
    pub fn canonical_city<'a>(&'a self, name: &'a str) -> &'a str {
        self.city_aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn city_is_recognized(&self, name: &str) -> bool {
        let canonical = self.canonical_city(name);
        self.cities.iter().any(|c| c == canonical)
    }

    /// Traduce una etiqueta en inglés a la categoría canónica; si no es
    /// conocida se devuelve sin cambios.
    pub fn canonical_category<'a>(&'a self, label: &'a str) -> &'a str {
        self.category_aliases
            .get(label)
            .map(String::as_str)
            .unwrap_or(label)
    }

    pub fn category_is_recognized(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub fn category_color(&self, name: &str) -> &str {
        self.category_colors
            .get(name)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_capital_name_is_recognized() {
        let v = Vocabulary::default();
        assert!(v.city_is_recognized("المدينة"));
        assert_eq!(v.canonical_city("المدينة"), "المدينة المنورة");
        assert!(v.city_is_recognized("ينبع"));
        assert!(!v.city_is_recognized("الرياض"));
    }

    #[test]
    fn english_categories_map_to_canonical() {
        let v = Vocabulary::default();
        assert_eq!(v.canonical_category("Education"), "التعليم");
        assert_eq!(v.canonical_category("Unknown"), "Unknown");
        for alias in CATEGORY_ALIASES {
            assert!(v.category_is_recognized(v.canonical_category(alias.0)));
        }
    }

    #[test]
    fn color_lookup_only_matches_exact_bytes() {
        let v = Vocabulary::default();
        assert_eq!(v.category_color("الإعلامي"), "#007bff");
        // canonical label without the bidi marks does not hit the table
        assert_eq!(v.category_color("التعليم"), DEFAULT_CATEGORY_COLOR);
        assert_eq!(v.category_color("\u{202b}التعليم\u{202c}\u{200f}"), "#ffc107");
    }

    #[test]
    fn vocabulary_loads_from_json_with_defaults() {
        let json = r##"{"cities": ["A"], "categories": ["X"], "category_colors": {"X": "#111111"}}"##;
        let v: Vocabulary = serde_json::from_str(json).unwrap();
        assert!(v.city_is_recognized("A"));
        assert_eq!(v.category_color("X"), "#111111");
        assert_eq!(v.category_color("Y"), DEFAULT_CATEGORY_COLOR);
    }
}
