//! Skalare Attributwerte von Features.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribut-Tabelle eines Features in Quell-Reihenfolge (Feldname → Wert).
pub type Attributes = IndexMap<String, AttributeValue>;

/// Einzelner skalarer Attributwert.
///
/// Entspricht den Werttypen, die GeoJSON-Properties und CSV-Zellen liefern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Fehlender Wert (`null`)
    Null,
    /// Wahrheitswert
    Bool(bool),
    /// Ganzzahl (z.B. `OBJECTID`, Kapazität)
    Integer(i64),
    /// Gleitkommazahl (z.B. Fläche, Koordinaten)
    Number(f64),
    /// Text
    Text(String),
}

impl AttributeValue {
    /// `true` für `null` und leere bzw. nur aus Whitespace bestehende Texte.
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Interpretiert den Wert als stabile Feature-ID.
    ///
    /// Gleitkommazahlen werden nur akzeptiert, wenn sie ganzzahlig sind.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(value) => Some(*value),
            AttributeValue::Number(value) if value.fract() == 0.0 && value.is_finite() => {
                Some(*value as i64)
            }
            AttributeValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpretiert den Wert als endliche Gleitkommazahl (Koordinatenfelder).
    ///
    /// `NaN` und `inf` gelten als ungültig.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            AttributeValue::Integer(value) => *value as f64,
            AttributeValue::Number(value) => *value,
            AttributeValue::Text(text) => text.trim().parse().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Bool(value) => write!(f, "{value}"),
            AttributeValue::Integer(value) => write!(f, "{value}"),
            AttributeValue::Number(value) => write!(f, "{value}"),
            AttributeValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_detection_covers_null_and_blank_text() {
        assert!(AttributeValue::Null.is_empty());
        assert!(AttributeValue::from("   ").is_empty());
        assert!(!AttributeValue::from("bus").is_empty());
        assert!(!AttributeValue::Integer(0).is_empty());
    }

    #[test]
    fn id_conversion_accepts_integral_values_only() {
        assert_eq!(AttributeValue::Integer(7).as_id(), Some(7));
        assert_eq!(AttributeValue::Number(12.0).as_id(), Some(12));
        assert_eq!(AttributeValue::Number(12.5).as_id(), None);
        assert_eq!(AttributeValue::from(" 42 ").as_id(), Some(42));
        assert_eq!(AttributeValue::Null.as_id(), None);
    }

    #[test]
    fn untagged_json_maps_to_expected_variants() {
        let attrs: Attributes = serde_json::from_str(
            r#"{"name":"Gare Casa-Port","capacity":120,"shape_area":1.5,"active":true,"note":null}"#,
        )
        .expect("JSON sollte parsebar sein");

        assert_eq!(attrs["name"], AttributeValue::from("Gare Casa-Port"));
        assert_eq!(attrs["capacity"], AttributeValue::Integer(120));
        assert_eq!(attrs["shape_area"], AttributeValue::Number(1.5));
        assert_eq!(attrs["active"], AttributeValue::Bool(true));
        assert_eq!(attrs["note"], AttributeValue::Null);
        // Quell-Reihenfolge bleibt erhalten
        let keys: Vec<&str> = attrs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "capacity", "shape_area", "active", "note"]);
    }

    #[test]
    fn coordinate_conversion_rejects_non_finite_values() {
        assert_eq!(AttributeValue::from(" -7.5 ").as_f64(), Some(-7.5));
        assert_eq!(AttributeValue::Integer(33).as_f64(), Some(33.0));
        assert_eq!(AttributeValue::from("NaN").as_f64(), None);
        assert_eq!(AttributeValue::from("inf").as_f64(), None);
        assert_eq!(AttributeValue::from("-infinity").as_f64(), None);
        assert_eq!(AttributeValue::Number(f64::NAN).as_f64(), None);
    }
}
