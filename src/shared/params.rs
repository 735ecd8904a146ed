//! Externe Eingaben aus Formular und Layer-Schaltern.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::core::FilterExpression;

static CENTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").expect("gültige Regex")
});

/// Filter-Parameter aus dem Formular (bei Absenden geliefert).
///
/// Nur `region` wirkt auf die Karte; Radius und Zentrum werden nur angezeigt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    /// Regionsname, leer = alle Regionen
    #[serde(default)]
    pub region: String,
    /// Suchradius in km
    #[serde(default)]
    pub radius: Option<f64>,
    /// Suchzentrum als Text `lat,lon`, leer = keines
    #[serde(default)]
    pub center: String,
}

impl FilterParameters {
    /// Übernimmt die rohen Formularwerte; ein unlesbarer Radius wird verworfen.
    pub fn from_form(region: &str, radius_text: &str, center_text: &str) -> Self {
        let radius_text = radius_text.trim();
        let radius = if radius_text.is_empty() {
            None
        } else {
            match radius_text.replace(',', ".").parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    log::warn!("Ungültiger Suchradius '{}' ignoriert", radius_text);
                    None
                }
            }
        };

        Self {
            region: region.to_string(),
            radius,
            center: center_text.to_string(),
        }
    }

    /// Deklarativer Filter für den Stations-Layer (`1=1` für alle Regionen).
    pub fn region_filter(&self, region_field: &str) -> FilterExpression {
        if self.region.trim().is_empty() {
            FilterExpression::All
        } else {
            FilterExpression::field_equals(region_field, self.region.clone())
        }
    }

    /// Parst das Suchzentrum als `(lat, lon)`.
    pub fn center_coordinates(&self) -> Option<(f64, f64)> {
        let caps = CENTER_RE.captures(&self.center)?;
        let lat = caps[1].parse().ok()?;
        let lon = caps[2].parse().ok()?;
        Some((lat, lon))
    }

    /// Zusammenfassung für das Dashboard.
    pub fn summary_lines(&self) -> Vec<String> {
        let region = if self.region.trim().is_empty() {
            "Aucune".to_string()
        } else {
            self.region.clone()
        };
        let radius = self
            .radius
            .map_or_else(|| "Non spécifié".to_string(), |r| r.to_string());
        let center = match self.center_coordinates() {
            Some((lat, lon)) => format!("{lat}, {lon}"),
            None => "Non spécifié".to_string(),
        };

        vec![
            format!("Région sélectionnée: {region}"),
            format!("Rayon de recherche: {radius} km"),
            format!("Centre de recherche: {center}"),
        ]
    }
}

/// Sichtbarkeit je Layer-Name (bei jedem Umschalten geliefert).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityState(BTreeMap<String, bool>);

impl VisibilityState {
    /// Erstellt einen leeren Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: setzt die Sichtbarkeit eines Layers.
    pub fn with(mut self, layer: &str, visible: bool) -> Self {
        self.0.insert(layer.to_string(), visible);
        self
    }

    /// Sichtbarkeit eines Layers (falls enthalten).
    pub fn get(&self, layer: &str) -> Option<bool> {
        self.0.get(layer).copied()
    }

    /// Alle Einträge in Namensreihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, visible)| (name.as_str(), *visible))
    }

    /// Anzahl Einträge.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true`, wenn kein Eintrag vorhanden ist.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, bool)> for VisibilityState {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
