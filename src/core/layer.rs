//! Layer-Beschreibungen und Layer-Zustand.

use geo::Rect;
use serde::{Deserialize, Serialize};

use super::{FilterExpression, PopupTemplate};

/// Art eines Layers; steuert Popup- und Abfrageverhalten beim Klick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Flächen-Layer (Regionen, Provinzen)
    Polygon,
    /// Punkt-Layer (Verkehrsstationen)
    Point,
}

/// Koordinatenfelder einer Punkt-Tabelle (CSV).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateFields {
    /// Feldname der geographischen Breite
    pub latitude: String,
    /// Feldname der geographischen Länge
    pub longitude: String,
}

impl Default for CoordinateFields {
    fn default() -> Self {
        Self {
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

/// Konfiguration eines zu ladenden Layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Eindeutiger Layer-Name
    pub name: String,
    /// Layer-Art
    pub kind: LayerKind,
    /// Quell-URI (GeoJSON bzw. CSV)
    pub source: String,
    /// Initiale Sichtbarkeit
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Klick auf ein Feature dieses Layers filtert den Stations-Layer räumlich
    #[serde(default)]
    pub drill_down: bool,
    /// Koordinatenfelder (nur Punkt-Layer)
    #[serde(default)]
    pub coordinate_fields: Option<CoordinateFields>,
    /// Popup-Template; ohne Template wird das generische Popup verwendet
    #[serde(default)]
    pub popup: Option<PopupTemplate>,
}

/// Serde-Default für `visible`.
fn default_visible() -> bool {
    true
}

impl LayerSpec {
    /// Polygon-Layer aus einer GeoJSON-Quelle.
    pub fn polygon(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: LayerKind::Polygon,
            source: source.to_string(),
            visible: true,
            drill_down: false,
            coordinate_fields: None,
            popup: None,
        }
    }

    /// Punkt-Layer aus einer CSV-Quelle mit Standard-Koordinatenfeldern.
    pub fn point(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: LayerKind::Point,
            source: source.to_string(),
            visible: true,
            drill_down: false,
            coordinate_fields: Some(CoordinateFields::default()),
            popup: None,
        }
    }

    /// Builder: setzt das Popup-Template.
    pub fn with_popup(mut self, popup: PopupTemplate) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Builder: aktiviert/deaktiviert den räumlichen Drill-Down.
    pub fn with_drill_down(mut self, drill_down: bool) -> Self {
        self.drill_down = drill_down;
        self
    }
}

/// Geladener Layer in der Registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Eindeutiger Name (Identität)
    pub name: String,
    /// Layer-Art
    pub kind: LayerKind,
    /// Quell-URI
    pub source: String,
    /// Aktuelle Sichtbarkeit
    pub visible: bool,
    /// Aktiver Filter (genau ein Slot)
    pub filter: FilterExpression,
    /// Popup-Template
    pub popup: Option<PopupTemplate>,
    /// Räumlicher Drill-Down bei Klick
    pub drill_down: bool,
    /// Ausdehnung der geladenen Features
    pub extent: Option<Rect<f64>>,
}

impl Layer {
    /// Erstellt den Registry-Eintrag für einen erfolgreich geladenen Layer.
    pub fn from_spec(spec: &LayerSpec, extent: Option<Rect<f64>>) -> Self {
        Self {
            name: spec.name.clone(),
            kind: spec.kind,
            source: spec.source.clone(),
            visible: spec.visible,
            filter: FilterExpression::All,
            popup: spec.popup.clone(),
            drill_down: spec.drill_down && spec.kind == LayerKind::Polygon,
            extent,
        }
    }

    /// Deklarative String-Form des aktiven Filters.
    pub fn filter_expression(&self) -> String {
        self.filter.to_string()
    }
}
