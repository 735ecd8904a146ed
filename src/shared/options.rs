//! Zentrale Konfiguration der Karten-Session.
//!
//! `SessionOptions` enthält alle beim Start konfigurierbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::core::{Basemap, FieldInfo, LayerSpec, PopupTemplate};

// ── Ansicht ─────────────────────────────────────────────────────────

/// Initiales Kartenzentrum über Marokko (Länge, Breite).
pub const INITIAL_CENTER: [f64; 2] = [-7.0, 32.0];
/// Initialer Zoom-Level.
pub const INITIAL_ZOOM: f64 = 5.0;
/// Pick-Radius für Punkt-Features in Screen-Pixeln.
pub const PICK_RADIUS_PX: f64 = 8.0;

// ── Felder ──────────────────────────────────────────────────────────

/// Name des Stations-Layers (Ziel von Filtern und räumlichen Abfragen).
pub const STATION_LAYER: &str = "stations";
/// Feld mit der stabilen Feature-ID.
pub const FEATURE_ID_FIELD: &str = "OBJECTID";
/// Feld, nach dem die Stationen im Diagramm gruppiert werden.
pub const CATEGORY_FIELD: &str = "type";
/// Feld mit dem Regionsnamen einer Station.
pub const REGION_FIELD: &str = "region";

// ── Diagramm ────────────────────────────────────────────────────────

/// Datensatz-Beschriftung des Balkendiagramms.
pub const CHART_LABEL: &str = "Nombre de stations par type";
/// Titel des Balkendiagramms.
pub const CHART_TITLE: &str = "Stations de transport par type";
/// Balkenfarbe.
pub const CHART_COLOR: &str = "rgba(75, 192, 192, 0.6)";

// ── Datenquellen ────────────────────────────────────────────────────

/// GeoJSON der Regionen.
pub const REGIONS_SOURCE: &str =
    "https://raw.githubusercontent.com/sokainadaabal/geo-map/main/data-map/region.geojson";
/// GeoJSON der Provinzen.
pub const PROVINCES_SOURCE: &str =
    "https://raw.githubusercontent.com/sokainadaabal/geo-map/main/data-map/provinces.geojson";
/// CSV der Verkehrsstationen.
pub const STATIONS_SOURCE: &str =
    "https://raw.githubusercontent.com/sokainadaabal/geo-map/main/data-map/transport_stations.csv";

/// Alle beim Session-Start konfigurierbaren Optionen.
/// Wird als `station_map_explorer.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    // ── Ansicht ─────────────────────────────────────────────────
    /// Initiales Kartenzentrum (Länge, Breite)
    pub initial_center: DVec2,
    /// Initialer Zoom-Level
    pub initial_zoom: f64,
    /// Initiale Basiskarte
    #[serde(default)]
    pub basemap: Basemap,
    /// Pick-Radius für Punkt-Features in Screen-Pixeln
    #[serde(default = "default_pick_radius_px")]
    pub pick_radius_px: f64,

    // ── Felder ──────────────────────────────────────────────────
    /// Ziel-Layer für Regionsfilter und räumliche Abfragen
    pub station_layer: String,
    /// Feld mit der stabilen Feature-ID
    pub feature_id_field: String,
    /// Gruppierungsfeld für das Diagramm
    pub category_field: String,
    /// Regionsfeld der Stationen
    pub region_field: String,

    // ── Diagramm ────────────────────────────────────────────────
    /// Datensatz-Beschriftung
    #[serde(default = "default_chart_label")]
    pub chart_label: String,
    /// Diagramm-Titel
    #[serde(default = "default_chart_title")]
    pub chart_title: String,
    /// Balkenfarbe
    #[serde(default = "default_chart_color")]
    pub chart_color: String,

    // ── Layer ───────────────────────────────────────────────────
    /// Zu ladende Layer in Zeichenreihenfolge (unten → oben)
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerSpec>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            initial_center: DVec2::from_array(INITIAL_CENTER),
            initial_zoom: INITIAL_ZOOM,
            basemap: Basemap::TopoVector,
            pick_radius_px: PICK_RADIUS_PX,

            station_layer: STATION_LAYER.to_string(),
            feature_id_field: FEATURE_ID_FIELD.to_string(),
            category_field: CATEGORY_FIELD.to_string(),
            region_field: REGION_FIELD.to_string(),

            chart_label: CHART_LABEL.to_string(),
            chart_title: CHART_TITLE.to_string(),
            chart_color: CHART_COLOR.to_string(),

            layers: default_layers(),
        }
    }
}

/// Serde-Default für `pick_radius_px` (Abwärtskompatibilität).
fn default_pick_radius_px() -> f64 {
    PICK_RADIUS_PX
}

fn default_chart_label() -> String {
    CHART_LABEL.to_string()
}

fn default_chart_title() -> String {
    CHART_TITLE.to_string()
}

fn default_chart_color() -> String {
    CHART_COLOR.to_string()
}

/// Standard-Layer: Regionen, Provinzen (beide mit Drill-Down) und Stationen.
pub fn default_layers() -> Vec<LayerSpec> {
    vec![
        LayerSpec::polygon("regions", REGIONS_SOURCE)
            .with_popup(PopupTemplate::new(
                "Région: {nom_region}",
                vec![
                    FieldInfo::new("nom_region", "Nom de la région"),
                    FieldInfo::new("shape_area", "Surface"),
                ],
            ))
            .with_drill_down(true),
        LayerSpec::polygon("provinces", PROVINCES_SOURCE)
            .with_popup(PopupTemplate::new(
                "Province: {nom_provin}",
                vec![
                    FieldInfo::new("nom_provin", "Nom de la province"),
                    FieldInfo::new("shape_area", "Surface"),
                ],
            ))
            .with_drill_down(true),
        LayerSpec::point(STATION_LAYER, STATIONS_SOURCE).with_popup(PopupTemplate::new(
            "Station de transport",
            vec![
                FieldInfo::new("name", "Nom"),
                FieldInfo::new("type", "Type"),
                FieldInfo::new("capacity", "Capacité"),
            ],
        )),
    ]
}

impl SessionOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("station_map_explorer"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("station_map_explorer.toml")
    }

    /// Sucht die Konfiguration eines Layers.
    pub fn layer_spec(&self, name: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|spec| spec.name == name)
    }
}
