//! Popup-Templates und strukturierte Attributansicht.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::{Attributes, Feature};

/// Titel für Features ohne Popup-Template.
pub const GENERIC_POPUP_TITLE: &str = "Informations de position";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("gültige Regex"));

/// Ein angezeigtes Feld mit Beschriftung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Attributname
    pub field_name: String,
    /// Beschriftung im Popup
    pub label: String,
}

impl FieldInfo {
    /// Erstellt eine Feldbeschreibung.
    pub fn new(field_name: &str, label: &str) -> Self {
        Self {
            field_name: field_name.to_string(),
            label: label.to_string(),
        }
    }
}

/// Popup-Template eines Layers, z.B. Titel `Région: {nom_region}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupTemplate {
    /// Titel mit `{feld}`-Platzhaltern
    pub title: String,
    /// Angezeigte Felder in Reihenfolge
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
}

impl PopupTemplate {
    /// Erstellt ein Template.
    pub fn new(title: &str, fields: Vec<FieldInfo>) -> Self {
        Self {
            title: title.to_string(),
            fields,
        }
    }

    /// Setzt Attributwerte in die Titel-Platzhalter ein.
    ///
    /// Unbekannte Felder werden durch einen leeren String ersetzt.
    pub fn render_title(&self, attributes: &Attributes) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.title, |caps: &Captures| {
                attributes
                    .get(&caps[1])
                    .map(ToString::to_string)
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

/// Eine Zeile der Attributansicht.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRow {
    /// Beschriftung (Label oder Feldname)
    pub label: String,
    /// Formatierter Wert
    pub value: String,
}

/// Strukturierte Attributansicht eines angeklickten Features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeView {
    /// Popup-Titel
    pub title: String,
    /// Zeilen in Anzeigereihenfolge
    pub rows: Vec<AttributeRow>,
}

impl AttributeView {
    /// Baut die Ansicht über das Layer-Template oder generisch über alle Attribute.
    pub fn for_feature(feature: &Feature, template: Option<&PopupTemplate>) -> Self {
        match template {
            Some(template) => Self {
                title: template.render_title(&feature.attributes),
                rows: template
                    .fields
                    .iter()
                    .map(|info| AttributeRow {
                        label: info.label.clone(),
                        value: feature
                            .attribute(&info.field_name)
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                    })
                    .collect(),
            },
            None => Self::generic(feature),
        }
    }

    /// Generische Ansicht: alle Attribute als `feld: wert`.
    pub fn generic(feature: &Feature) -> Self {
        Self {
            title: GENERIC_POPUP_TITLE.to_string(),
            rows: feature
                .attributes
                .iter()
                .map(|(key, value)| AttributeRow {
                    label: key.clone(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    /// Textzeilen im Format `label: wert`.
    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| format!("{}: {}", row.label, row.value))
            .collect()
    }
}
