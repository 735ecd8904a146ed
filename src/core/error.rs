//! Fehler-Taxonomie der Karten-Session.

use thiserror::Error;

/// Fataler Session-Fehler: die Karte kann nicht benutzt werden.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Das Mapping-SDK konnte nicht initialisiert werden (kein Retry)
    #[error("Mapping-Module konnten nicht geladen werden: {0}")]
    ModuleLoad(String),
}

/// Wiederherstellbarer Abfragefehler (Hit-Test oder räumliche Abfrage).
///
/// Wird am Ursprung geloggt und als leeres Ergebnis behandelt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Ansicht noch nicht bereit
    #[error("Kartenansicht ist nicht bereit")]
    ViewNotReady,
    /// Abfrage gegen einen nicht geladenen Layer
    #[error("Layer '{0}' ist nicht geladen")]
    UnknownLayer(String),
    /// Sonstiger Fehler des Karten-Kollaborateurs
    #[error("Abfrage fehlgeschlagen: {0}")]
    Failed(String),
}

/// Eine Datenquelle konnte nicht geladen werden; der Layer fehlt in der Registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Layer '{layer}' konnte nicht geladen werden ({uri}): {reason}")]
pub struct LayerLoadError {
    /// Name des betroffenen Layers
    pub layer: String,
    /// Quell-URI
    pub uri: String,
    /// Ursache
    pub reason: String,
}
