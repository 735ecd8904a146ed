use crate::core::{Basemap, Feature, FilterExpression, QueryError};
use crate::shared::FilterParameters;
use crate::surface::QueryTicket;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Klick auflösen: Hit-Test, Popup, ggf. räumliche Abfrage
    ResolveClick { screen_pos: glam::DVec2 },
    /// Sichtbarkeit eines Layers setzen
    SetLayerVisibility { layer: String, visible: bool },
    /// Filter-Slot eines Layers ersetzen (`None` = alle Features)
    SetLayerFilter {
        layer: String,
        filter: Option<FilterExpression>,
    },
    /// Formular-Parameter für die Zusammenfassung übernehmen
    RecordFilterParameters { params: FilterParameters },
    /// Ergebnis einer räumlichen Abfrage anwenden (oder verwerfen)
    CompleteSpatialQuery {
        ticket: QueryTicket,
        outcome: Result<Vec<Feature>, QueryError>,
    },
    /// Basiskarte setzen
    SetBasemap { basemap: Basemap },
    /// Ansicht auf die Ausdehnung der geladenen Layer einpassen
    FitToLayers,
    /// Viewport-Größe setzen
    SetViewportSize { size: [f64; 2] },
    /// Popup schließen
    ClosePopup,
}
