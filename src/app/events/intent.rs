use crate::core::{Basemap, Feature, QueryError};
use crate::shared::{FilterParameters, VisibilityState};
use crate::surface::QueryTicket;

/// App-Intent Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone, PartialEq)]
pub enum AppIntent {
    /// Klick in die Karte (Screen-Pixel, Ursprung oben links)
    MapClicked { screen_pos: glam::DVec2 },
    /// Filter-Formular wurde abgesendet
    FilterSubmitted { params: FilterParameters },
    /// Layer-Schalter wurden betätigt (vollständiger Sichtbarkeitszustand)
    VisibilityChanged { visibility: VisibilityState },
    /// Einzelnen Layer umschalten
    LayerToggled { layer: String },
    /// Räumliche Abfrage ist abgeschlossen (asynchron zurückgeliefert)
    SpatialQueryCompleted {
        ticket: QueryTicket,
        outcome: Result<Vec<Feature>, QueryError>,
    },
    /// Basiskarte wechseln
    BasemapRequested { basemap: Basemap },
    /// Ansicht auf alle geladenen Layer einpassen
    ZoomToLayersRequested,
    /// Viewport-Größe hat sich geändert
    ViewportResized { size: [f64; 2] },
    /// Popup schließen (Schließen-Knopf)
    PopupCloseRequested,
}
