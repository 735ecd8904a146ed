use crate::core::{Basemap, MapView};
use crate::shared::SessionOptions;

/// View-bezogener Anwendungszustand
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Aktuelle Kartenansicht
    pub map_view: MapView,
    /// Aktive Basiskarte
    pub basemap: Basemap,
}

impl ViewState {
    /// Erstellt den initialen View-Zustand aus den Session-Optionen.
    pub fn from_options(options: &SessionOptions) -> Self {
        Self {
            map_view: MapView::new(options.initial_center, options.initial_zoom),
            basemap: options.basemap,
        }
    }
}
