//! Handler für Sichtbarkeit, Filter und Formular-Parameter.

use crate::app::AppState;
use crate::core::FilterExpression;
use crate::shared::FilterParameters;
use crate::surface::MapSurface;

/// Setzt die Sichtbarkeit; die Karte wird nur bei Änderung aktualisiert.
pub fn set_visibility(
    state: &mut AppState,
    surface: &mut dyn MapSurface,
    layer: &str,
    visible: bool,
) {
    if state.layers.set_visibility(layer, visible).is_updated() {
        surface.set_layer_visibility(layer, visible);
    }
}

/// Ersetzt den Filter-Slot; derselbe Ausdruck erzeugt keinen Kartenaufruf.
pub fn set_filter(
    state: &mut AppState,
    surface: &mut dyn MapSurface,
    layer: &str,
    filter: Option<FilterExpression>,
) {
    if !state.layers.set_filter(layer, filter).is_updated() {
        return;
    }
    if let Some(active) = state.layers.filter(layer) {
        log::info!("Filter '{}' gesetzt: {}", layer, active);
        surface.set_layer_filter(layer, active);
    }
}

/// Übernimmt die Formular-Parameter für die Zusammenfassung.
pub fn record_filter_parameters(state: &mut AppState, params: FilterParameters) {
    if let Some((lat, lon)) = params.center_coordinates() {
        log::debug!("Suchzentrum: {}, {}", lat, lon);
    }
    state.filter_params = params;
}
