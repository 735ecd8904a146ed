//! Handler für Ansicht, Basiskarte und Popup.

use crate::app::{AppState, InteractionState};
use crate::core::Basemap;
use crate::surface::MapSurface;

/// Wechselt die Basiskarte.
pub fn set_basemap(state: &mut AppState, surface: &mut dyn MapSurface, basemap: Basemap) {
    if state.view.basemap == basemap {
        return;
    }
    log::info!("Basiskarte: {}", basemap.id());
    state.view.basemap = basemap;
    surface.set_basemap(basemap);
}

/// Passt die Ansicht auf die Ausdehnung aller geladenen Layer ein.
pub fn fit_to_layers(state: &mut AppState, surface: &mut dyn MapSurface) {
    let Some(extent) = state.layers.loaded_extent() else {
        log::warn!("Keine Layer-Ausdehnung bekannt, Ansicht bleibt unverändert");
        return;
    };
    state.view.map_view.fit_extent(extent);
    surface.go_to_extent(extent);
}

/// Aktualisiert die Viewport-Größe.
pub fn set_viewport_size(state: &mut AppState, size: [f64; 2]) -> anyhow::Result<()> {
    anyhow::ensure!(
        size.iter().all(|v| v.is_finite() && *v > 0.0),
        "Ungültige Viewport-Größe {:?}",
        size
    );
    state.view.map_view.resize(glam::DVec2::from_array(size));
    Ok(())
}

/// Schließt das Popup. Eine laufende Abfrage bleibt gültig.
pub fn close_popup(state: &mut AppState, surface: &mut dyn MapSurface) {
    surface.close_popup();
    state.popup = None;
    if state.interaction == InteractionState::PopupOpen {
        state.interaction = InteractionState::Idle;
    }
}
