//! Handler für Klicks in die Karte.

use glam::DVec2;

use super::query;
use crate::app::hit_test::{resolve_hit, HitResult};
use crate::app::{AppState, InteractionState};
use crate::core::{AttributeView, Feature, LayerKind};
use crate::surface::{MapSurface, PopupContent, QueryTicket};

/// Löst einen Klick auf.
///
/// - Punkt-Feature: Popup öffnen.
/// - Polygon-Feature: Popup öffnen, bei Drill-Down räumliche Abfrage starten.
/// - Kein Treffer: Popup schließen; Filter und Aggregation bleiben.
///
/// Jeder Klick macht eine noch laufende Abfrage ungültig.
pub fn resolve(state: &mut AppState, surface: &mut dyn MapSurface, screen_pos: DVec2) {
    let ticket = state.queries.begin_click();
    let view = state.view.map_view.clone();

    let hit = match resolve_hit(surface, &state.layers, screen_pos, &view) {
        Ok(hit) => hit,
        Err(e) => {
            log::warn!("Hit-Test fehlgeschlagen, Klick gilt als leer: {}", e);
            state.query_failures += 1;
            HitResult::Empty
        }
    };

    let feature = match hit {
        HitResult::Feature(feature) => feature,
        HitResult::Empty => {
            surface.close_popup();
            state.popup = None;
            state.interaction = InteractionState::Idle;
            return;
        }
    };

    let Some(layer) = state.layers.get(&feature.layer_name) else {
        return;
    };
    let kind = layer.kind;
    let drill_down = layer.drill_down;
    let content = PopupContent {
        location: view.screen_to_map(screen_pos),
        view: AttributeView::for_feature(&feature, layer.popup.as_ref()),
    };

    surface.open_popup(&content);
    state.popup = Some(content);

    match kind {
        LayerKind::Point => state.interaction = InteractionState::PopupOpen,
        LayerKind::Polygon if drill_down => start_drill_down(state, surface, feature, ticket),
        LayerKind::Polygon => state.interaction = InteractionState::PopupOpen,
    }
}

fn start_drill_down(
    state: &mut AppState,
    surface: &mut dyn MapSurface,
    feature: Feature,
    ticket: QueryTicket,
) {
    let station_layer = state.options.station_layer.clone();
    match state
        .queries
        .submit(surface, ticket, &station_layer, feature.geometry)
    {
        Ok(()) => {
            log::debug!(
                "Räumliche Abfrage {} auf '{}' gestartet",
                ticket,
                station_layer
            );
            state.interaction = InteractionState::AwaitingQuery { ticket };
        }
        Err(e) => {
            log::warn!("Räumliche Abfrage fehlgeschlagen, leeres Ergebnis: {}", e);
            state.query_failures += 1;
            query::apply_selection(state, surface, &[]);
            state.interaction = InteractionState::PopupOpen;
        }
    }
}
