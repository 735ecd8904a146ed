//! Handler für abgeschlossene räumliche Abfragen.

use crate::app::{AppState, InteractionState};
use crate::core::{Feature, FilterExpression, QueryError};
use crate::surface::{MapSurface, QueryTicket};

use super::layers;

/// Wendet das Ergebnis der aktuellen Abfrage an; veraltete werden verworfen.
///
/// Ein Abfragefehler zählt als leeres Ergebnis.
pub fn complete(
    state: &mut AppState,
    surface: &mut dyn MapSurface,
    ticket: QueryTicket,
    outcome: Result<Vec<Feature>, QueryError>,
) {
    if !state.queries.accept(ticket) {
        return;
    }

    let features = outcome.unwrap_or_else(|e| {
        log::warn!("Räumliche Abfrage {} fehlgeschlagen: {}", ticket, e);
        state.query_failures += 1;
        Vec::new()
    });
    apply_selection(state, surface, &features);

    if let InteractionState::AwaitingQuery { .. } = state.interaction {
        state.interaction = if state.popup.is_some() {
            InteractionState::PopupOpen
        } else {
            InteractionState::Idle
        };
    }
}

/// Setzt den ID-Filter des Stations-Layers und veröffentlicht die Aggregation
/// aus derselben Feature-Menge.
pub fn apply_selection(state: &mut AppState, surface: &mut dyn MapSurface, features: &[Feature]) {
    let id_field = state.options.feature_id_field.clone();
    let ids: Vec<_> = features
        .iter()
        .filter_map(|feature| feature.id(&id_field))
        .collect();
    if ids.len() < features.len() {
        log::warn!(
            "{} Features ohne gültiges '{}' im Abfrageergebnis",
            features.len() - ids.len(),
            id_field
        );
    }

    let station_layer = state.options.station_layer.clone();
    layers::set_filter(
        state,
        surface,
        &station_layer,
        Some(FilterExpression::id_in(id_field, ids)),
    );
    state.aggregation.publish(features);
}
