//! Mapping von Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::MapClicked { screen_pos } => vec![AppCommand::ResolveClick { screen_pos }],
        AppIntent::FilterSubmitted { params } => {
            let filter = params.region_filter(&state.options.region_field);
            vec![
                AppCommand::RecordFilterParameters { params },
                AppCommand::SetLayerFilter {
                    layer: state.options.station_layer.clone(),
                    filter: Some(filter),
                },
            ]
        }
        AppIntent::VisibilityChanged { visibility } => visibility
            .iter()
            .map(|(layer, visible)| AppCommand::SetLayerVisibility {
                layer: layer.to_string(),
                visible,
            })
            .collect(),
        AppIntent::LayerToggled { layer } => match state.layers.visibility(&layer) {
            Some(visible) => vec![AppCommand::SetLayerVisibility {
                layer,
                visible: !visible,
            }],
            None => {
                log::warn!("Umschalten des unbekannten Layers '{}' ignoriert", layer);
                Vec::new()
            }
        },
        AppIntent::SpatialQueryCompleted { ticket, outcome } => {
            vec![AppCommand::CompleteSpatialQuery { ticket, outcome }]
        }
        AppIntent::BasemapRequested { basemap } => vec![AppCommand::SetBasemap { basemap }],
        AppIntent::ZoomToLayersRequested => vec![AppCommand::FitToLayers],
        AppIntent::ViewportResized { size } => vec![AppCommand::SetViewportSize { size }],
        AppIntent::PopupCloseRequested => vec![AppCommand::ClosePopup],
    }
}
