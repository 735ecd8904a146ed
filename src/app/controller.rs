//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};
use crate::surface::MapSurface;

/// Orchestriert Intents und Handler auf AppState und Karte.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(
        &mut self,
        state: &mut AppState,
        surface: &mut dyn MapSurface,
        intent: AppIntent,
    ) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, surface, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf AppState und Karte aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        surface: &mut dyn MapSurface,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Klick & Abfrage ===
            AppCommand::ResolveClick { screen_pos } => {
                handlers::click::resolve(state, surface, screen_pos)
            }
            AppCommand::CompleteSpatialQuery { ticket, outcome } => {
                handlers::query::complete(state, surface, ticket, outcome)
            }

            // === Layer ===
            AppCommand::SetLayerVisibility { layer, visible } => {
                handlers::layers::set_visibility(state, surface, &layer, visible)
            }
            AppCommand::SetLayerFilter { layer, filter } => {
                handlers::layers::set_filter(state, surface, &layer, filter)
            }
            AppCommand::RecordFilterParameters { params } => {
                handlers::layers::record_filter_parameters(state, params)
            }

            // === Ansicht ===
            AppCommand::SetBasemap { basemap } => {
                handlers::view::set_basemap(state, surface, basemap)
            }
            AppCommand::FitToLayers => handlers::view::fit_to_layers(state, surface),
            AppCommand::SetViewportSize { size } => {
                handlers::view::set_viewport_size(state, size)?
            }
            AppCommand::ClosePopup => handlers::view::close_popup(state, surface),
        }

        Ok(())
    }
}
