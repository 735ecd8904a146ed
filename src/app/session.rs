//! Karten-Session: besitzt State, Controller und Karte von der
//! Initialisierung bis zum Abbau.

use super::layer_registry::LayerRegistry;
use super::{handlers, AppController, AppIntent, AppState};
use crate::chart::{ChartData, ChartRenderer};
use crate::core::{CategoryDataset, Layer, SessionError};
use crate::shared::SessionOptions;
use crate::surface::MapSurface;

/// Eine Karten-Session. Alle Intents laufen seriell durch `handle_intent`.
pub struct MapSession<S: MapSurface> {
    state: AppState,
    controller: AppController,
    surface: S,
    active: bool,
}

impl<S: MapSurface> MapSession<S> {
    /// Initialisiert Karte und Layer.
    ///
    /// Scheitert die Initialisierung der Karte, ist die Session unbrauchbar.
    /// Einzelne Layer, die nicht laden, fehlen in der Registry; die Ansicht
    /// wird auf die geladenen Layer eingepasst.
    pub fn initialize(
        mut surface: S,
        options: SessionOptions,
        chart: Box<dyn ChartRenderer>,
    ) -> Result<Self, SessionError> {
        let mut state = AppState::new(options, chart);

        if let Err(e) = surface.initialize(&state.view.map_view, state.view.basemap) {
            log::error!("{}", e);
            return Err(e);
        }

        surface.configure_picking(
            &state.options.feature_id_field,
            state.options.pick_radius_px,
        );

        let specs = state.options.layers.clone();
        for spec in &specs {
            match surface.load_layer(spec) {
                Ok(extent) => state.layers.register(Layer::from_spec(spec, extent)),
                Err(e) => log::warn!("{}", e),
            }
        }
        log::info!(
            "Karte bereit: {} von {} Layern geladen ({})",
            state.layers.len(),
            specs.len(),
            state.layers.names().join(", ")
        );

        handlers::view::fit_to_layers(&mut state, &mut surface);

        Ok(Self {
            state,
            controller: AppController::new(),
            surface,
            active: true,
        })
    }

    /// Verarbeitet einen Intent.
    pub fn handle_intent(&mut self, intent: AppIntent) -> anyhow::Result<()> {
        anyhow::ensure!(self.active, "Session wurde bereits beendet");
        self.controller
            .handle_intent(&mut self.state, &mut self.surface, intent)
    }

    /// Verarbeitet einen Intent und loggt Fehler, statt sie weiterzugeben.
    pub fn dispatch(&mut self, intent: AppIntent) {
        if let Err(e) = self.handle_intent(intent) {
            log::error!("Intent fehlgeschlagen: {:#}", e);
        }
    }

    /// Read-only Zugriff auf den State.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Layer-Registry der Session.
    pub fn layers(&self) -> &LayerRegistry {
        &self.state.layers
    }

    /// Zuletzt veröffentlichter Kategorie-Datensatz.
    pub fn dataset(&self) -> &CategoryDataset {
        self.state.dataset()
    }

    /// Diagrammdaten des aktuellen Datensatzes.
    pub fn chart_data(&self) -> ChartData {
        self.state.aggregation.chart_data()
    }

    /// Read-only Zugriff auf die Karte.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutabler Zugriff auf die Karte (z.B. zum Auflösen von Abfragen).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// `true` bis `shutdown` aufgerufen wurde.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Baut Diagramm und Karte ab. Mehrfacher Aufruf ist wirkungslos.
    pub fn shutdown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.state.aggregation.teardown();
        self.state.popup = None;
        self.surface.destroy();
        log::info!("Karten-Session beendet");
    }
}

impl<S: MapSurface> Drop for MapSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
