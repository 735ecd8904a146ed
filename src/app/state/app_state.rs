use crate::app::aggregation::AggregationEngine;
use crate::app::layer_registry::LayerRegistry;
use crate::app::spatial_query::SpatialQueryService;
use crate::app::CommandLog;
use crate::chart::ChartRenderer;
use crate::core::CategoryDataset;
use crate::shared::{FilterParameters, SessionOptions};
use crate::surface::{PopupContent, QueryTicket};

use super::ViewState;

/// Zustand der Klick-Interaktion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// Kein Popup, keine Abfrage
    #[default]
    Idle,
    /// Popup eines Polygons offen, räumliche Abfrage läuft
    AwaitingQuery {
        /// Ticket der laufenden Abfrage
        ticket: QueryTicket,
    },
    /// Popup offen, nichts ausstehend
    PopupOpen,
}

/// Hauptzustand einer Karten-Session
#[derive(Debug)]
pub struct AppState {
    /// Session-Optionen (beim Start geladen)
    pub options: SessionOptions,
    /// Geladene Layer mit Sichtbarkeit und Filter
    pub layers: LayerRegistry,
    /// Zustand der Klick-Interaktion
    pub interaction: InteractionState,
    /// Inhalt des offenen Popups
    pub popup: Option<PopupContent>,
    /// View-State
    pub view: ViewState,
    /// Zuletzt abgesendete Formular-Parameter
    pub filter_params: FilterParameters,
    /// Klick-Sequenz und laufende Abfrage
    pub queries: SpatialQueryService,
    /// Kategorie-Aggregation und Diagramm-Handle
    pub aggregation: AggregationEngine,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Anzahl abgefangener Abfragefehler
    pub query_failures: usize,
}

impl AppState {
    /// Erstellt einen neuen State ohne geladene Layer.
    pub fn new(options: SessionOptions, chart: Box<dyn ChartRenderer>) -> Self {
        Self {
            layers: LayerRegistry::new(),
            interaction: InteractionState::Idle,
            popup: None,
            view: ViewState::from_options(&options),
            filter_params: FilterParameters::default(),
            queries: SpatialQueryService::new(),
            aggregation: AggregationEngine::new(chart, &options),
            command_log: CommandLog::new(),
            query_failures: 0,
            options,
        }
    }

    /// Gibt zurück, ob ein Popup offen ist.
    pub fn popup_open(&self) -> bool {
        self.popup.is_some()
    }

    /// Zuletzt veröffentlichter Kategorie-Datensatz.
    pub fn dataset(&self) -> &CategoryDataset {
        self.aggregation.dataset()
    }

    /// Dashboard-Zusammenfassung der Formular-Parameter.
    pub fn filter_summary(&self) -> Vec<String> {
        self.filter_params.summary_lines()
    }
}
