//! Application-Layer: Controller, State, Events, Handler und Session.

pub mod aggregation;
pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
mod intent_mapping;
pub mod layer_registry;
pub mod session;
pub mod spatial_query;
/// Application State
///
/// Dieses Modul verwaltet den Zustand einer Karten-Session (Layer, Popup, Abfragen).
pub mod state;

pub use aggregation::AggregationEngine;
pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent};
pub use hit_test::{resolve_hit, HitResult};
pub use layer_registry::{LayerRegistry, RegistryChange};
pub use session::MapSession;
pub use spatial_query::SpatialQueryService;
pub use state::{AppState, InteractionState, ViewState};
