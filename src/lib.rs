//! Station Map Explorer Library.
//! Interaktions- und Spatial-Filter-Kern einer Karte mit Regionen, Provinzen
//! und Verkehrsstationen; als Library exportiert für Tests und Hosts.

pub mod app;
pub mod chart;
pub mod core;
pub mod shared;
pub mod surface;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, HitResult, InteractionState, LayerRegistry,
    MapSession,
};
pub use chart::{ChartData, ChartRenderer, ChartSpec, RecordingChart};
pub use core::{
    aggregate, Basemap, CategoryCount, CategoryDataset, Feature, FeatureGeometry,
    FilterExpression, LayerKind, LayerSpec, MapView, QueryError, SessionError,
};
pub use shared::{FilterParameters, SessionOptions, VisibilityState};
pub use surface::{InMemorySurface, MapSurface, QueryTicket, SurfaceFixture};
