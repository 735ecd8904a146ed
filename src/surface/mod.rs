//! Schnittstelle zum Karten-Kollaborateur (Rendering, Hit-Test, Abfragen).
//!
//! Die Session spricht ausschließlich über den `MapSurface`-Trait mit der
//! Karte. `InMemorySurface` ist die Referenz-Implementierung für Tests,
//! Benchmarks und das Replay-Binary.

mod memory;

pub use memory::{FixtureSource, InMemorySurface, PolygonRecord, SurfaceFixture};

use geo::{Point, Rect};
use glam::DVec2;

use crate::core::{
    AttributeView, Basemap, Feature, FeatureGeometry, FilterExpression, LayerLoadError, LayerSpec,
    MapView, QueryError, SessionError,
};

/// Ein Treffer des Hit-Tests in Zeichenreihenfolge (oberster zuerst).
#[derive(Debug, Clone, PartialEq)]
pub struct HitCandidate {
    /// Besitzender Layer; `None` für Dekorations-/Skizzen-Grafiken
    pub layer_name: Option<String>,
    /// Getroffenes Feature
    pub feature: Feature,
}

/// Monoton steigende Klick-Sequenznummer, mit der Abfragen verknüpft sind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QueryTicket(pub u64);

impl std::fmt::Display for QueryTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Asynchrone „intersects“-Abfrage gegen einen Layer.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectsQuery {
    /// Klick, zu dem die Abfrage gehört
    pub ticket: QueryTicket,
    /// Abgefragter Layer
    pub layer_name: String,
    /// Abfragegeometrie
    pub geometry: FeatureGeometry,
}

/// Abschluss einer Abfrage, wie er vom Kollaborateur zurückgeliefert wird.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCompletion {
    /// Ticket der ursprünglichen Abfrage
    pub ticket: QueryTicket,
    /// Ergebnis-Features oder Abfragefehler
    pub outcome: Result<Vec<Feature>, QueryError>,
}

/// Inhalt eines geöffneten Popups.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    /// Anker in Karten-Koordinaten
    pub location: Point<f64>,
    /// Strukturierte Attributansicht
    pub view: AttributeView,
}

/// Fähigkeiten, die der Kern vom Karten-Kollaborateur benötigt.
///
/// Alle Aufrufe kommen aus dem einen Event-Thread der Session.
pub trait MapSurface {
    /// Initialisiert Karte und Ansicht. Fehler sind fatal für die Session.
    fn initialize(&mut self, view: &MapView, basemap: Basemap) -> Result<(), SessionError>;

    /// Übernimmt ID-Feld und Pick-Radius (Pixel) vor dem Laden der Layer.
    ///
    /// Das ID-Feld wird Zeilen ohne eigene ID zugewiesen; der Pick-Radius
    /// bestimmt die Trefferfläche von Punkt-Features.
    fn configure_picking(&mut self, id_field: &str, pick_radius_px: f64);

    /// Lädt einen Layer aus seiner Quelle und liefert dessen Ausdehnung.
    fn load_layer(&mut self, spec: &LayerSpec) -> Result<Option<Rect<f64>>, LayerLoadError>;

    /// Setzt die Sichtbarkeit eines geladenen Layers.
    fn set_layer_visibility(&mut self, layer_name: &str, visible: bool);

    /// Setzt den deklarativen Filter eines geladenen Layers.
    fn set_layer_filter(&mut self, layer_name: &str, filter: &FilterExpression);

    /// Alle gerenderten Features unter dem Screen-Punkt, oberster zuerst.
    fn hit_test(
        &mut self,
        screen_pos: DVec2,
        view: &MapView,
    ) -> Result<Vec<HitCandidate>, QueryError>;

    /// Reicht eine Abfrage ein; das Ergebnis kommt später als `QueryCompletion`.
    fn submit_intersects_query(&mut self, query: IntersectsQuery) -> Result<(), QueryError>;

    /// Schwenkt/zoomt auf eine Ausdehnung.
    fn go_to_extent(&mut self, extent: Rect<f64>);

    /// Öffnet ein Popup (ersetzt ein offenes).
    fn open_popup(&mut self, content: &PopupContent);

    /// Schließt ein offenes Popup.
    fn close_popup(&mut self);

    /// Tauscht die Basiskarte.
    fn set_basemap(&mut self, basemap: Basemap);

    /// Gibt alle Ressourcen der Karte frei.
    fn destroy(&mut self);
}
