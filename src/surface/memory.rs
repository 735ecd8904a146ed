//! In-Memory-Karte: Features im Speicher, Filter- und Hit-Test-Auswertung,
//! ausstehende Abfragen bis zur expliziten Auflösung.

use std::collections::{HashMap, VecDeque};

use geo::{LineString, MultiPolygon, Point, Polygon, Rect};
use glam::DVec2;
use indexmap::IndexMap;
use serde::Deserialize;

use super::{HitCandidate, IntersectsQuery, MapSurface, PopupContent, QueryCompletion, QueryTicket};
use crate::core::{
    union_extent, AttributeValue, Attributes, Basemap, Feature, FeatureGeometry,
    FilterExpression, LayerKind, LayerLoadError, LayerSpec, MapView, PointIndex, QueryError,
    SessionError,
};
use crate::shared::{FEATURE_ID_FIELD, PICK_RADIUS_PX};

/// Ein Polygon-Datensatz im Fixture-Format: Polygone → Ringe → `[x, y]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolygonRecord {
    /// Polygone; je Polygon zuerst der Außenring, danach Löcher
    pub polygons: Vec<Vec<Vec<[f64; 2]>>>,
    /// Attribut-Tabelle
    #[serde(default)]
    pub attributes: Attributes,
}

/// Eine Datenquelle im Fixture-Format.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum FixtureSource {
    /// Flächen-Features (entspricht einer GeoJSON-Quelle)
    Polygons {
        /// Datensätze
        features: Vec<PolygonRecord>,
    },
    /// Tabellenzeilen mit Koordinatenfeldern (entspricht einer CSV-Quelle)
    Rows {
        /// Zeilen
        rows: Vec<Attributes>,
    },
}

/// Vollständiges Fixture: Quellen nach URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurfaceFixture {
    /// Quell-URI → Daten
    #[serde(default)]
    pub sources: IndexMap<String, FixtureSource>,
}

/// Rohdaten einer registrierten Quelle.
#[derive(Debug, Clone)]
enum SourceData {
    Features(Vec<Feature>),
    Rows(Vec<Attributes>),
}

/// Geladener Layer auf der Karte.
#[derive(Debug, Clone)]
struct SurfaceLayer {
    kind: LayerKind,
    features: Vec<Feature>,
    index: PointIndex,
    visible: bool,
    filter: FilterExpression,
}

impl SurfaceLayer {
    fn rendered(&self, index: usize) -> Option<&Feature> {
        self.features
            .get(index)
            .filter(|feature| self.filter.matches(feature))
    }
}

/// Referenz-Implementierung von [`MapSurface`] ohne Rendering.
///
/// Abfragen bleiben ausstehend, bis der Host sie (in beliebiger Reihenfolge)
/// über `resolve_*` auflöst. Alle Aufrufe an Filter und Sichtbarkeit werden
/// protokolliert.
#[derive(Debug, Clone)]
pub struct InMemorySurface {
    sources: HashMap<String, SourceData>,
    /// Zeichenreihenfolge: unten → oben
    layers: IndexMap<String, SurfaceLayer>,
    /// Skizzen-Grafiken über allen Layern
    decorations: Vec<Feature>,
    id_field: String,
    pick_radius_px: f64,
    initialized: bool,
    destroyed: bool,
    init_failure: Option<String>,
    query_failure: Option<String>,
    hit_test_failure: Option<QueryError>,
    pending: VecDeque<IntersectsQuery>,
    basemap: Option<Basemap>,
    popup: Option<PopupContent>,
    extent: Option<Rect<f64>>,
    filter_calls: Vec<(String, FilterExpression)>,
    visibility_calls: Vec<(String, bool)>,
}

impl Default for InMemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySurface {
    /// Erstellt eine leere Karte ohne registrierte Quellen.
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
            layers: IndexMap::new(),
            decorations: Vec::new(),
            id_field: FEATURE_ID_FIELD.to_string(),
            pick_radius_px: PICK_RADIUS_PX,
            initialized: false,
            destroyed: false,
            init_failure: None,
            query_failure: None,
            hit_test_failure: None,
            pending: VecDeque::new(),
            basemap: None,
            popup: None,
            extent: None,
            filter_calls: Vec::new(),
            visibility_calls: Vec::new(),
        }
    }

    /// Baut eine Karte aus einem deserialisierten Fixture.
    pub fn from_fixture(fixture: SurfaceFixture) -> Self {
        let mut surface = Self::new();
        for (uri, source) in fixture.sources {
            match source {
                FixtureSource::Polygons { features } => {
                    let features = features
                        .into_iter()
                        .map(|record| {
                            let mut feature = Feature::new("", polygon_geometry(&record.polygons));
                            feature.attributes = record.attributes;
                            feature
                        })
                        .collect();
                    surface.register_features(&uri, features);
                }
                FixtureSource::Rows { rows } => surface.register_rows(&uri, rows),
            }
        }
        surface
    }

    /// Registriert fertige Features unter einer Quell-URI.
    pub fn register_features(&mut self, uri: &str, features: Vec<Feature>) {
        self.sources
            .insert(uri.to_string(), SourceData::Features(features));
    }

    /// Registriert Tabellenzeilen (CSV) unter einer Quell-URI.
    pub fn register_rows(&mut self, uri: &str, rows: Vec<Attributes>) {
        self.sources.insert(uri.to_string(), SourceData::Rows(rows));
    }

    /// Fügt eine Skizzen-Grafik ohne Layer-Zugehörigkeit hinzu.
    pub fn add_decoration(&mut self, feature: Feature) {
        self.decorations.push(feature);
    }

    /// Lässt die nächste Initialisierung fehlschlagen.
    pub fn fail_initialization(&mut self, reason: &str) {
        self.init_failure = Some(reason.to_string());
    }

    /// Lässt alle künftigen Abfragen mit einem Fehler abschließen.
    pub fn fail_queries(&mut self, reason: &str) {
        self.query_failure = Some(reason.to_string());
    }

    /// Lässt den nächsten Hit-Test fehlschlagen.
    pub fn fail_next_hit_test(&mut self, error: QueryError) {
        self.hit_test_failure = Some(error);
    }

    // ── Ausstehende Abfragen ────────────────────────────────────

    /// Tickets aller ausstehenden Abfragen in Einreichungsreihenfolge.
    pub fn pending_tickets(&self) -> Vec<QueryTicket> {
        self.pending.iter().map(|query| query.ticket).collect()
    }

    /// Löst die älteste ausstehende Abfrage auf.
    pub fn resolve_next(&mut self) -> Option<QueryCompletion> {
        let query = self.pending.pop_front()?;
        Some(self.evaluate(&query))
    }

    /// Löst die Abfrage mit dem angegebenen Ticket auf.
    pub fn resolve_ticket(&mut self, ticket: QueryTicket) -> Option<QueryCompletion> {
        let position = self.pending.iter().position(|q| q.ticket == ticket)?;
        let query = self.pending.remove(position)?;
        Some(self.evaluate(&query))
    }

    /// Löst alle ausstehenden Abfragen in Einreichungsreihenfolge auf.
    pub fn resolve_all(&mut self) -> Vec<QueryCompletion> {
        let queries: Vec<IntersectsQuery> = self.pending.drain(..).collect();
        queries.iter().map(|query| self.evaluate(query)).collect()
    }

    fn evaluate(&self, query: &IntersectsQuery) -> QueryCompletion {
        let outcome = match (&self.query_failure, self.layers.get(&query.layer_name)) {
            (Some(reason), _) => Err(QueryError::Failed(reason.clone())),
            (None, None) => Err(QueryError::UnknownLayer(query.layer_name.clone())),
            (None, Some(layer)) => Ok(match layer.kind {
                LayerKind::Point => layer
                    .index
                    .intersecting(&query.geometry)
                    .into_iter()
                    .filter_map(|index| layer.features.get(index).cloned())
                    .collect(),
                LayerKind::Polygon => layer
                    .features
                    .iter()
                    .filter(|feature| feature.geometry.intersects(&query.geometry))
                    .cloned()
                    .collect(),
            }),
        };

        QueryCompletion {
            ticket: query.ticket,
            outcome,
        }
    }

    // ── Inspektion ──────────────────────────────────────────────

    /// Namen der geladenen Layer in Zeichenreihenfolge.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    /// Aktiver Filter eines Layers auf der Karte.
    pub fn layer_filter(&self, layer_name: &str) -> Option<&FilterExpression> {
        self.layers.get(layer_name).map(|layer| &layer.filter)
    }

    /// Sichtbarkeit eines Layers auf der Karte.
    pub fn layer_visible(&self, layer_name: &str) -> Option<bool> {
        self.layers.get(layer_name).map(|layer| layer.visible)
    }

    /// Features eines Layers, die der aktive Filter durchlässt.
    pub fn rendered_features(&self, layer_name: &str) -> Vec<&Feature> {
        self.layers
            .get(layer_name)
            .map(|layer| {
                layer
                    .features
                    .iter()
                    .filter(|feature| layer.filter.matches(feature))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Alle `set_layer_filter`-Aufrufe in Reihenfolge.
    pub fn filter_calls(&self) -> &[(String, FilterExpression)] {
        &self.filter_calls
    }

    /// Alle `set_layer_visibility`-Aufrufe in Reihenfolge.
    pub fn visibility_calls(&self) -> &[(String, bool)] {
        &self.visibility_calls
    }

    /// Aktuell geöffnetes Popup.
    pub fn popup(&self) -> Option<&PopupContent> {
        self.popup.as_ref()
    }

    /// Aktuelle Basiskarte (nach Initialisierung).
    pub fn basemap(&self) -> Option<Basemap> {
        self.basemap
    }

    /// Zuletzt angesteuerte Ausdehnung.
    pub fn current_extent(&self) -> Option<Rect<f64>> {
        self.extent
    }

    /// `true` nach erfolgreicher Initialisierung und vor `destroy`.
    pub fn is_ready(&self) -> bool {
        self.initialized && !self.destroyed
    }

    /// `true`, nachdem `destroy` aufgerufen wurde.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn build_layer(&self, spec: &LayerSpec) -> Result<SurfaceLayer, String> {
        let data = self
            .sources
            .get(&spec.source)
            .ok_or_else(|| "Quelle nicht erreichbar".to_string())?;

        let features: Vec<Feature> = match data {
            SourceData::Features(features) => features
                .iter()
                .map(|feature| Feature {
                    layer_name: spec.name.clone(),
                    ..feature.clone()
                })
                .collect(),
            SourceData::Rows(rows) => {
                if spec.kind != LayerKind::Point {
                    return Err("Tabellenquelle für Flächen-Layer".to_string());
                }
                self.rows_to_features(spec, rows)
            }
        };

        if let Some(feature) = features.iter().find(|f| f.geometry.kind() != spec.kind) {
            return Err(format!(
                "Geometrie passt nicht zum Layer-Typ ({:?})",
                feature.geometry.kind()
            ));
        }

        Ok(SurfaceLayer {
            kind: spec.kind,
            index: PointIndex::from_features(&features),
            features,
            visible: spec.visible,
            filter: FilterExpression::All,
        })
    }

    fn rows_to_features(&self, spec: &LayerSpec, rows: &[Attributes]) -> Vec<Feature> {
        let fields = spec.coordinate_fields.clone().unwrap_or_default();
        let mut features = Vec::with_capacity(rows.len());
        // Automatische IDs beginnen oberhalb der größten expliziten ID
        let mut next_id = rows
            .iter()
            .filter_map(|row| row.get(&self.id_field).and_then(AttributeValue::as_id))
            .max()
            .map_or(1, |max| max.max(0).saturating_add(1));

        for (row_index, row) in rows.iter().enumerate() {
            let lat = row.get(&fields.latitude).and_then(AttributeValue::as_f64);
            let lon = row.get(&fields.longitude).and_then(AttributeValue::as_f64);
            let (Some(lat), Some(lon)) = (lat, lon) else {
                log::warn!(
                    "Zeile {} in '{}' ohne gültige Koordinaten übersprungen",
                    row_index + 1,
                    spec.source
                );
                continue;
            };

            let mut feature = Feature::new(spec.name.clone(), Point::new(lon, lat));
            feature.attributes = row.clone();
            if !feature.attributes.contains_key(&self.id_field) {
                feature
                    .attributes
                    .insert(self.id_field.clone(), AttributeValue::Integer(next_id));
                next_id = next_id.saturating_add(1);
            }
            features.push(feature);
        }

        features
    }
}

/// Baut eine Multi-Polygon-Geometrie aus Ringen im Fixture-Format.
fn polygon_geometry(polygons: &[Vec<Vec<[f64; 2]>>]) -> FeatureGeometry {
    let polygons = polygons
        .iter()
        .filter_map(|rings| {
            let (exterior, interiors) = rings.split_first()?;
            Some(Polygon::new(
                LineString::from(exterior.clone()),
                interiors.iter().cloned().map(LineString::from).collect(),
            ))
        })
        .collect();
    FeatureGeometry::Polygon(MultiPolygon(polygons))
}

impl MapSurface for InMemorySurface {
    fn initialize(&mut self, view: &MapView, basemap: Basemap) -> Result<(), SessionError> {
        if let Some(reason) = self.init_failure.take() {
            return Err(SessionError::ModuleLoad(reason));
        }
        self.initialized = true;
        self.destroyed = false;
        self.basemap = Some(basemap);
        self.extent = Some(view.visible_extent());
        Ok(())
    }

    fn configure_picking(&mut self, id_field: &str, pick_radius_px: f64) {
        self.id_field = id_field.to_string();
        self.pick_radius_px = pick_radius_px;
    }

    fn load_layer(&mut self, spec: &LayerSpec) -> Result<Option<Rect<f64>>, LayerLoadError> {
        let layer = self.build_layer(spec).map_err(|reason| LayerLoadError {
            layer: spec.name.clone(),
            uri: spec.source.clone(),
            reason,
        })?;

        let extent = union_extent(
            layer
                .features
                .iter()
                .filter_map(|feature| feature.geometry.bounding_rect()),
        );
        log::debug!(
            "Layer '{}' geladen: {} Features",
            spec.name,
            layer.features.len()
        );
        self.layers.insert(spec.name.clone(), layer);
        Ok(extent)
    }

    fn set_layer_visibility(&mut self, layer_name: &str, visible: bool) {
        self.visibility_calls.push((layer_name.to_string(), visible));
        if let Some(layer) = self.layers.get_mut(layer_name) {
            layer.visible = visible;
        }
    }

    fn set_layer_filter(&mut self, layer_name: &str, filter: &FilterExpression) {
        self.filter_calls
            .push((layer_name.to_string(), filter.clone()));
        if let Some(layer) = self.layers.get_mut(layer_name) {
            layer.filter = filter.clone();
        }
    }

    fn hit_test(
        &mut self,
        screen_pos: DVec2,
        view: &MapView,
    ) -> Result<Vec<HitCandidate>, QueryError> {
        if let Some(error) = self.hit_test_failure.take() {
            return Err(error);
        }
        if !self.is_ready() {
            return Err(QueryError::ViewNotReady);
        }

        let point = view.screen_to_map(screen_pos);
        let tolerance = view.pick_tolerance(self.pick_radius_px);
        let mut hits = Vec::new();

        // Dekorationen liegen über allen Layern, zuletzt gezeichnete zuerst
        for feature in self.decorations.iter().rev() {
            if covers(&feature.geometry, &point, tolerance) {
                hits.push(HitCandidate {
                    layer_name: None,
                    feature: feature.clone(),
                });
            }
        }

        for (name, layer) in self.layers.iter().rev() {
            if !layer.visible {
                continue;
            }
            let matched: Vec<usize> = match layer.kind {
                LayerKind::Point => layer
                    .index
                    .within_radius(point, tolerance)
                    .into_iter()
                    .map(|m| m.index)
                    .collect(),
                LayerKind::Polygon => (0..layer.features.len())
                    .rev()
                    .filter(|&index| layer.features[index].geometry.intersects_point(&point))
                    .collect(),
            };
            hits.extend(matched.into_iter().filter_map(|index| {
                layer.rendered(index).map(|feature| HitCandidate {
                    layer_name: Some(name.clone()),
                    feature: feature.clone(),
                })
            }));
        }

        Ok(hits)
    }

    fn submit_intersects_query(&mut self, query: IntersectsQuery) -> Result<(), QueryError> {
        if !self.is_ready() {
            return Err(QueryError::ViewNotReady);
        }
        if !self.layers.contains_key(&query.layer_name) {
            return Err(QueryError::UnknownLayer(query.layer_name));
        }
        self.pending.push_back(query);
        Ok(())
    }

    fn go_to_extent(&mut self, extent: Rect<f64>) {
        self.extent = Some(extent);
    }

    fn open_popup(&mut self, content: &PopupContent) {
        self.popup = Some(content.clone());
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn set_basemap(&mut self, basemap: Basemap) {
        self.basemap = Some(basemap);
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.layers.clear();
        self.pending.clear();
        self.popup = None;
    }
}

/// Trifft der Klickpunkt die Geometrie? Punkte mit Pick-Toleranz.
fn covers(geometry: &FeatureGeometry, point: &Point<f64>, tolerance: f64) -> bool {
    match geometry {
        FeatureGeometry::Point(own) => {
            let dx = own.x() - point.x();
            let dy = own.y() - point.y();
            (dx * dx + dy * dy).sqrt() <= tolerance
        }
        FeatureGeometry::Polygon(_) => geometry.intersects_point(point),
    }
}
