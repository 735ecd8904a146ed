//! Gemeinsame Test-Helfer: Beispielkarte mit 2 Regionen, 2 Provinzen und
//! 10 Stationen (OBJECTID 1..10).
#![allow(dead_code)]

use geo::Point;
use station_map_explorer::{
    AppIntent, InMemorySurface, MapSession, QueryTicket, RecordingChart, SessionOptions,
    SurfaceFixture,
};

pub const FIXTURE_JSON: &str = include_str!("../fixtures/morocco_sample.json");

/// Innerhalb der Provinz Casablanca (enthält Stationen 1, 2, 3), abseits jeder Station.
pub const PROVINCE_CASABLANCA: (f64, f64) = (-7.75, 33.4);
/// Innerhalb der Provinz Fès (enthält Stationen 6, 8).
pub const PROVINCE_FES: (f64, f64) = (-4.7, 33.7);
/// Nur in der Region Casablanca-Settat (enthält Stationen 1–5).
pub const REGION_ONLY: (f64, f64) = (-8.7, 32.2);
/// Station 1 „Casa Port“.
pub const STATION_CASA_PORT: (f64, f64) = (-7.5, 33.5);
/// Leere Fläche ohne Feature.
pub const EMPTY_SPOT: (f64, f64) = (-3.0, 32.5);

pub type TestSession = MapSession<InMemorySurface>;

pub fn fixture_surface() -> InMemorySurface {
    let fixture: SurfaceFixture =
        serde_json::from_str(FIXTURE_JSON).expect("Fixture sollte gültig sein");
    InMemorySurface::from_fixture(fixture)
}

pub fn session_with(surface: InMemorySurface, options: SessionOptions) -> (TestSession, RecordingChart) {
    let chart = RecordingChart::new();
    let session = MapSession::initialize(surface, options, Box::new(chart.clone()))
        .expect("Session sollte initialisieren");
    (session, chart)
}

pub fn session() -> (TestSession, RecordingChart) {
    session_with(fixture_surface(), SessionOptions::default())
}

pub fn click_at(session: &mut TestSession, (lon, lat): (f64, f64)) {
    let screen_pos = session
        .state()
        .view
        .map_view
        .map_to_screen(Point::new(lon, lat));
    session
        .handle_intent(AppIntent::MapClicked { screen_pos })
        .expect("Klick sollte verarbeitet werden");
}

/// Liefert das Ergebnis einer ausstehenden Abfrage an die Session zurück.
pub fn deliver(session: &mut TestSession, ticket: QueryTicket) {
    let completion = session
        .surface_mut()
        .resolve_ticket(ticket)
        .expect("Abfrage sollte ausstehen");
    session
        .handle_intent(completion.into())
        .expect("Abschluss sollte verarbeitet werden");
}

/// Liefert alle ausstehenden Abfragen in Einreichungsreihenfolge zurück.
pub fn deliver_all(session: &mut TestSession) {
    for completion in session.surface_mut().resolve_all() {
        session
            .handle_intent(completion.into())
            .expect("Abschluss sollte verarbeitet werden");
    }
}

pub fn station_filter(session: &TestSession) -> String {
    session
        .layers()
        .filter_expression("stations")
        .expect("Stations-Layer sollte geladen sein")
}
