//! Station Map Explorer (Replay).
//!
//! Lädt Session-Optionen und ein Karten-Fixture, spielt ein Skript von
//! Benutzeraktionen ab und gibt Filter, Popup und Diagramm als JSON aus.
//!
//! Aufruf: `station-map-explorer <fixture.json> <script.json>`

use anyhow::Context;
use geo::Point;
use serde::Deserialize;
use station_map_explorer::{
    AppIntent, Basemap, FilterParameters, InMemorySurface, MapSession, RecordingChart,
    SessionOptions, SurfaceFixture, VisibilityState,
};

/// Ein Schritt des Replay-Skripts.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ScriptStep {
    /// Klick auf eine Kartenposition (Länge/Breite)
    Click { lon: f64, lat: f64 },
    /// Klick auf einen Screen-Pixel
    ClickScreen { x: f64, y: f64 },
    /// Formular absenden
    Filter {
        #[serde(default)]
        region: String,
        #[serde(default)]
        radius: String,
        #[serde(default)]
        center: String,
    },
    /// Sichtbarkeitszustand setzen
    Visibility { layers: VisibilityState },
    /// Einzelnen Layer umschalten
    Toggle { layer: String },
    /// Basiskarte wechseln
    Basemap { basemap: Basemap },
    /// Ansicht auf alle Layer einpassen
    ZoomToLayers,
    /// Popup schließen
    ClosePopup,
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Station Map Explorer v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let mut args = std::env::args().skip(1);
    let (Some(fixture_path), Some(script_path)) = (args.next(), args.next()) else {
        anyhow::bail!("Aufruf: station-map-explorer <fixture.json> <script.json>");
    };

    // Optionen aus TOML laden (oder Standardwerte)
    let options = SessionOptions::load_from_file(&SessionOptions::config_path());

    let fixture: SurfaceFixture = serde_json::from_str(
        &std::fs::read_to_string(&fixture_path)
            .with_context(|| format!("Fixture nicht lesbar: {fixture_path}"))?,
    )
    .with_context(|| format!("Fixture ungültig: {fixture_path}"))?;
    let script: Vec<ScriptStep> = serde_json::from_str(
        &std::fs::read_to_string(&script_path)
            .with_context(|| format!("Skript nicht lesbar: {script_path}"))?,
    )
    .with_context(|| format!("Skript ungültig: {script_path}"))?;

    let surface = InMemorySurface::from_fixture(fixture);

    let chart = RecordingChart::new();
    let mut session = MapSession::initialize(surface, options, Box::new(chart.clone()))?;

    for step in script {
        log::debug!("Skript-Schritt: {:?}", step);
        let intent = to_intent(&session, step);
        session.dispatch(intent);

        // Abfragen in Einreichungsreihenfolge zurückliefern
        let completions = session.surface_mut().resolve_all();
        for completion in completions {
            session.dispatch(completion.into());
        }
    }

    let state = session.state();
    let filters: serde_json::Map<String, serde_json::Value> = state
        .layers
        .iter()
        .map(|layer| (layer.name.clone(), layer.filter_expression().into()))
        .collect();
    let report = serde_json::json!({
        "filters": filters,
        "popup": state.popup.as_ref().map(|popup| popup.view.lines()),
        "summary": state.filter_summary(),
        "chart": chart.current(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    session.shutdown();
    Ok(())
}

fn to_intent(session: &MapSession<InMemorySurface>, step: ScriptStep) -> AppIntent {
    match step {
        ScriptStep::Click { lon, lat } => AppIntent::MapClicked {
            screen_pos: session
                .state()
                .view
                .map_view
                .map_to_screen(Point::new(lon, lat)),
        },
        ScriptStep::ClickScreen { x, y } => AppIntent::MapClicked {
            screen_pos: glam::DVec2::new(x, y),
        },
        ScriptStep::Filter {
            region,
            radius,
            center,
        } => AppIntent::FilterSubmitted {
            params: FilterParameters::from_form(&region, &radius, &center),
        },
        ScriptStep::Visibility { layers } => AppIntent::VisibilityChanged { visibility: layers },
        ScriptStep::Toggle { layer } => AppIntent::LayerToggled { layer },
        ScriptStep::Basemap { basemap } => AppIntent::BasemapRequested { basemap },
        ScriptStep::ZoomToLayers => AppIntent::ZoomToLayersRequested,
        ScriptStep::ClosePopup => AppIntent::PopupCloseRequested,
    }
}
