mod common;

use common::*;
use station_map_explorer::core::GENERIC_POPUP_TITLE;
use station_map_explorer::{
    AppCommand, AppIntent, FilterExpression, InteractionState, QueryError, QueryTicket,
    SessionOptions,
};

#[test]
fn test_province_click_filters_exactly_contained_stations() {
    let (mut session, chart) = session();

    click_at(&mut session, PROVINCE_CASABLANCA);
    assert!(matches!(
        session.state().interaction,
        InteractionState::AwaitingQuery { .. }
    ));
    deliver_all(&mut session);

    // Station 3 liegt exakt auf dem Provinzrand
    assert_eq!(station_filter(&session), "OBJECTID IN (1,2,3)");
    assert_eq!(session.dataset().total(), 3);
    assert_eq!(session.dataset().count_of("bus"), 2);
    assert_eq!(session.dataset().count_of("train"), 1);
    assert_eq!(session.state().interaction, InteractionState::PopupOpen);

    let rendered = session.surface().rendered_features("stations");
    assert_eq!(rendered.len(), 3);
    assert_eq!(chart.current().map(|spec| spec.data.total()), Some(3));
}

#[test]
fn test_polygon_popup_opens_before_query_resolves() {
    let (mut session, _chart) = session();

    click_at(&mut session, PROVINCE_CASABLANCA);

    let popup = session.surface().popup().expect("Popup sollte offen sein");
    assert_eq!(popup.view.title, "Province: Casablanca");
    assert_eq!(session.surface().pending_tickets().len(), 1);
    assert_eq!(station_filter(&session), "1=1");
}

#[test]
fn test_region_click_aggregates_all_region_stations() {
    let (mut session, _chart) = session();

    click_at(&mut session, REGION_ONLY);
    deliver_all(&mut session);

    assert_eq!(station_filter(&session), "OBJECTID IN (1,2,3,4,5)");
    assert_eq!(session.dataset().total(), 5);
    assert_eq!(
        session.state().popup.as_ref().map(|p| p.view.title.as_str()),
        Some("Région: Casablanca-Settat")
    );
}

#[test]
fn test_station_click_opens_popup_without_query() {
    let (mut session, chart) = session();

    click_at(&mut session, STATION_CASA_PORT);

    assert_eq!(session.state().interaction, InteractionState::PopupOpen);
    assert!(session.surface().pending_tickets().is_empty());
    let popup = session.state().popup.as_ref().expect("Popup sollte offen sein");
    assert_eq!(popup.view.title, "Station de transport");
    assert_eq!(
        popup.view.lines(),
        vec!["Nom: Casa Port", "Type: train", "Capacité: 500"]
    );
    assert!(chart.calls().is_empty());
}

#[test]
fn test_layer_without_template_uses_generic_popup() {
    let mut options = SessionOptions::default();
    options.layers[2].popup = None;
    let (mut session, _chart) = session_with(fixture_surface(), options);

    click_at(&mut session, STATION_CASA_PORT);

    let popup = session.state().popup.as_ref().expect("Popup sollte offen sein");
    assert_eq!(popup.view.title, GENERIC_POPUP_TITLE);
    assert!(popup.view.lines().contains(&"name: Casa Port".to_string()));
}

#[test]
fn test_miss_after_hit_closes_popup_and_keeps_aggregation() {
    let (mut session, _chart) = session();
    click_at(&mut session, PROVINCE_CASABLANCA);
    deliver_all(&mut session);
    let dataset_before = session.dataset().clone();
    let filter_before = station_filter(&session);

    click_at(&mut session, EMPTY_SPOT);

    assert_eq!(session.state().interaction, InteractionState::Idle);
    assert!(session.state().popup.is_none());
    assert!(session.surface().popup().is_none());
    assert_eq!(session.dataset(), &dataset_before);
    assert_eq!(station_filter(&session), filter_before);
}

#[test]
fn test_miss_from_idle_and_point_popup_always_ends_idle() {
    let (mut session, _chart) = session();

    click_at(&mut session, EMPTY_SPOT);
    assert_eq!(session.state().interaction, InteractionState::Idle);

    click_at(&mut session, STATION_CASA_PORT);
    click_at(&mut session, EMPTY_SPOT);
    assert_eq!(session.state().interaction, InteractionState::Idle);
    assert!(session.surface().popup().is_none());
}

#[test]
fn test_miss_while_awaiting_query_discards_late_result() {
    let (mut session, chart) = session();
    click_at(&mut session, PROVINCE_CASABLANCA);

    click_at(&mut session, EMPTY_SPOT);
    deliver_all(&mut session);

    assert_eq!(session.state().interaction, InteractionState::Idle);
    assert_eq!(station_filter(&session), "1=1");
    assert!(chart.calls().is_empty());
    assert_eq!(session.state().queries.discarded(), 1);
}

#[test]
fn test_stale_query_resolving_last_is_discarded() {
    let (mut session, _chart) = session();

    click_at(&mut session, PROVINCE_CASABLANCA);
    click_at(&mut session, PROVINCE_FES);
    assert_eq!(
        session.surface().pending_tickets(),
        vec![QueryTicket(1), QueryTicket(2)]
    );

    deliver(&mut session, QueryTicket(2));
    deliver(&mut session, QueryTicket(1));

    assert_eq!(station_filter(&session), "OBJECTID IN (6,8)");
    assert_eq!(session.dataset().total(), 2);
    assert_eq!(session.state().queries.discarded(), 1);
    assert_eq!(
        session.state().popup.as_ref().map(|p| p.view.title.as_str()),
        Some("Province: Fès")
    );
}

#[test]
fn test_stale_query_resolving_first_is_discarded() {
    let (mut session, chart) = session();

    click_at(&mut session, PROVINCE_CASABLANCA);
    click_at(&mut session, PROVINCE_FES);
    deliver(&mut session, QueryTicket(1));

    assert!(matches!(
        session.state().interaction,
        InteractionState::AwaitingQuery {
            ticket: QueryTicket(2)
        }
    ));
    assert_eq!(station_filter(&session), "1=1");
    assert!(chart.calls().is_empty());

    deliver(&mut session, QueryTicket(2));
    assert_eq!(station_filter(&session), "OBJECTID IN (6,8)");
}

#[test]
fn test_failed_query_is_treated_as_empty_result() {
    let (mut session, _chart) = session();
    session.surface_mut().fail_queries("Dienst nicht erreichbar");

    click_at(&mut session, PROVINCE_CASABLANCA);
    deliver_all(&mut session);

    assert_eq!(station_filter(&session), "1=0");
    assert!(session.dataset().is_empty());
    assert_eq!(session.state().query_failures, 1);
    assert_eq!(session.state().interaction, InteractionState::PopupOpen);
}

#[test]
fn test_failed_hit_test_is_treated_as_miss() {
    let (mut session, _chart) = session();
    click_at(&mut session, STATION_CASA_PORT);
    session
        .surface_mut()
        .fail_next_hit_test(QueryError::ViewNotReady);

    click_at(&mut session, STATION_CASA_PORT);

    assert_eq!(session.state().interaction, InteractionState::Idle);
    assert!(session.surface().popup().is_none());
    assert_eq!(session.state().query_failures, 1);
}

#[test]
fn test_polygon_without_drill_down_only_opens_popup() {
    let mut options = SessionOptions::default();
    options.layers[1].drill_down = false;
    let (mut session, _chart) = session_with(fixture_surface(), options);

    click_at(&mut session, PROVINCE_CASABLANCA);

    assert_eq!(session.state().interaction, InteractionState::PopupOpen);
    assert!(session.surface().pending_tickets().is_empty());
    assert_eq!(
        session.state().popup.as_ref().map(|p| p.view.title.as_str()),
        Some("Province: Casablanca")
    );
}

#[test]
fn test_hidden_province_layer_lets_click_reach_region() {
    let (mut session, _chart) = session();
    session
        .handle_intent(AppIntent::LayerToggled {
            layer: "provinces".to_string(),
        })
        .expect("Umschalten sollte funktionieren");

    click_at(&mut session, PROVINCE_CASABLANCA);
    deliver_all(&mut session);

    assert_eq!(station_filter(&session), "OBJECTID IN (1,2,3,4,5)");
}

#[test]
fn test_close_popup_while_awaiting_keeps_query_valid() {
    let (mut session, _chart) = session();
    click_at(&mut session, PROVINCE_FES);

    session
        .handle_intent(AppIntent::PopupCloseRequested)
        .expect("Schließen sollte funktionieren");
    assert!(session.surface().popup().is_none());

    deliver_all(&mut session);
    assert_eq!(station_filter(&session), "OBJECTID IN (6,8)");
    assert_eq!(session.state().interaction, InteractionState::Idle);
}

#[test]
fn test_query_completion_is_logged_as_command() {
    let (mut session, _chart) = session();
    click_at(&mut session, PROVINCE_FES);
    deliver_all(&mut session);

    let last = session
        .state()
        .command_log
        .entries()
        .iter()
        .rev()
        .find(|command| matches!(command, AppCommand::CompleteSpatialQuery { .. }))
        .expect("Es sollte ein Abschluss geloggt sein");

    match last {
        AppCommand::CompleteSpatialQuery { ticket, outcome } => {
            assert_eq!(*ticket, QueryTicket(1));
            assert_eq!(outcome.as_ref().map(Vec::len), Ok(2));
        }
        other => panic!("Unerwarteter Command: {other:?}"),
    }
}

#[test]
fn test_id_selection_filter_parses_back_from_declarative_form() {
    let (mut session, _chart) = session();
    click_at(&mut session, PROVINCE_CASABLANCA);
    deliver_all(&mut session);

    let parsed = FilterExpression::parse(&station_filter(&session)).expect("parsebar");

    assert_eq!(parsed, FilterExpression::id_in("OBJECTID", [1, 2, 3]));
}
