//! Räumliche Abfragen mit Klick-Sequenznummern (letzter Klick gewinnt).
//!
//! Eine laufende Abfrage kann nicht abgebrochen werden. Jeder Klick zieht
//! eine neue Sequenznummer; Ergebnisse älterer Klicks werden beim Eintreffen
//! verworfen.

use crate::core::{FeatureGeometry, QueryError};
use crate::surface::{IntersectsQuery, MapSurface, QueryTicket};

/// Verwaltet die Klick-Sequenz und die eine relevante laufende Abfrage.
#[derive(Debug, Clone, Default)]
pub struct SpatialQueryService {
    /// Sequenznummer des zuletzt beobachteten Klicks
    latest: u64,
    /// Ticket der Abfrage, deren Ergebnis noch angewendet werden darf
    in_flight: Option<QueryTicket>,
    /// Anzahl verworfener (veralteter) Ergebnisse
    discarded: usize,
}

impl SpatialQueryService {
    /// Erstellt den Service ohne beobachtete Klicks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert einen neuen Klick. Jede laufende Abfrage wird damit veraltet.
    pub fn begin_click(&mut self) -> QueryTicket {
        self.latest += 1;
        self.in_flight = None;
        QueryTicket(self.latest)
    }

    /// Reicht eine „intersects“-Abfrage für den Klick `ticket` ein.
    pub fn submit(
        &mut self,
        surface: &mut dyn MapSurface,
        ticket: QueryTicket,
        layer_name: &str,
        geometry: FeatureGeometry,
    ) -> Result<(), QueryError> {
        surface.submit_intersects_query(IntersectsQuery {
            ticket,
            layer_name: layer_name.to_string(),
            geometry,
        })?;
        if ticket.0 == self.latest {
            self.in_flight = Some(ticket);
        }
        Ok(())
    }

    /// Prüft ein eintreffendes Ergebnis; `true` genau für die aktuelle Abfrage.
    ///
    /// Ein akzeptiertes Ticket gilt danach als erledigt.
    pub fn accept(&mut self, ticket: QueryTicket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            return true;
        }
        self.discarded += 1;
        log::debug!(
            "Veraltetes Abfrageergebnis {} verworfen (aktueller Klick #{})",
            ticket,
            self.latest
        );
        false
    }

    /// Ticket der laufenden, noch relevanten Abfrage.
    pub fn in_flight(&self) -> Option<QueryTicket> {
        self.in_flight
    }

    /// Sequenznummer des zuletzt beobachteten Klicks.
    pub fn latest_click(&self) -> u64 {
        self.latest
    }

    /// Anzahl bisher verworfener Ergebnisse.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}
