//! Schnittstelle zum Diagramm-Kollaborateur und Chart-Payload.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

use crate::core::CategoryDataset;

/// Lebenszyklus-Handle eines erzeugten Diagramms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

/// Ein Datensatz (Balkenserie) im Diagramm.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Serien-Beschriftung
    pub label: String,
    /// Werte in Label-Reihenfolge
    pub data: Vec<usize>,
    /// Balkenfarbe
    pub background_color: String,
}

/// Diagrammdaten: Kategorien und Serien.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    /// Kategorien (x-Achse)
    pub labels: Vec<String>,
    /// Serien
    pub datasets: Vec<ChartSeries>,
}

impl ChartData {
    /// Baut die Daten aus einem Kategorie-Datensatz (eine Serie).
    pub fn from_dataset(dataset: &CategoryDataset, label: &str, color: &str) -> Self {
        Self {
            labels: dataset.labels(),
            datasets: vec![ChartSeries {
                label: label.to_string(),
                data: dataset.counts(),
                background_color: color.to_string(),
            }],
        }
    }

    /// Summe aller Werte der ersten Serie.
    pub fn total(&self) -> usize {
        self.datasets
            .first()
            .map_or(0, |series| series.data.iter().sum())
    }
}

/// Vollständige Diagramm-Beschreibung beim Erzeugen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Diagrammtyp, immer `bar`
    #[serde(rename = "type")]
    pub kind: String,
    /// Diagramm-Titel
    pub title: String,
    /// Daten
    pub data: ChartData,
}

impl ChartSpec {
    /// Balkendiagramm mit Titel.
    pub fn bar(title: &str, data: ChartData) -> Self {
        Self {
            kind: "bar".to_string(),
            title: title.to_string(),
            data,
        }
    }
}

/// Fehler des Diagramm-Kollaborateurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Zeichenfläche nicht verfügbar
    #[error("Diagramm konnte nicht erzeugt werden: {0}")]
    Create(String),
    /// Handle gehört zu keinem bestehenden Diagramm
    #[error("Unbekanntes Diagramm-Handle {0:?}")]
    UnknownHandle(ChartHandle),
}

/// Diagramm-Kollaborateur: erzeugen, in-place aktualisieren, zerstören.
pub trait ChartRenderer {
    /// Erzeugt ein neues Diagramm.
    fn create(&mut self, spec: &ChartSpec) -> Result<ChartHandle, ChartError>;

    /// Ersetzt die Daten eines bestehenden Diagramms.
    fn update(&mut self, handle: ChartHandle, data: &ChartData) -> Result<(), ChartError>;

    /// Gibt ein Diagramm frei.
    fn destroy(&mut self, handle: ChartHandle);
}

/// Ein protokollierter Aufruf an den [`RecordingChart`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChartCall {
    /// `create` mit der übergebenen Beschreibung
    Create(ChartSpec),
    /// `update` mit den neuen Daten
    Update(ChartHandle, ChartData),
    /// `destroy`
    Destroy(ChartHandle),
}

#[derive(Debug, Default)]
struct ChartLog {
    calls: Vec<ChartCall>,
    live: Option<(ChartHandle, ChartSpec)>,
    next_handle: u64,
    failing_creates: usize,
}

/// Headless-Diagramm, das alle Aufrufe protokolliert.
///
/// Klone teilen sich das Protokoll, damit der Host nach der Übergabe an die
/// Session weiter inspizieren kann.
#[derive(Debug, Clone, Default)]
pub struct RecordingChart {
    log: Rc<RefCell<ChartLog>>,
}

impl RecordingChart {
    /// Erstellt ein leeres Protokoll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lässt die nächsten `count` Erzeugungen fehlschlagen.
    pub fn fail_next_creates(&self, count: usize) {
        self.log.borrow_mut().failing_creates = count;
    }

    /// Alle Aufrufe in Reihenfolge.
    pub fn calls(&self) -> Vec<ChartCall> {
        self.log.borrow().calls.clone()
    }

    /// Anzahl erfolgreicher `create`-Aufrufe.
    pub fn create_count(&self) -> usize {
        self.log
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call, ChartCall::Create(_)))
            .count()
    }

    /// Beschreibung des lebenden Diagramms mit den aktuellen Daten.
    pub fn current(&self) -> Option<ChartSpec> {
        self.log.borrow().live.as_ref().map(|(_, spec)| spec.clone())
    }

    /// `true`, solange ein Diagramm existiert.
    pub fn is_live(&self) -> bool {
        self.log.borrow().live.is_some()
    }
}

impl ChartRenderer for RecordingChart {
    fn create(&mut self, spec: &ChartSpec) -> Result<ChartHandle, ChartError> {
        let mut log = self.log.borrow_mut();
        if log.failing_creates > 0 {
            log.failing_creates -= 1;
            return Err(ChartError::Create("Zeichenfläche fehlt".to_string()));
        }

        log.next_handle += 1;
        let handle = ChartHandle(log.next_handle);
        log.calls.push(ChartCall::Create(spec.clone()));
        log.live = Some((handle, spec.clone()));
        Ok(handle)
    }

    fn update(&mut self, handle: ChartHandle, data: &ChartData) -> Result<(), ChartError> {
        let mut log = self.log.borrow_mut();
        match log.live.as_mut() {
            Some((live, spec)) if *live == handle => {
                spec.data = data.clone();
            }
            _ => return Err(ChartError::UnknownHandle(handle)),
        }
        log.calls.push(ChartCall::Update(handle, data.clone()));
        Ok(())
    }

    fn destroy(&mut self, handle: ChartHandle) {
        let mut log = self.log.borrow_mut();
        if log.live.as_ref().is_some_and(|(live, _)| *live == handle) {
            log.live = None;
        }
        log.calls.push(ChartCall::Destroy(handle));
    }
}
