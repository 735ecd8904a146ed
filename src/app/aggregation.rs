//! Aggregations-Engine: zählt Features je Kategorie und veröffentlicht das
//! Ergebnis an den Diagramm-Kollaborateur.

use crate::chart::{ChartData, ChartHandle, ChartRenderer, ChartSpec};
use crate::core::{aggregate, CategoryDataset, Feature};
use crate::shared::SessionOptions;

/// Hält den aktuellen Datensatz und das Diagramm-Handle der Session.
pub struct AggregationEngine {
    renderer: Box<dyn ChartRenderer>,
    handle: Option<ChartHandle>,
    dataset: CategoryDataset,
    category_field: String,
    label: String,
    title: String,
    color: String,
}

impl AggregationEngine {
    /// Erstellt die Engine; das Diagramm entsteht erst bei der ersten Veröffentlichung.
    pub fn new(renderer: Box<dyn ChartRenderer>, options: &SessionOptions) -> Self {
        Self {
            renderer,
            handle: None,
            dataset: CategoryDataset::default(),
            category_field: options.category_field.clone(),
            label: options.chart_label.clone(),
            title: options.chart_title.clone(),
            color: options.chart_color.clone(),
        }
    }

    /// Ersetzt den Datensatz vollständig durch die Zählung von `features`
    /// und veröffentlicht ihn.
    pub fn publish(&mut self, features: &[Feature]) -> &CategoryDataset {
        self.dataset = aggregate(features, &self.category_field);
        log::info!(
            "Aggregation: {} Features in {} Kategorien",
            self.dataset.total(),
            self.dataset.len()
        );

        let data = self.chart_data();
        match self.handle {
            Some(handle) => {
                if let Err(e) = self.renderer.update(handle, &data) {
                    log::warn!("Diagramm-Update fehlgeschlagen, erzeuge neu: {}", e);
                    self.handle = None;
                    self.create(data);
                }
            }
            None => self.create(data),
        }

        &self.dataset
    }

    fn create(&mut self, data: ChartData) {
        match self.renderer.create(&ChartSpec::bar(&self.title, data)) {
            Ok(handle) => self.handle = Some(handle),
            // Nächste Veröffentlichung versucht es erneut
            Err(e) => log::error!("{}", e),
        }
    }

    /// Diagrammdaten des aktuellen Datensatzes.
    pub fn chart_data(&self) -> ChartData {
        ChartData::from_dataset(&self.dataset, &self.label, &self.color)
    }

    /// Zuletzt veröffentlichter Datensatz.
    pub fn dataset(&self) -> &CategoryDataset {
        &self.dataset
    }

    /// Beschriftung, die mit dem Datensatz veröffentlicht wird.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Handle des lebenden Diagramms.
    pub fn handle(&self) -> Option<ChartHandle> {
        self.handle
    }

    /// Zerstört das Diagramm (Session-Ende).
    pub fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.renderer.destroy(handle);
        }
    }
}

impl std::fmt::Debug for AggregationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationEngine")
            .field("handle", &self.handle)
            .field("dataset", &self.dataset)
            .field("category_field", &self.category_field)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartCall, RecordingChart};
    use geo::Point;

    fn station(kind: Option<&str>) -> Feature {
        let feature = Feature::new("stations", Point::new(0.0, 0.0));
        match kind {
            Some(kind) => feature.with_attribute("type", kind),
            None => feature,
        }
    }

    #[test]
    fn first_publish_creates_then_updates_in_place() {
        let chart = RecordingChart::new();
        let mut engine = AggregationEngine::new(Box::new(chart.clone()), &SessionOptions::default());

        engine.publish(&[station(Some("bus")), station(Some("train"))]);
        engine.publish(&[station(Some("tram"))]);

        let calls = chart.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], ChartCall::Create(_)));
        assert!(matches!(calls[1], ChartCall::Update(_, _)));
        assert_eq!(engine.dataset().labels(), vec!["tram"]);
    }

    #[test]
    fn publish_replaces_dataset_and_conserves_count() {
        let chart = RecordingChart::new();
        let mut engine = AggregationEngine::new(Box::new(chart.clone()), &SessionOptions::default());

        let dataset = engine.publish(&[station(Some("bus")), station(None), station(Some(""))]);
        assert_eq!(dataset.total(), 3);
        assert_eq!(dataset.count_of("undefined"), 2);

        let dataset = engine.publish(&[]);
        assert!(dataset.is_empty());
        assert_eq!(chart.current().map(|spec| spec.data.total()), Some(0));
    }

    #[test]
    fn failed_create_is_retried_on_next_publish() {
        let chart = RecordingChart::new();
        chart.fail_next_creates(1);
        let mut engine = AggregationEngine::new(Box::new(chart.clone()), &SessionOptions::default());

        engine.publish(&[station(Some("bus"))]);
        assert_eq!(engine.handle(), None);

        engine.publish(&[station(Some("bus"))]);
        assert!(engine.handle().is_some());
        assert_eq!(chart.create_count(), 1);
    }

    #[test]
    fn teardown_destroys_live_chart() {
        let chart = RecordingChart::new();
        let mut engine = AggregationEngine::new(Box::new(chart.clone()), &SessionOptions::default());
        engine.publish(&[station(Some("bus"))]);

        engine.teardown();
        engine.teardown();

        assert!(!chart.is_live());
        assert_eq!(engine.handle(), None);
    }
}
