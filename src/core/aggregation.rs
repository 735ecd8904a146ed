//! Kategorie-Aggregation von Features (Balkendiagramm-Daten).

use indexmap::IndexMap;
use serde::Serialize;

use super::Feature;

/// Kategorie für Features ohne bzw. mit leerem Kategoriewert.
pub const UNDEFINED_CATEGORY: &str = "undefined";

/// Anzahl Features einer Kategorie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Kategoriewert
    pub category: String,
    /// Anzahl Features mit diesem Wert
    pub count: usize,
}

/// Geordneter Kategorie-Datensatz (Reihenfolge = erstes Auftreten).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryDataset {
    entries: Vec<CategoryCount>,
}

impl CategoryDataset {
    /// Read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[CategoryCount] {
        &self.entries
    }

    /// Summe aller Zählungen (= Größe der aggregierten Menge).
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Anzahl Kategorien.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true`, wenn keine Kategorie vorhanden ist.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zählung einer Kategorie (0 falls nicht vorhanden).
    pub fn count_of(&self, category: &str) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map_or(0, |entry| entry.count)
    }

    /// Kategorien in Reihenfolge (Diagramm-Labels).
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.category.clone()).collect()
    }

    /// Zählungen in Label-Reihenfolge (Diagramm-Werte).
    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.count).collect()
    }
}

/// Gruppiert Features nach dem Wert von `category_field` und zählt je Gruppe.
///
/// Jedes Feature landet in genau einer Gruppe; fehlende oder leere Werte
/// zählen unter [`UNDEFINED_CATEGORY`].
pub fn aggregate<'a, I>(features: I, category_field: &str) -> CategoryDataset
where
    I: IntoIterator<Item = &'a Feature>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for feature in features {
        let category = feature
            .attribute(category_field)
            .filter(|value| !value.is_empty())
            .map_or_else(|| UNDEFINED_CATEGORY.to_string(), ToString::to_string);
        *counts.entry(category).or_insert(0) += 1;
    }

    CategoryDataset {
        entries: counts
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AttributeValue;
    use geo::Point;

    fn station(kind: Option<&str>) -> Feature {
        let feature = Feature::new("stations", Point::new(0.0, 0.0));
        match kind {
            Some(kind) => feature.with_attribute("type", kind),
            None => feature,
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let features = vec![
            station(Some("bus")),
            station(Some("train")),
            station(Some("bus")),
            station(Some("tram")),
        ];

        let dataset = aggregate(&features, "type");

        assert_eq!(dataset.labels(), vec!["bus", "train", "tram"]);
        assert_eq!(dataset.counts(), vec![2, 1, 1]);
    }

    #[test]
    fn missing_and_empty_values_count_as_undefined() {
        let mut blank = station(None);
        blank
            .attributes
            .insert("type".to_string(), AttributeValue::from("  "));
        let features = vec![station(None), blank, station(Some("bus"))];

        let dataset = aggregate(&features, "type");

        assert_eq!(dataset.count_of(UNDEFINED_CATEGORY), 2);
        assert_eq!(dataset.count_of("bus"), 1);
        assert_eq!(dataset.total(), features.len());
    }

    #[test]
    fn total_is_conserved_for_varied_inputs() {
        let kinds = [Some("bus"), None, Some("train"), Some(""), Some("bus")];
        for len in 0..=kinds.len() * 3 {
            let features: Vec<Feature> =
                (0..len).map(|i| station(kinds[i % kinds.len()])).collect();
            assert_eq!(aggregate(&features, "type").total(), len);
        }
    }

    #[test]
    fn empty_input_yields_empty_dataset() {
        let dataset = aggregate(std::iter::empty::<&Feature>(), "type");
        assert!(dataset.is_empty());
        assert_eq!(dataset.total(), 0);
    }
}
