//! Registry aller geladenen Layer mit Sichtbarkeit und Filter-Slot.
//!
//! Wird bei der Initialisierung der Karte befüllt und lebt bis zum Ende der
//! Session. Layer werden nie einzeln entfernt. Jeder Layer hat genau einen
//! Filter-Slot; ein neuer Filter ersetzt den alten vollständig.

use geo::Rect;
use indexmap::IndexMap;

use crate::core::{union_extent, FilterExpression, Layer, LayerKind};

/// Ergebnis einer mutierenden Registry-Operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryChange {
    /// Zustand war bereits gesetzt, nichts weiterzugeben
    Unchanged,
    /// Zustand wurde geändert und muss an die Karte weitergegeben werden
    Updated,
    /// Kein Layer mit diesem Namen (Warnung, kein Fehler)
    UnknownLayer,
}

impl RegistryChange {
    /// `true`, wenn die Karte aktualisiert werden muss.
    pub fn is_updated(self) -> bool {
        self == RegistryChange::Updated
    }
}

/// Registry der Layer einer Session in Zeichenreihenfolge.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: IndexMap<String, Layer>,
}

impl LayerRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert einen geladenen Layer. Ein gleichnamiger Layer wird ersetzt.
    pub fn register(&mut self, layer: Layer) {
        self.layers.insert(layer.name.clone(), layer);
    }

    /// Gibt den Layer mit dem angegebenen Namen zurück (falls vorhanden).
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Gibt zurück ob ein Layer mit diesem Namen geladen ist.
    pub fn contains(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Bekannte Layer sind attributierbar: Klicks darauf liefern ein Popup.
    pub fn is_attributable(&self, name: &str) -> bool {
        self.contains(name)
    }

    /// Layer-Art eines geladenen Layers.
    pub fn kind(&self, name: &str) -> Option<LayerKind> {
        self.get(name).map(|layer| layer.kind)
    }

    /// Setzt die Sichtbarkeit. Idempotent; unbekannte Namen werden nur gewarnt.
    pub fn set_visibility(&mut self, name: &str, visible: bool) -> RegistryChange {
        let Some(layer) = self.layers.get_mut(name) else {
            log::warn!("Sichtbarkeit für unbekannten Layer '{}' ignoriert", name);
            return RegistryChange::UnknownLayer;
        };
        if layer.visible == visible {
            return RegistryChange::Unchanged;
        }
        layer.visible = visible;
        RegistryChange::Updated
    }

    /// Ersetzt den Filter eines Layers vollständig.
    ///
    /// `None` und die Tautologie stellen die volle Feature-Menge wieder her.
    /// Derselbe Ausdruck zweimal ergibt beim zweiten Mal `Unchanged`.
    pub fn set_filter(&mut self, name: &str, filter: Option<FilterExpression>) -> RegistryChange {
        let Some(layer) = self.layers.get_mut(name) else {
            log::warn!("Filter für unbekannten Layer '{}' ignoriert", name);
            return RegistryChange::UnknownLayer;
        };
        let filter = filter.unwrap_or_default();
        if layer.filter == filter {
            return RegistryChange::Unchanged;
        }
        log::debug!("Filter '{}': {} → {}", name, layer.filter, filter);
        layer.filter = filter;
        RegistryChange::Updated
    }

    /// Aktuelle Sichtbarkeit eines Layers.
    pub fn visibility(&self, name: &str) -> Option<bool> {
        self.get(name).map(|layer| layer.visible)
    }

    /// Aktiver Filter eines Layers.
    pub fn filter(&self, name: &str) -> Option<&FilterExpression> {
        self.get(name).map(|layer| &layer.filter)
    }

    /// Deklarative String-Form des aktiven Filters.
    pub fn filter_expression(&self, name: &str) -> Option<String> {
        self.get(name).map(Layer::filter_expression)
    }

    /// Vereinigte Ausdehnung aller geladenen Layer.
    pub fn loaded_extent(&self) -> Option<Rect<f64>> {
        union_extent(self.layers.values().filter_map(|layer| layer.extent))
    }

    /// Alle Layer-Namen in Zeichenreihenfolge.
    pub fn names(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    /// Iteriert über alle Layer in Zeichenreihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    /// Gibt die Anzahl der geladenen Layer zurück.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Gibt zurück ob die Registry leer ist.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LayerSpec;

    fn registry() -> LayerRegistry {
        let mut registry = LayerRegistry::new();
        registry.register(Layer::from_spec(&LayerSpec::polygon("regions", "r"), None));
        registry.register(Layer::from_spec(&LayerSpec::point("stations", "s"), None));
        registry
    }

    #[test]
    fn visibility_is_idempotent_and_isolated() {
        let mut registry = registry();

        assert_eq!(registry.set_visibility("stations", false), RegistryChange::Updated);
        assert_eq!(registry.set_visibility("stations", false), RegistryChange::Unchanged);
        assert_eq!(registry.visibility("stations"), Some(false));
        assert_eq!(registry.visibility("regions"), Some(true));
    }

    #[test]
    fn unknown_layer_is_reported_not_fatal() {
        let mut registry = registry();

        assert_eq!(
            registry.set_visibility("sketch", true),
            RegistryChange::UnknownLayer
        );
        assert_eq!(
            registry.set_filter("sketch", Some(FilterExpression::Nothing)),
            RegistryChange::UnknownLayer
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn filter_replaces_previous_and_none_restores_tautology() {
        let mut registry = registry();
        let region = FilterExpression::field_equals("region", "Oriental");
        let ids = FilterExpression::id_in("OBJECTID", [3, 1]);

        assert!(registry.set_filter("stations", Some(region.clone())).is_updated());
        assert!(!registry.set_filter("stations", Some(region)).is_updated());
        assert!(registry.set_filter("stations", Some(ids)).is_updated());
        assert_eq!(
            registry.filter_expression("stations").as_deref(),
            Some("OBJECTID IN (1,3)")
        );

        assert!(registry.set_filter("stations", None).is_updated());
        assert_eq!(registry.filter("stations"), Some(&FilterExpression::All));
        assert!(!registry
            .set_filter("stations", Some(FilterExpression::All))
            .is_updated());
    }
}
