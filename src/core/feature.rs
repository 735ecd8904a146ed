//! Geographische Features (Geometrie + Attribute).

use geo::{BoundingRect, Intersects, MultiPolygon, Point, Polygon, Rect};

use super::{AttributeValue, Attributes, LayerKind};

/// Stabile Feature-ID (z.B. `OBJECTID`).
pub type FeatureId = i64;

/// Geometrie eines Features.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// Punkt in Karten-Koordinaten (x = Längengrad, y = Breitengrad)
    Point(Point<f64>),
    /// (Multi-)Polygon, z.B. Region oder Provinz
    Polygon(MultiPolygon<f64>),
}

impl FeatureGeometry {
    /// Layer-Art, zu der diese Geometrie passt.
    pub fn kind(&self) -> LayerKind {
        match self {
            FeatureGeometry::Point(_) => LayerKind::Point,
            FeatureGeometry::Polygon(_) => LayerKind::Polygon,
        }
    }

    /// Achsenparalleles Begrenzungsrechteck (None bei leerem Polygon).
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            FeatureGeometry::Point(point) => Some(point.bounding_rect()),
            FeatureGeometry::Polygon(polygon) => polygon.bounding_rect(),
        }
    }

    /// Prüft ob ein Punkt die Geometrie schneidet (Rand inklusive).
    pub fn intersects_point(&self, point: &Point<f64>) -> bool {
        match self {
            FeatureGeometry::Point(own) => own == point,
            FeatureGeometry::Polygon(polygon) => polygon.intersects(point),
        }
    }

    /// Prüft ob sich zwei Geometrien schneiden (Rand inklusive).
    pub fn intersects(&self, other: &FeatureGeometry) -> bool {
        match (self, other) {
            (FeatureGeometry::Point(point), other) | (other, FeatureGeometry::Point(point)) => {
                other.intersects_point(point)
            }
            (FeatureGeometry::Polygon(a), FeatureGeometry::Polygon(b)) => a.intersects(b),
        }
    }
}

impl From<Point<f64>> for FeatureGeometry {
    fn from(point: Point<f64>) -> Self {
        FeatureGeometry::Point(point)
    }
}

impl From<Polygon<f64>> for FeatureGeometry {
    fn from(polygon: Polygon<f64>) -> Self {
        FeatureGeometry::Polygon(MultiPolygon(vec![polygon]))
    }
}

impl From<MultiPolygon<f64>> for FeatureGeometry {
    fn from(polygon: MultiPolygon<f64>) -> Self {
        FeatureGeometry::Polygon(polygon)
    }
}

/// Read-only Snapshot eines Features, wie ihn Hit-Test und Abfragen liefern.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Name des besitzenden Layers
    pub layer_name: String,
    /// Geometrie
    pub geometry: FeatureGeometry,
    /// Attribut-Tabelle
    pub attributes: Attributes,
}

impl Feature {
    /// Erstellt ein Feature ohne Attribute.
    pub fn new(layer_name: impl Into<String>, geometry: impl Into<FeatureGeometry>) -> Self {
        Self {
            layer_name: layer_name.into(),
            geometry: geometry.into(),
            attributes: Attributes::new(),
        }
    }

    /// Builder: setzt ein Attribut.
    pub fn with_attribute(mut self, field: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(field.to_string(), value.into());
        self
    }

    /// Liefert den Wert eines Attributs.
    pub fn attribute(&self, field: &str) -> Option<&AttributeValue> {
        self.attributes.get(field)
    }

    /// Liest die stabile Feature-ID aus dem angegebenen Feld.
    pub fn id(&self, id_field: &str) -> Option<FeatureId> {
        self.attribute(id_field).and_then(AttributeValue::as_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square() -> FeatureGeometry {
        polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)].into()
    }

    #[test]
    fn polygon_intersection_includes_boundary() {
        let geometry = square();
        assert!(geometry.intersects_point(&Point::new(1.0, 1.0)));
        assert!(geometry.intersects_point(&Point::new(2.0, 1.0)));
        assert!(geometry.intersects_point(&Point::new(0.0, 0.0)));
        assert!(!geometry.intersects_point(&Point::new(2.1, 1.0)));
    }

    #[test]
    fn polygons_touching_at_an_edge_intersect() {
        let right: FeatureGeometry =
            polygon![(x: 2.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 2.0), (x: 2.0, y: 2.0)]
                .into();
        let far: FeatureGeometry =
            polygon![(x: 5.0, y: 5.0), (x: 6.0, y: 5.0), (x: 6.0, y: 6.0)].into();

        assert!(square().intersects(&right));
        assert!(!square().intersects(&far));
        assert!(FeatureGeometry::Point(Point::new(2.0, 2.0)).intersects(&square()));
    }

    #[test]
    fn feature_id_is_read_from_configured_field() {
        let feature = Feature::new("stations", Point::new(-7.6, 33.6))
            .with_attribute("OBJECTID", 17_i64)
            .with_attribute("name", "Casa Voyageurs");

        assert_eq!(feature.id("OBJECTID"), Some(17));
        assert_eq!(feature.id("FID"), None);
        assert_eq!(feature.geometry.kind(), LayerKind::Point);
    }
}
