//! Spatial-Index (KD-Tree) für schnelle Abfragen auf Punkt-Features.

use geo::Point;
use indexmap::IndexMap;
use kiddo::{KdTree, SquaredEuclidean};

use super::{Feature, FeatureGeometry};

/// Relativer Zuschlag auf Abfrage-Radien, damit Punkte exakt auf dem
/// umschließenden Kreis nicht durch Rundung herausfallen.
const RADIUS_SLACK: f64 = 1e-9;

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMatch {
    /// Index des Features in der indexierten Sequenz
    pub index: usize,
    /// Euklidische Distanz zum Suchpunkt (Karteneinheiten)
    pub distance: f64,
}

/// Read-only Spatial-Index über den Punkt-Features eines Layers.
///
/// Der KD-Tree enthält jede Position nur einmal; deckungsgleiche Features
/// teilen sich einen Eintrag. Kiddo-Buckets fassen nur 32 Einträge an exakt
/// derselben Koordinate.
#[derive(Debug, Clone)]
pub struct PointIndex {
    tree: KdTree<f64, 2>,
    /// Feature-Indizes je Tree-Eintrag (eine Position, aufsteigend)
    buckets: Vec<Vec<usize>>,
    /// Position je Feature-Index (None für Nicht-Punkte)
    positions: Vec<Option<Point<f64>>>,
    /// Anzahl indexierter Punkt-Features
    count: usize,
}

impl PointIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            buckets: Vec::new(),
            positions: Vec::new(),
            count: 0,
        }
    }

    /// Baut einen neuen Index aus den übergebenen Features.
    ///
    /// Features ohne Punkt-Geometrie oder mit nicht-endlichen Koordinaten
    /// werden übersprungen.
    pub fn from_features(features: &[Feature]) -> Self {
        let positions: Vec<Option<Point<f64>>> = features
            .iter()
            .map(|feature| match &feature.geometry {
                FeatureGeometry::Point(point) if point.x().is_finite() && point.y().is_finite() => {
                    Some(*point)
                }
                _ => None,
            })
            .collect();

        // Schlüssel über die Bitmuster; `+ 0.0` normalisiert -0.0
        let mut grouped: IndexMap<[u64; 2], ([f64; 2], Vec<usize>)> = IndexMap::new();
        let mut count = 0;
        for (index, position) in positions.iter().enumerate() {
            if let Some(point) = position {
                let coords = [point.x() + 0.0, point.y() + 0.0];
                grouped
                    .entry([coords[0].to_bits(), coords[1].to_bits()])
                    .or_insert_with(|| (coords, Vec::new()))
                    .1
                    .push(index);
                count += 1;
            }
        }

        let (entries, buckets): (Vec<[f64; 2]>, Vec<Vec<usize>>) = grouped.into_values().unzip();
        let tree: KdTree<f64, 2> = (&entries).into();

        Self {
            tree,
            buckets,
            positions,
            count,
        }
    }

    /// Gibt die Anzahl indexierter Punkte zurück.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Gibt `true` zurück, wenn keine Punkte im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Findet alle Punkte innerhalb eines Radius, sortiert nach Distanz.
    pub fn within_radius(&self, query: Point<f64>, radius: f64) -> Vec<PointMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let radius_sq = radius * radius * (1.0 + RADIUS_SLACK) + f64::EPSILON;
        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x(), query.y()], radius_sq)
            .into_iter()
            .filter_map(|entry| {
                let bucket = self.buckets.get(entry.item as usize)?;
                let distance = entry.distance.sqrt();
                (distance <= radius).then_some((bucket, distance))
            })
            .flat_map(|(bucket, distance)| {
                bucket
                    .iter()
                    .map(move |&index| PointMatch { index, distance })
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.index.cmp(&b.index))
        });
        results
    }

    /// Findet alle Punkte, die die Geometrie schneiden (Rand inklusive).
    ///
    /// Nutzt den KD-Tree mit einer umschließenden Kreisabfrage um das
    /// Begrenzungsrechteck + exakte `intersects`-Prüfung. Ergebnis in
    /// aufsteigender Feature-Reihenfolge.
    pub fn intersecting(&self, geometry: &FeatureGeometry) -> Vec<usize> {
        if self.is_empty() {
            return Vec::new();
        }
        let Some(rect) = geometry.bounding_rect() else {
            return Vec::new();
        };

        let center = rect.center();
        let half_w = rect.width() * 0.5;
        let half_h = rect.height() * 0.5;
        // Radius des umschließenden Kreises (Diagonale / 2)
        let radius_sq = (half_w * half_w + half_h * half_h) * (1.0 + RADIUS_SLACK) + f64::EPSILON;

        let mut hits: Vec<usize> = self
            .tree
            .within::<SquaredEuclidean>(&[center.x, center.y], radius_sq)
            .into_iter()
            .filter_map(|entry| {
                let bucket = self.buckets.get(entry.item as usize)?;
                let first = *bucket.first()?;
                let point = self.positions.get(first).copied().flatten()?;
                // Exakte Prüfung nach dem KD-Tree-Vorfilter
                geometry.intersects_point(&point).then_some(bucket)
            })
            .flatten()
            .copied()
            .collect();

        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn sample_features() -> Vec<Feature> {
        vec![
            Feature::new("stations", Point::new(0.0, 0.0)),
            Feature::new("stations", Point::new(10.0, 0.0)),
            Feature::new("stations", Point::new(4.0, 3.0)),
            Feature::new("stations", Point::new(2.0, 2.0)),
        ]
    }

    #[test]
    fn radius_query_returns_sorted_matches() {
        let index = PointIndex::from_features(&sample_features());
        let matches = index.within_radius(Point::new(0.0, 0.0), 5.0);

        let ids: Vec<usize> = matches.into_iter().map(|m| m.index).collect();
        assert_eq!(ids, vec![0, 3, 2]);
    }

    #[test]
    fn intersecting_includes_points_on_boundary() {
        let index = PointIndex::from_features(&sample_features());
        let square: FeatureGeometry =
            polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 3.0), (x: 0.0, y: 3.0)]
                .into();

        // (0,0) Ecke, (4,3) Ecke, (2,2) innen; (10,0) außen
        assert_eq!(index.intersecting(&square), vec![0, 2, 3]);
    }

    #[test]
    fn intersecting_filters_bounding_circle_candidates_exactly() {
        let index = PointIndex::from_features(&sample_features());
        // Dreieck, dessen Begrenzungsrechteck (2,2) enthält, das Dreieck selbst nicht
        let triangle: FeatureGeometry =
            polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 3.0)].into();

        let hits = index.intersecting(&triangle);
        assert!(hits.contains(&0));
        assert!(hits.contains(&2));
        assert!(!hits.contains(&3));
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = PointIndex::empty();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.within_radius(Point::new(0.0, 0.0), 1.0).is_empty());
    }

    #[test]
    fn many_colocated_points_are_all_found() {
        let mut features: Vec<Feature> = (0..100)
            .map(|_| Feature::new("stations", Point::new(-7.5, 33.5)))
            .collect();
        features.push(Feature::new("stations", Point::new(-7.0, 33.0)));
        let index = PointIndex::from_features(&features);
        let square: FeatureGeometry = polygon![
            (x: -8.0, y: 33.0),
            (x: -7.2, y: 33.0),
            (x: -7.2, y: 34.0),
            (x: -8.0, y: 34.0),
        ]
        .into();

        assert_eq!(index.len(), 101);
        assert_eq!(index.intersecting(&square), (0..100).collect::<Vec<_>>());
        let near = index.within_radius(Point::new(-7.5, 33.5), 0.1);
        assert_eq!(near.len(), 100);
        assert!(near.iter().all(|m| m.distance == 0.0));
    }

    #[test]
    fn non_finite_points_are_not_indexed() {
        let features = vec![
            Feature::new("stations", Point::new(f64::NAN, 33.0)),
            Feature::new("stations", Point::new(-7.0, f64::INFINITY)),
            Feature::new("stations", Point::new(-7.0, 33.0)),
        ];
        let index = PointIndex::from_features(&features);

        assert_eq!(index.len(), 1);
        let ids: Vec<usize> = index
            .within_radius(Point::new(-7.0, 33.0), 1.0)
            .into_iter()
            .map(|m| m.index)
            .collect();
        assert_eq!(ids, vec![2]);
    }
}
