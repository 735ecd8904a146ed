//! Karten-Ansicht: Zentrum, Zoom, Viewport und Basiskarte.

use geo::{Coord, Point, Rect};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Kachelgröße in Pixeln (Zoom 0 = 360° auf einer Kachel).
pub const TILE_SIZE_PX: f64 = 256.0;

/// Basiskarte (Hintergrund-Imagery).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Basemap {
    /// Straßenkarte
    Streets,
    /// Satellitenbild
    Satellite,
    /// Topographische Vektorkarte
    #[default]
    TopoVector,
}

impl Basemap {
    /// Bezeichner, wie ihn der Karten-Kollaborateur erwartet.
    pub fn id(&self) -> &'static str {
        match self {
            Basemap::Streets => "streets",
            Basemap::Satellite => "satellite",
            Basemap::TopoVector => "topo-vector",
        }
    }
}

/// 2D-Kartenansicht mit Zentrum und Zoom.
///
/// Lineare Abbildung Grad ↔ Pixel; Projektion ist Sache des Karten-Kollaborateurs.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// Zentrum in Karten-Koordinaten (x = Länge, y = Breite)
    pub center: DVec2,
    /// Zoom-Level (0 = ganze Welt auf einer Kachel)
    pub zoom: f64,
    /// Viewport-Größe in Pixeln
    pub viewport_size: DVec2,
}

impl MapView {
    /// Minimaler Zoom-Level.
    pub const ZOOM_MIN: f64 = 0.0;
    /// Maximaler Zoom-Level.
    pub const ZOOM_MAX: f64 = 22.0;
    /// Rand beim Einpassen einer Ausdehnung (Faktor auf die Ausdehnung).
    pub const FIT_PADDING: f64 = 1.1;

    /// Erstellt eine Ansicht mit Standard-Viewport 1280×720.
    pub fn new(center: DVec2, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(Self::ZOOM_MIN, Self::ZOOM_MAX),
            viewport_size: DVec2::new(1280.0, 720.0),
        }
    }

    /// Karteneinheiten (Grad) pro Screen-Pixel.
    pub fn map_units_per_pixel(&self) -> f64 {
        360.0 / (TILE_SIZE_PX * 2f64.powf(self.zoom))
    }

    /// Konvertiert Screen-Koordinaten (Pixel, Ursprung oben links) zu Karten-Koordinaten.
    pub fn screen_to_map(&self, screen_pos: DVec2) -> Point<f64> {
        let upp = self.map_units_per_pixel();
        let offset = screen_pos - self.viewport_size * 0.5;
        // Screen-Y wächst nach unten, Breite nach oben
        Point::new(
            self.center.x + offset.x * upp,
            self.center.y - offset.y * upp,
        )
    }

    /// Konvertiert Karten-Koordinaten zu Screen-Koordinaten.
    pub fn map_to_screen(&self, point: Point<f64>) -> DVec2 {
        let upp = self.map_units_per_pixel();
        DVec2::new(
            (point.x() - self.center.x) / upp,
            (self.center.y - point.y()) / upp,
        ) + self.viewport_size * 0.5
    }

    /// Toleranz in Karteneinheiten für einen Pick-Radius in Pixeln.
    pub fn pick_tolerance(&self, pick_radius_px: f64) -> f64 {
        pick_radius_px.max(0.0) * self.map_units_per_pixel()
    }

    /// Aktualisiert die Viewport-Größe (mindestens 1×1 Pixel).
    pub fn resize(&mut self, size: DVec2) {
        self.viewport_size = size.max(DVec2::ONE);
    }

    /// Passt Zentrum und Zoom so an, dass die Ausdehnung vollständig sichtbar ist.
    ///
    /// Degenerierte Ausdehnungen (Punkt) zentrieren nur, ohne den Zoom zu ändern.
    pub fn fit_extent(&mut self, extent: Rect<f64>) {
        let center = extent.center();
        self.center = DVec2::new(center.x, center.y);

        let width = extent.width() * Self::FIT_PADDING;
        let height = extent.height() * Self::FIT_PADDING;
        if width <= 0.0 && height <= 0.0 {
            return;
        }

        let upp = (width / self.viewport_size.x).max(height / self.viewport_size.y);
        let zoom = (360.0 / (TILE_SIZE_PX * upp)).log2();
        self.zoom = zoom.clamp(Self::ZOOM_MIN, Self::ZOOM_MAX);
    }

    /// Sichtbare Ausdehnung in Karten-Koordinaten.
    pub fn visible_extent(&self) -> Rect<f64> {
        let half = self.viewport_size * 0.5 * self.map_units_per_pixel();
        Rect::new(
            Coord {
                x: self.center.x - half.x,
                y: self.center.y - half.y,
            },
            Coord {
                x: self.center.x + half.x,
                y: self.center.y + half.y,
            },
        )
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(DVec2::ZERO, 1.0)
    }
}

/// Vereinigt mehrere Ausdehnungen zu einem umschließenden Rechteck.
pub fn union_extent<I>(extents: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = Rect<f64>>,
{
    extents.into_iter().reduce(|acc, rect| {
        Rect::new(
            Coord {
                x: acc.min().x.min(rect.min().x),
                y: acc.min().y.min(rect.min().y),
            },
            Coord {
                x: acc.max().x.max(rect.max().x),
                y: acc.max().y.max(rect.max().y),
            },
        )
    })
}
