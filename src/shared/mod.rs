//! Geteilte Typen für Konfiguration und externe Eingaben.
//!
//! Enthält Typen, die zwischen `app`, `surface` und dem Host geteilt werden.

pub mod options;
pub mod params;

pub use options::SessionOptions;
pub use options::{FEATURE_ID_FIELD, PICK_RADIUS_PX, STATION_LAYER};
pub use params::{FilterParameters, VisibilityState};
