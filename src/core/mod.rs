//! Core-Domänentypen: Features, Layer, Filter, Aggregation, Ansicht, Spatial-Index.

pub mod aggregation;
pub mod attribute;
pub mod error;
pub mod feature;
pub mod filter;
pub mod layer;
pub mod popup;
pub mod spatial;
pub mod view;

pub use aggregation::{aggregate, CategoryCount, CategoryDataset, UNDEFINED_CATEGORY};
pub use attribute::{AttributeValue, Attributes};
pub use error::{LayerLoadError, QueryError, SessionError};
pub use feature::{Feature, FeatureGeometry, FeatureId};
pub use filter::{FilterExpression, FilterParseError};
pub use layer::{CoordinateFields, Layer, LayerKind, LayerSpec};
pub use popup::{AttributeRow, AttributeView, FieldInfo, PopupTemplate, GENERIC_POPUP_TITLE};
pub use spatial::{PointIndex, PointMatch};
pub use view::{union_extent, Basemap, MapView};
