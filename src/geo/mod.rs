//! Geographic data: projection, GeoJSON parsing, border classification and loading.

pub mod borders;
pub mod geojson;
pub mod loader;
pub mod projection;

pub use borders::{BorderBuilder, BorderClass, BorderLine};
pub use loader::{BorderLoader, BorderStatus, DataSources};
pub use projection::GeoPoint;
