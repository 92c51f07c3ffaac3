pub mod collection;
pub mod store;

pub use collection::{Feature, FeatureCollection, DEFAULT_CRS};
pub use store::{FeatureLayer, FeatureSource, FeatureStore, InMemorySource};
