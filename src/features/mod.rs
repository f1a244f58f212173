//! Fixed-width numeric encoding of draft positions.

pub mod encoder;
pub mod schema;

pub use encoder::{FeatureEncoder, FeatureVector};
pub use schema::{schema, FeatureSchema, Segment, F, FEATURE_SCHEMA_ID};
