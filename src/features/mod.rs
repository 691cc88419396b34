//! Feature registry and its admin surface

mod admin;
mod registry;

pub use admin::FeatureAdmin;
pub use registry::{FeatureRegistry, Upserted, EMPTY_FORMULA};
