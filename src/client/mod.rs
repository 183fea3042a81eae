pub mod api;
pub mod builder;

pub use api::{BriqClient, QueryParams};
pub use builder::BriqClientBuilder;
