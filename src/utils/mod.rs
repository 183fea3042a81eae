pub mod logging;
pub mod payload;

pub use payload::non_empty;
