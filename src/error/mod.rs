pub mod briq_error;

pub use briq_error::{BriqError, BriqResult};
