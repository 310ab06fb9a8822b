pub mod field;
pub mod snapshot;
pub mod surface;
