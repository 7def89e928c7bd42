pub mod domain;
pub mod offsets;

pub use domain::Domain;
pub use offsets::{corners, moore};
