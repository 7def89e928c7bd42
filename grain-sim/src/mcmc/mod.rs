pub mod checkerboard;
pub mod kinetics;
pub mod neighborhood;
pub mod sweep;

pub use checkerboard::Checkerboard;
pub use kinetics::Kinetics;
pub use neighborhood::{NeighborSpins, Neighborhood};
pub use sweep::{GrainUpdater, UpdateCounters};
