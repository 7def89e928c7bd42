pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod init;
pub mod mcmc;
pub mod simulation;

mod parallel;

pub use config::{KineticsParams, ReseedMode, UpdateConfig};
pub use error::{GrainError, Result};
pub use grid::{BoundaryExchange, LocalGrid, SlabDecomposition, Spin, SpinGrid, Subdomain};
pub use mcmc::{Checkerboard, GrainUpdater, UpdateCounters};
pub use simulation::{run_partitioned, run_update_loop};
