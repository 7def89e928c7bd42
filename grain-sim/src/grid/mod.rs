//! The grid contract the update core consumes, plus two reference grids.

pub mod local;
pub mod slab;

pub use local::LocalGrid;
pub use slab::{SlabDecomposition, Subdomain};

/// Grain label stored at every lattice site.
pub type Spin = i32;

/// Indexed access to one worker's portion of a distributed spin field.
///
/// Local bounds delimit the sites this worker owns; global bounds delimit the
/// whole lattice. Both upper bounds are exclusive. `read_spin` must also
/// answer for ghost copies of sites owned by a neighbouring worker that lie in
/// the Moore neighborhood of an owned site.
pub trait SpinGrid {
    fn n_dims(&self) -> usize;

    /// Number of owned sites.
    fn site_count(&self) -> usize;

    /// Coordinate of the owned site with local linear index `index`.
    fn coordinate_of(&self, index: usize) -> Vec<isize>;

    fn local_lower(&self, axis: usize) -> isize;
    fn local_upper(&self, axis: usize) -> isize;
    fn global_lower(&self, axis: usize) -> isize;
    fn global_upper(&self, axis: usize) -> isize;

    fn read_spin(&self, site: &[isize]) -> Spin;

    /// Only ever called for owned sites.
    fn write_spin(&mut self, site: &[isize], spin: Spin);
}

/// Ghost synchronization after all flips of one color have been applied.
///
/// Blocking and collective: every worker's writes for `color` are visible to
/// every other worker when this returns.
pub trait BoundaryExchange {
    fn exchange_boundaries(&mut self, color: usize);
}
