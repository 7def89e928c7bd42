use crate::geometry::corners;
use crate::grid::SpinGrid;

/// Checkerboard tiling of one worker's local domain into 2-wide blocks.
///
/// Each block contributes at most one site to each of the `2^n_dims` colors.
/// Two sites of the same color are at least 2 apart along every axis, so their
/// Moore neighborhoods never overlap and a color can be updated in any order.
///
/// The block origin is the local lower corner rounded down to an even
/// coordinate on every axis, which gives every worker the same global color
/// parity regardless of where its slab starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkerboard {
    pub n_dims: usize,
    /// First block's lower corner.
    pub base: Vec<isize>,
    /// Blocks along each axis.
    pub blocks: Vec<usize>,
    /// Total blocks (`blocks.iter().product()`).
    pub n_blocks: usize,
    /// Per-color block offsets, see [`corners`].
    pub offsets: Vec<Vec<isize>>,
    /// Number of blocks whose color member lies inside the local domain.
    pub sites_per_color: Vec<usize>,
    lower: Vec<isize>,
    upper: Vec<isize>,
}

impl Checkerboard {
    /// Tile the local domain `[lower, upper)`.
    pub fn new(lower: Vec<isize>, upper: Vec<isize>) -> Self {
        let n_dims = lower.len();
        let base: Vec<isize> = lower.iter().map(|&lo| lo - lo.rem_euclid(2)).collect();
        let blocks: Vec<usize> = base
            .iter()
            .zip(&upper)
            .map(|(&b, &hi)| ((hi - b + 1) / 2).max(0) as usize)
            .collect();
        let n_blocks = blocks.iter().product();
        let offsets = corners(n_dims);

        let mut board = Self {
            n_dims,
            base,
            blocks,
            n_blocks,
            offsets,
            sites_per_color: vec![],
            lower,
            upper,
        };

        let mut counts = vec![0usize; board.n_colors()];
        let mut site = vec![0isize; n_dims];
        for block in 0..board.n_blocks {
            for (color, count) in counts.iter_mut().enumerate() {
                if board.site_into(block, color, &mut site) {
                    *count += 1;
                }
            }
        }
        board.sites_per_color = counts;
        board
    }

    /// Tile the local domain of `grid`.
    pub fn for_grid<G: SpinGrid + ?Sized>(grid: &G) -> Self {
        let n = grid.n_dims();
        Self::new(
            (0..n).map(|d| grid.local_lower(d)).collect(),
            (0..n).map(|d| grid.local_upper(d)).collect(),
        )
    }

    pub fn n_colors(&self) -> usize {
        self.offsets.len()
    }

    /// Decode `block` (mixed radix, last axis fastest), apply the color offset
    /// and write the site into `out`. Returns whether it lies in the local domain.
    #[inline]
    pub fn site_into(&self, block: usize, color: usize, out: &mut [isize]) -> bool {
        let mut rem = block;
        for d in (0..self.n_dims).rev() {
            let cell = (rem % self.blocks[d]) as isize;
            rem /= self.blocks[d];
            out[d] = self.base[d] + 2 * cell + self.offsets[color][d];
        }
        out.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(&x, (&lo, &hi))| x >= lo && x < hi)
    }

    /// The site of `color` in `block`, if it lies in the local domain.
    pub fn site(&self, block: usize, color: usize) -> Option<Vec<isize>> {
        let mut out = vec![0isize; self.n_dims];
        self.site_into(block, color, &mut out).then_some(out)
    }

    /// All in-domain sites of `color`, in block order.
    pub fn sites(&self, color: usize) -> impl Iterator<Item = Vec<isize>> + '_ {
        (0..self.n_blocks).filter_map(move |b| self.site(b, color))
    }
}
