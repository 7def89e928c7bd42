/// Moore-neighborhood offsets: every non-zero vector in `{-1, 0, 1}^n_dims`.
///
/// Ordered lexicographically with axis 0 slowest, so for `n_dims = 2` this
/// returns `[-1,-1], [-1,0], [-1,1], [0,-1], [0,1], [1,-1], [1,0], [1,1]`.
pub fn moore(n_dims: usize) -> Vec<Vec<isize>> {
    let n_total = 3usize.pow(n_dims as u32);
    let center = n_total / 2;
    (0..n_total)
        .filter(|&k| k != center)
        .map(|k| {
            let mut v = vec![0isize; n_dims];
            let mut rem = k;
            for d in (0..n_dims).rev() {
                v[d] = (rem % 3) as isize - 1;
                rem /= 3;
            }
            v
        })
        .collect()
}

/// Corner offsets of the unit hypercube, one per checkerboard color.
///
/// Color `c` shifts axis `d` by bit `n_dims - 1 - d` of `c`, so the last axis
/// is the fastest-varying bit: in 2D the colors are `[0,0], [0,1], [1,0], [1,1]`.
pub fn corners(n_dims: usize) -> Vec<Vec<isize>> {
    (0..1usize << n_dims)
        .map(|c| {
            (0..n_dims)
                .map(|d| ((c >> (n_dims - 1 - d)) & 1) as isize)
                .collect()
        })
        .collect()
}
