//! Initial simplex construction.
//!
//! Nelder–Mead needs `n + 1` affinely independent vertices in `n` dimensions.
//! Vertex 0 is the caller's guess; vertex `i` moves coordinate `i - 1` by a
//! relative step (or an absolute one when the coordinate is ~0, where a
//! relative step would collapse the simplex).

use crate::domain::FitOptions;

/// Coordinates with magnitude below this use `FitOptions::zero_step`.
const NEAR_ZERO: f64 = 1e-8;

pub fn initial_simplex(x0: &[f64], opts: &FitOptions) -> Vec<Vec<f64>> {
    let mut vertices = Vec::with_capacity(x0.len() + 1);
    vertices.push(x0.to_vec());
    for i in 0..x0.len() {
        let mut v = x0.to_vec();
        v[i] += if v[i].abs() > NEAR_ZERO {
            opts.relative_step * v[i]
        } else {
            opts.zero_step
        };
        vertices.push(v);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplex_shape_and_steps() {
        let opts = FitOptions::default();
        let s = initial_simplex(&[0.0, 10.0], &opts);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0], vec![0.0, 10.0]);
        assert_eq!(s[1], vec![opts.zero_step, 10.0]);
        assert!((s[2][1] - 10.5).abs() < 1e-12);
    }
}
