//! Collapsed Gauss-Jacobi quadrature on simplices
//!
//! These rules are used to express integral moments as weighted point evaluations.
use itertools::iproduct;
use rlst::{rlst_dynamic_array2, DynamicArray, RandomAccessMut};
use std::f64::consts::PI;

/// A quadrature rule on a reference simplex
pub(crate) struct QuadratureRule {
    /// The dimension of a single point
    pub dim: usize,
    /// The number of points
    pub npoints: usize,
    /// The point coordinates, stored point by point
    pub points: Vec<f64>,
    /// The weights
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// The coordinates of a point
    pub fn point(&self, index: usize) -> &[f64] {
        &self.points[index * self.dim..(index + 1) * self.dim]
    }

    /// The points as an array of shape `[npoints, dim]`
    pub fn point_array(&self) -> DynamicArray<f64, 2> {
        let mut points = rlst_dynamic_array2!(f64, [self.npoints, self.dim]);
        for p in 0..self.npoints {
            for (j, x) in self.point(p).iter().enumerate() {
                *points.get_mut([p, j]).unwrap() = *x;
            }
        }
        points
    }
}

/// The value and derivative of the Jacobi polynomial P_n^{(a, 0)} at x
fn jacobi(a: f64, n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    let (mut p0, mut d0) = (1.0, 0.0);
    let (mut p1, mut d1) = (0.5 * (a + (a + 2.0) * x), 0.5 * (a + 2.0));
    for k in 2..n + 1 {
        let k = k as f64;
        let a1 = 2.0 * k * (k + a) * (2.0 * k + a - 2.0);
        let a2 = (2.0 * k + a - 1.0) * (a * a) / a1;
        let a3 = (2.0 * k + a - 2.0) * (2.0 * k + a - 1.0) * (2.0 * k + a) / a1;
        let a4 = 2.0 * (k + a - 1.0) * (k - 1.0) * (2.0 * k + a) / a1;
        let p2 = p1 * (a2 + a3 * x) - p0 * a4;
        let d2 = d1 * (a2 + a3 * x) + p1 * a3 - d0 * a4;
        (p0, d0, p1, d1) = (p1, d1, p2, d2);
    }
    (p1, d1)
}

/// The m roots of P_m^{(a, 0)} on [-1, 1]
///
/// Newton's method with deflation of the roots already found, starting from Chebyshev points.
fn gauss_jacobi_points(a: f64, m: usize) -> Vec<f64> {
    let max_iter = 100;
    let mut x = vec![0.0; m];
    for k in 0..m {
        x[k] = -((2.0 * k as f64 + 1.0) * PI / (2.0 * m as f64)).cos();
        if k > 0 {
            x[k] = 0.5 * (x[k] + x[k - 1]);
        }
        for _ in 0..max_iter {
            let s = x[..k].iter().map(|xi| 1.0 / (x[k] - xi)).sum::<f64>();
            let (f, fp) = jacobi(a, m, x[k]);
            let delta = f / (fp - f * s);
            x[k] -= delta;
            if delta.abs() < 1e-14 {
                break;
            }
        }
    }
    x
}

/// Gauss-Jacobi rule with weight (1 - x)^a on [-1, 1]
fn gauss_jacobi_rule(a: f64, m: usize) -> (Vec<f64>, Vec<f64>) {
    let pts = gauss_jacobi_points(a, m);
    let scale = 2f64.powf(a + 1.0);
    let wts = pts
        .iter()
        .map(|x| {
            let (_, fp) = jacobi(a, m, *x);
            scale / (1.0 - x * x) / (fp * fp)
        })
        .collect::<Vec<_>>();
    (pts, wts)
}

fn make_quadrature_interval(m: usize) -> QuadratureRule {
    let (ptx, wx) = gauss_jacobi_rule(0.0, m);
    QuadratureRule {
        dim: 1,
        npoints: m,
        points: ptx.iter().map(|x| 0.5 * (x + 1.0)).collect(),
        weights: wx.iter().map(|w| 0.5 * w).collect(),
    }
}

fn make_quadrature_triangle_collapsed(m: usize) -> QuadratureRule {
    let (ptx, wx) = gauss_jacobi_rule(0.0, m);
    let (pty, wy) = gauss_jacobi_rule(1.0, m);

    let mut points = Vec::with_capacity(2 * m * m);
    let mut weights = Vec::with_capacity(m * m);
    for (i, j) in iproduct!(0..m, 0..m) {
        points.push(0.25 * (1.0 + ptx[i]) * (1.0 - pty[j]));
        points.push(0.5 * (1.0 + pty[j]));
        weights.push(wx[i] * wy[j] * 0.125);
    }
    QuadratureRule {
        dim: 2,
        npoints: m * m,
        points,
        weights,
    }
}

fn make_quadrature_tetrahedron_collapsed(m: usize) -> QuadratureRule {
    let (ptx, wx) = gauss_jacobi_rule(0.0, m);
    let (pty, wy) = gauss_jacobi_rule(1.0, m);
    let (ptz, wz) = gauss_jacobi_rule(2.0, m);

    let mut points = Vec::with_capacity(3 * m * m * m);
    let mut weights = Vec::with_capacity(m * m * m);
    for (i, j, k) in iproduct!(0..m, 0..m, 0..m) {
        points.push(0.125 * (1.0 + ptx[i]) * (1.0 - pty[j]) * (1.0 - ptz[k]));
        points.push(0.25 * (1.0 + pty[j]) * (1.0 - ptz[k]));
        points.push(0.5 * (1.0 + ptz[k]));
        weights.push(wx[i] * wy[j] * wz[k] * 0.125 * 0.125);
    }
    QuadratureRule {
        dim: 3,
        npoints: m * m * m,
        points,
        weights,
    }
}

/// A rule with m points in each direction on the reference simplex of dimension `tdim`
///
/// The rule integrates polynomials of degree 2m - 1 exactly.
pub(crate) fn make_quadrature(tdim: usize, m: usize) -> QuadratureRule {
    match tdim {
        1 => make_quadrature_interval(m),
        2 => make_quadrature_triangle_collapsed(m),
        3 => make_quadrature_tetrahedron_collapsed(m),
        _ => {
            panic!("Unsupported dimension: {tdim}");
        }
    }
}
