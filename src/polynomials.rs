//! Orthonormal polynomials
//!
//! The expansion set on a simplex starts from products L_p(x) L_q(y) L_r(z) of orthonormal
//! Legendre polynomials on [0, 1] with p + q + r at most the degree, in graded order: all
//! products of total degree 0, then all of total degree 1, and so on. Within a degree the
//! degree in x decreases first, for example 1, x, y, x^2, xy, y^2, ... on a triangle.
//!
//! These products are then orthonormalised on the cell. The change of basis is lower
//! triangular, so the first `polynomial_count(cell, k)` members of any set span the
//! polynomials of degree k.

use crate::quadrature::make_quadrature;
use crate::types::{ElementError, ElementResult, ReferenceCellType};
use nalgebra::DMatrix;
use rlst::{rlst_dynamic_array3, RandomAccessByRef, RandomAccessMut, RlstScalar, Shape};

fn simplex_dim(cell_type: ReferenceCellType) -> ElementResult<usize> {
    match cell_type {
        ReferenceCellType::Interval => Ok(1),
        ReferenceCellType::Triangle => Ok(2),
        ReferenceCellType::Tetrahedron => Ok(3),
        _ => Err(ElementError::UnsupportedCellType(cell_type.to_string())),
    }
}

fn simplex_count(tdim: usize, degree: usize) -> usize {
    match tdim {
        0 => 1,
        1 => degree + 1,
        2 => (degree + 1) * (degree + 2) / 2,
        _ => (degree + 1) * (degree + 2) * (degree + 3) / 6,
    }
}

/// The number of polynomials
pub fn polynomial_count(cell_type: ReferenceCellType, degree: usize) -> ElementResult<usize> {
    Ok(simplex_count(simplex_dim(cell_type)?, degree))
}

/// The total number of partial derivatives up to a give degree
pub fn derivative_count(cell_type: ReferenceCellType, derivatives: usize) -> usize {
    simplex_count(crate::reference_cell::dim(cell_type), derivatives)
}

/// The exponents [p, q, r] of all products of degree at most `degree` in `tdim` variables,
/// in graded order
///
/// The same ordering is used to index partial derivatives.
pub fn monomial_exponents(tdim: usize, degree: usize) -> Vec<[usize; 3]> {
    let mut exponents = Vec::with_capacity(simplex_count(tdim, degree));
    for t in 0..degree + 1 {
        match tdim {
            0 => {
                if t == 0 {
                    exponents.push([0, 0, 0]);
                }
            }
            1 => exponents.push([t, 0, 0]),
            2 => {
                for q in 0..t + 1 {
                    exponents.push([t - q, q, 0]);
                }
            }
            _ => {
                for s in 0..t + 1 {
                    for r in 0..s + 1 {
                        exponents.push([t - s, s - r, r]);
                    }
                }
            }
        }
    }
    exponents
}

/// The shape of a table containing the values of Legendre polynomials
pub fn legendre_shape<T, Array2: RandomAccessByRef<2, Item = T> + Shape<2>>(
    cell_type: ReferenceCellType,
    points: &Array2,
    degree: usize,
    derivatives: usize,
) -> ElementResult<[usize; 3]> {
    Ok([
        derivative_count(cell_type, derivatives),
        polynomial_count(cell_type, degree)?,
        points.shape()[0],
    ])
}

/// Tabulate orthonormal polynomials on [0, 1] at a single coordinate
///
/// Entry `[k][p]` is the k-th derivative of the degree p polynomial.
fn tabulate_legendre_interval<T: RlstScalar>(
    x: T,
    degree: usize,
    derivatives: usize,
) -> Vec<Vec<T>> {
    let mut values = vec![vec![T::from(0.0).unwrap(); degree + 1]; derivatives + 1];
    values[0][0] = T::from(1.0).unwrap();

    for k in 0..derivatives + 1 {
        for p in 1..degree + 1 {
            let a = T::from(1.0).unwrap() - T::from(1.0).unwrap() / T::from(p).unwrap();
            let b = (a + T::from(1.0).unwrap())
                * (T::from(2 * p + 1).unwrap() / T::from(2 * p - 1).unwrap()).sqrt();
            let mut value =
                (x * T::from(2.0).unwrap() - T::from(1.0).unwrap()) * values[k][p - 1] * b;
            if p > 1 {
                let c = a * (T::from(2 * p + 1).unwrap() / T::from(2 * p - 3).unwrap()).sqrt();
                value -= values[k][p - 2] * c;
            }
            if k > 0 {
                value += T::from(2 * k).unwrap() * values[k - 1][p - 1] * b;
            }
            values[k][p] = value;
        }
    }
    values
}

/// Tabulate products of Legendre polynomials and their derivatives on a simplex of dimension
/// `tdim`
///
/// The data is indexed as `[derivative, product, point]`.
pub(crate) fn tabulate_legendre_products<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + Shape<3>,
>(
    tdim: usize,
    points: &Array2,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) {
    let powers = monomial_exponents(tdim, degree);
    let derivs = monomial_exponents(tdim, derivatives);
    assert_eq!(data.shape()[0], derivs.len());
    assert_eq!(data.shape()[1], powers.len());
    assert_eq!(data.shape()[2], points.shape()[0]);
    assert_eq!(points.shape()[1], tdim);

    for i in 0..points.shape()[0] {
        let factors = (0..tdim)
            .map(|j| {
                tabulate_legendre_interval(
                    T::from(*points.get([i, j]).unwrap()).unwrap(),
                    degree,
                    derivatives,
                )
            })
            .collect::<Vec<_>>();
        for (k, d) in derivs.iter().enumerate() {
            for (m, p) in powers.iter().enumerate() {
                let mut value = T::from(1.0).unwrap();
                for (j, f) in factors.iter().enumerate() {
                    value *= f[d[j]][p[j]];
                }
                *data.get_mut([k, m, i]).unwrap() = value;
            }
        }
    }
}

/// The lower triangular matrix whose rows express the orthonormal polynomials on a simplex in
/// terms of products of Legendre polynomials
pub(crate) fn orthonormalisation(tdim: usize, degree: usize) -> ElementResult<DMatrix<f64>> {
    let rule = make_quadrature(tdim, degree + 1);
    let points = rule.point_array();
    let n = simplex_count(tdim, degree);
    let mut table = rlst_dynamic_array3!(f64, [1, n, rule.npoints]);
    tabulate_legendre_products(tdim, &points, degree, 0, &mut table);

    let gram = DMatrix::<f64>::from_fn(n, n, |a, b| {
        rule.weights
            .iter()
            .enumerate()
            .map(|(p, w)| w * *table.get([0, a, p]).unwrap() * *table.get([0, b, p]).unwrap())
            .sum::<f64>()
    });
    gram.cholesky()
        .and_then(|factor| factor.l().try_inverse())
        .ok_or(ElementError::DependentPolynomials)
}

/// Tabulate orthonormal polynomials given the change of basis from [orthonormalisation]
pub(crate) fn tabulate_orthonormal<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + Shape<3>,
>(
    tdim: usize,
    expansion: &DMatrix<f64>,
    points: &Array2,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) {
    let mut products = rlst_dynamic_array3!(T, data.shape());
    tabulate_legendre_products(tdim, points, degree, derivatives, &mut products);

    for k in 0..products.shape()[0] {
        for a in 0..products.shape()[1] {
            for p in 0..products.shape()[2] {
                let mut value = T::from(0.0).unwrap();
                for b in 0..a + 1 {
                    value +=
                        T::from(expansion[(a, b)]).unwrap() * *products.get([k, b, p]).unwrap();
                }
                *data.get_mut([k, a, p]).unwrap() = value;
            }
        }
    }
}

/// Tabulate orthonormal polynomials
///
/// The data is indexed as `[derivative, polynomial, point]`.
pub fn tabulate_legendre_polynomials<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + Shape<3>,
>(
    cell_type: ReferenceCellType,
    points: &Array2,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) -> ElementResult<()> {
    let tdim = simplex_dim(cell_type)?;
    let expansion = orthonormalisation(tdim, degree)?;
    tabulate_orthonormal(tdim, &expansion, points, degree, derivatives, data);
    Ok(())
}
