//! Ciarlet finite elements

use crate::polynomials::{
    derivative_count, orthonormalisation, polynomial_count, tabulate_legendre_products,
    tabulate_orthonormal,
};
use crate::reference_cell;
use crate::traits::FiniteElement;
use crate::types::{Continuity, ElementError, ElementResult, MapType, ReferenceCellType};
use log::{debug, trace};
use nalgebra::DMatrix;
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array3, DynamicArray, RandomAccessByRef, RandomAccessMut,
    RlstScalar, Shape,
};
use std::fmt;

pub mod nedelec;
pub use nedelec::NedelecElementFamily;

/// Interpolation points for each sub-entity, indexed by entity dimension then entity number
pub type EntityPoints = [Vec<DynamicArray<f64, 2>>; 4];
/// Interpolation weights for each sub-entity, indexed by entity dimension then entity number
///
/// Each array has shape `[dofs, value size, points]`.
pub type EntityWeights = [Vec<DynamicArray<f64, 3>>; 4];

/// A Ciarlet element
///
/// The basis functions are stored as coefficients of the products of Legendre polynomials
/// tabulated by [crate::polynomials].
pub struct CiarletElement<T: RlstScalar> {
    family_name: &'static str,
    cell_type: ReferenceCellType,
    tdim: usize,
    degree: usize,
    embedded_superdegree: usize,
    embedded_subdegree: usize,
    map_type: MapType,
    value_shape: Vec<usize>,
    value_size: usize,
    continuity: Continuity,
    dim: usize,
    coefficients: DynamicArray<T, 3>,
    entity_dofs: [Vec<Vec<usize>>; 4],
    interpolation_points: EntityPoints,
    interpolation_weights: EntityWeights,
}

/// Orthonormalise the rows of a matrix with modified Gram-Schmidt
fn orthonormalise_rows(matrix: &mut DMatrix<f64>) -> ElementResult<()> {
    let (nrows, ncols) = matrix.shape();
    for i in 0..nrows {
        for j in 0..i {
            let dot = (0..ncols)
                .map(|c| matrix[(i, c)] * matrix[(j, c)])
                .sum::<f64>();
            for c in 0..ncols {
                let v = matrix[(j, c)];
                matrix[(i, c)] -= dot * v;
            }
        }
        let norm = (0..ncols)
            .map(|c| matrix[(i, c)] * matrix[(i, c)])
            .sum::<f64>()
            .sqrt();
        if norm < 1e-10 {
            return Err(ElementError::DependentPolynomials);
        }
        for c in 0..ncols {
            matrix[(i, c)] /= norm;
        }
    }
    Ok(())
}

/// Move all interpolation points and weights onto the interior of the cell
fn merge_into_interior(
    tdim: usize,
    value_size: usize,
    points: EntityPoints,
    weights: EntityWeights,
) -> (EntityPoints, EntityWeights) {
    let npts = points.iter().flatten().map(|p| p.shape()[0]).sum::<usize>();
    let ndofs = weights.iter().flatten().map(|w| w.shape()[0]).sum::<usize>();

    let mut all_pts = rlst_dynamic_array2!(f64, [npts, tdim]);
    let mut all_wts = rlst_dynamic_array3!(f64, [ndofs, value_size, npts]);
    let mut pn = 0;
    let mut dn = 0;
    for (pts, wts) in points.iter().flatten().zip(weights.iter().flatten()) {
        for p in 0..pts.shape()[0] {
            for k in 0..tdim {
                *all_pts.get_mut([pn + p, k]).unwrap() = *pts.get([p, k]).unwrap();
            }
        }
        for i in 0..wts.shape()[0] {
            for j in 0..value_size {
                for p in 0..wts.shape()[2] {
                    *all_wts.get_mut([dn + i, j, pn + p]).unwrap() = *wts.get([i, j, p]).unwrap();
                }
            }
        }
        pn += pts.shape()[0];
        dn += wts.shape()[0];
    }

    let mut new_pts: EntityPoints = [vec![], vec![], vec![], vec![]];
    let mut new_wts: EntityWeights = [vec![], vec![], vec![], vec![]];
    for d in 0..tdim {
        for _ in 0..points[d].len() {
            new_pts[d].push(rlst_dynamic_array2!(f64, [0, tdim]));
            new_wts[d].push(rlst_dynamic_array3!(f64, [0, value_size, 0]));
        }
    }
    new_pts[tdim].push(all_pts);
    new_wts[tdim].push(all_wts);
    (new_pts, new_wts)
}

impl<T: RlstScalar> CiarletElement<T> {
    /// Create a Ciarlet element
    ///
    /// `polynomial_coeffs` has shape `[dim, value size, number of polynomials]` and spans the
    /// element's polynomial set, in terms of the orthonormal polynomials of degree
    /// `embedded_superdegree` from [crate::polynomials::tabulate_legendre_polynomials]. Each
    /// degree of freedom is a weighted sum of point evaluations given by `interpolation_points`
    /// and `interpolation_weights`.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        family_name: &'static str,
        cell_type: ReferenceCellType,
        degree: usize,
        value_shape: Vec<usize>,
        polynomial_coeffs: DynamicArray<f64, 3>,
        interpolation_points: EntityPoints,
        interpolation_weights: EntityWeights,
        map_type: MapType,
        continuity: Continuity,
        embedded_superdegree: usize,
        embedded_subdegree: usize,
    ) -> ElementResult<Self> {
        let tdim = reference_cell::dim(cell_type);
        let pdim = polynomial_count(cell_type, embedded_superdegree)?;
        let value_size = value_shape.iter().product::<usize>();

        for (pts_d, wts_d) in interpolation_points
            .iter()
            .zip(interpolation_weights.iter())
        {
            if pts_d.len() != wts_d.len() {
                return Err(ElementError::IncompatibleValueSize);
            }
            for (pts, wts) in pts_d.iter().zip(wts_d) {
                if wts.shape()[1] != value_size
                    || wts.shape()[2] != pts.shape()[0]
                    || pts.shape()[1] != tdim
                {
                    return Err(ElementError::IncompatibleValueSize);
                }
            }
        }
        if polynomial_coeffs.shape()[1] != value_size || polynomial_coeffs.shape()[2] != pdim {
            return Err(ElementError::IncompatibleValueSize);
        }

        let dim = interpolation_weights
            .iter()
            .flatten()
            .map(|w| w.shape()[0])
            .sum::<usize>();
        if polynomial_coeffs.shape()[0] != dim {
            return Err(ElementError::SingularDualMatrix);
        }

        let (new_pts, new_wts) = if continuity == Continuity::Discontinuous {
            merge_into_interior(tdim, value_size, interpolation_points, interpolation_weights)
        } else {
            (interpolation_points, interpolation_weights)
        };

        let expansion = orthonormalisation(tdim, embedded_superdegree)?;

        // Compute the dual matrix
        let mut d_matrix = DMatrix::<f64>::zeros(value_size * pdim, dim);
        let mut dof = 0;
        for d in 0..4 {
            for (pts, mat) in new_pts[d].iter().zip(&new_wts[d]) {
                if mat.shape()[0] == 0 {
                    continue;
                }
                let mut table = rlst_dynamic_array3!(f64, [1, pdim, pts.shape()[0]]);
                tabulate_orthonormal(
                    tdim,
                    &expansion,
                    pts,
                    embedded_superdegree,
                    0,
                    &mut table,
                );
                for i in 0..mat.shape()[0] {
                    for j in 0..value_size {
                        for l in 0..pdim {
                            let mut value = 0.0;
                            for k in 0..pts.shape()[0] {
                                value +=
                                    *mat.get([i, j, k]).unwrap() * *table.get([0, l, k]).unwrap();
                            }
                            d_matrix[(j * pdim + l, dof + i)] = value;
                        }
                    }
                }
                dof += mat.shape()[0];
            }
        }

        let mut w_matrix = DMatrix::<f64>::from_fn(dim, value_size * pdim, |i, jl| {
            *polynomial_coeffs.get([i, jl / pdim, jl % pdim]).unwrap()
        });
        orthonormalise_rows(&mut w_matrix)?;

        trace!("Inverting {dim}x{dim} dual matrix on a {cell_type}");
        let inverse = (&w_matrix * &d_matrix)
            .try_inverse()
            .ok_or(ElementError::SingularDualMatrix)?;
        let c_matrix = inverse * w_matrix;

        // Rewrite the coefficients in terms of the Legendre products
        let mut coefficients = rlst_dynamic_array3!(T, [dim, value_size, pdim]);
        for i in 0..dim {
            for j in 0..value_size {
                for m in 0..pdim {
                    let value = (m..pdim)
                        .map(|l| c_matrix[(i, j * pdim + l)] * expansion[(l, m)])
                        .sum::<f64>();
                    *coefficients.get_mut([i, j, m]).unwrap() = T::from(value).unwrap();
                }
            }
        }

        let mut entity_dofs = [vec![], vec![], vec![], vec![]];
        let mut dof = 0;
        for (i, wts_i) in new_wts.iter().enumerate() {
            for mat in wts_i {
                entity_dofs[i].push((dof..dof + mat.shape()[0]).collect::<Vec<_>>());
                dof += mat.shape()[0];
            }
        }

        let element = CiarletElement::<T> {
            family_name,
            cell_type,
            tdim,
            degree,
            embedded_superdegree,
            embedded_subdegree,
            map_type,
            value_shape,
            value_size,
            continuity,
            dim,
            coefficients,
            entity_dofs,
            interpolation_points: new_pts,
            interpolation_weights: new_wts,
        };
        debug!("Created {element}");
        Ok(element)
    }

    /// The name of the element family
    pub fn family_name(&self) -> &'static str {
        self.family_name
    }

    /// The interpolation points associated with a subentity of the reference cell
    pub fn interpolation_points(
        &self,
        entity_dim: usize,
        entity_number: usize,
    ) -> Option<&DynamicArray<f64, 2>> {
        self.interpolation_points
            .get(entity_dim)
            .and_then(|pts| pts.get(entity_number))
    }

    /// The interpolation weights associated with a subentity of the reference cell
    ///
    /// The array has shape `[dofs, value size, points]`.
    pub fn interpolation_weights(
        &self,
        entity_dim: usize,
        entity_number: usize,
    ) -> Option<&DynamicArray<f64, 3>> {
        self.interpolation_weights
            .get(entity_dim)
            .and_then(|wts| wts.get(entity_number))
    }
}

impl<T: RlstScalar> FiniteElement for CiarletElement<T> {
    type T = T;
    fn value_shape(&self) -> &[usize] {
        &self.value_shape
    }
    fn value_size(&self) -> usize {
        self.value_size
    }
    fn map_type(&self) -> MapType {
        self.map_type
    }
    fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }
    fn degree(&self) -> usize {
        self.degree
    }
    fn embedded_superdegree(&self) -> usize {
        self.embedded_superdegree
    }
    fn embedded_subdegree(&self) -> usize {
        self.embedded_subdegree
    }
    fn continuity(&self) -> Continuity {
        self.continuity
    }
    fn dim(&self) -> usize {
        self.dim
    }
    fn tabulate<Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>>(
        &self,
        points: &Array2,
        nderivs: usize,
        data: &mut impl RandomAccessMut<4, Item = T>,
    ) {
        let mut table = rlst_dynamic_array3!(
            T,
            [
                derivative_count(self.cell_type, nderivs),
                self.coefficients.shape()[2],
                points.shape()[0]
            ]
        );
        tabulate_legendre_products(
            self.tdim,
            points,
            self.embedded_superdegree,
            nderivs,
            &mut table,
        );

        for d in 0..table.shape()[0] {
            for p in 0..points.shape()[0] {
                for j in 0..self.value_size {
                    for b in 0..self.dim {
                        let mut value = T::from(0.0).unwrap();
                        for i in 0..table.shape()[1] {
                            value += *self.coefficients.get([b, j, i]).unwrap()
                                * *table.get([d, i, p]).unwrap();
                        }
                        *data.get_mut([d, p, b, j]).unwrap() = value;
                    }
                }
            }
        }
    }
    fn entity_dofs(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]> {
        self.entity_dofs
            .get(entity_dim)
            .and_then(|dofs| dofs.get(entity_number))
            .map(|dofs| dofs.as_slice())
    }
}

impl<T: RlstScalar> fmt::Display for CiarletElement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} element on a {}: degree {}, {} basis functions, value shape {:?}, {}, {}",
            self.family_name,
            self.cell_type,
            self.degree,
            self.dim,
            self.value_shape,
            self.map_type,
            self.continuity
        )
    }
}

impl<T: RlstScalar> fmt::Debug for CiarletElement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CiarletElement")
            .field("family", &self.family_name)
            .field("cell_type", &self.cell_type)
            .field("degree", &self.degree)
            .field("dim", &self.dim)
            .field("value_shape", &self.value_shape)
            .field("map_type", &self.map_type)
            .field("continuity", &self.continuity)
            .field("entity_dofs", &self.entity_dofs)
            .finish()
    }
}
