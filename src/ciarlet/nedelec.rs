//! Nedelec elements of the first kind

use super::{CiarletElement, EntityPoints, EntityWeights};
use crate::polynomials::{monomial_exponents, polynomial_count, tabulate_legendre_polynomials};
use crate::quadrature::make_quadrature;
use crate::reference_cell;
use crate::traits::ElementFamily;
use crate::types::{Continuity, ElementError, ElementResult, MapType, ReferenceCellType};
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array3, DynamicArray, RandomAccessByRef, RandomAccessMut,
    RlstScalar,
};
use std::marker::PhantomData;

/// The name used when displaying Nedelec elements
pub const FAMILY_NAME: &str = "Nedelec (first kind)";

/// The highest degree supported on a cell, or `None` if the cell is not supported
pub fn max_degree(cell_type: ReferenceCellType) -> Option<usize> {
    match cell_type {
        ReferenceCellType::Triangle => Some(5),
        ReferenceCellType::Tetrahedron => Some(4),
        _ => None,
    }
}

/// The number of basis functions of the degree `degree` element on a simplex of dimension `tdim`
pub fn dimension(tdim: usize, degree: usize) -> usize {
    match tdim {
        2 => degree * (degree + 2),
        3 => degree * (degree + 2) * (degree + 3) / 2,
        _ => 0,
    }
}

/// The coefficients spanning (P_{k-1})^d + S_k, where S_k is the set of homogeneous
/// degree k vector polynomials p with p.x = 0
///
/// The coefficients are taken against the orthonormal polynomials of degree k.
fn polynomial_set(
    cell_type: ReferenceCellType,
    degree: usize,
) -> ElementResult<DynamicArray<f64, 3>> {
    let tdim = reference_cell::dim(cell_type);
    let pdim = polynomial_count(cell_type, degree)?;
    let nlow = polynomial_count(cell_type, degree - 1)?;
    let mut wcoeffs = rlst_dynamic_array3!(f64, [dimension(tdim, degree), tdim, pdim]);

    for d in 0..tdim {
        for i in 0..nlow {
            *wcoeffs.get_mut([d * nlow + i, d, i]).unwrap() = 1.0;
        }
    }

    // Each field is q times a list of (component, axis, sign) terms
    let homogeneous = monomial_exponents(tdim, degree - 1)
        .into_iter()
        .filter(|e| e.iter().sum::<usize>() == degree - 1)
        .collect::<Vec<_>>();
    let mut fields = vec![];
    if tdim == 2 {
        // (-y q, x q)
        for q in &homogeneous {
            fields.push((*q, [(0, 1, -1.0), (1, 0, 1.0)]));
        }
    } else {
        // (0, z q, -y q)
        for q in &homogeneous {
            fields.push((*q, [(1, 2, 1.0), (2, 1, -1.0)]));
        }
        // (z q, 0, -x q)
        for q in &homogeneous {
            fields.push((*q, [(0, 2, 1.0), (2, 0, -1.0)]));
        }
        // (y q, -x q, 0) for q independent of z: the others are combinations of the rows above
        for q in homogeneous.iter().filter(|q| q[2] == 0) {
            fields.push((*q, [(0, 1, 1.0), (1, 0, -1.0)]));
        }
    }
    debug_assert_eq!(tdim * nlow + fields.len(), dimension(tdim, degree));

    // Project the fields onto the orthonormal polynomials
    let rule = make_quadrature(tdim, degree + 1);
    let mut table = rlst_dynamic_array3!(f64, [1, pdim, rule.npoints]);
    tabulate_legendre_polynomials(cell_type, &rule.point_array(), degree, 0, &mut table)?;
    for (n, (q, terms)) in fields.iter().enumerate() {
        let row = tdim * nlow + n;
        for p in 0..rule.npoints {
            let x = rule.point(p);
            let q_value = x
                .iter()
                .zip(q)
                .map(|(xj, e)| xj.powi(*e as i32))
                .product::<f64>();
            for (component, axis, sign) in terms {
                let value = rule.weights[p] * sign * x[*axis] * q_value;
                for l in 0..pdim {
                    *wcoeffs.get_mut([row, *component, l]).unwrap() +=
                        value * *table.get([0, l, p]).unwrap();
                }
            }
        }
    }
    Ok(wcoeffs)
}

/// Integral moments of the tangential components against orthonormal polynomials on a
/// sub-simplex
///
/// For a sub-simplex with vertices v_0, ..., v_s, the tangents are t_a = v_{a+1} - v_0 and the
/// functionals are the integrals of v.t_a q over the sub-simplex (in its own coordinates),
/// for every orthonormal polynomial q of degree at most `moment_degree`.
fn tangential_moments(
    vertices: &[Vec<f64>],
    sub_entity: &[usize],
    degree: usize,
    moment_degree: Option<usize>,
) -> ElementResult<(DynamicArray<f64, 2>, DynamicArray<f64, 3>)> {
    let tdim = vertices[0].len();
    let sdim = sub_entity.len() - 1;
    let Some(moment_degree) = moment_degree else {
        return Ok((
            rlst_dynamic_array2!(f64, [0, tdim]),
            rlst_dynamic_array3!(f64, [0, tdim, 0]),
        ));
    };
    let sub_cell = match sdim {
        1 => ReferenceCellType::Interval,
        2 => ReferenceCellType::Triangle,
        _ => ReferenceCellType::Tetrahedron,
    };

    let origin = &vertices[sub_entity[0]];
    let tangents = sub_entity[1..]
        .iter()
        .map(|v| {
            vertices[*v]
                .iter()
                .zip(origin)
                .map(|(a, b)| a - b)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let rule = make_quadrature(sdim, degree);
    let mut pts = rlst_dynamic_array2!(f64, [rule.npoints, tdim]);
    for p in 0..rule.npoints {
        for j in 0..tdim {
            *pts.get_mut([p, j]).unwrap() = origin[j]
                + rule
                    .point(p)
                    .iter()
                    .zip(&tangents)
                    .map(|(s, t)| s * t[j])
                    .sum::<f64>();
        }
    }

    let nmoments = polynomial_count(sub_cell, moment_degree)?;
    let mut table = rlst_dynamic_array3!(f64, [1, nmoments, rule.npoints]);
    tabulate_legendre_polynomials(
        sub_cell,
        &rule.point_array(),
        moment_degree,
        0,
        &mut table,
    )?;

    let mut mat = rlst_dynamic_array3!(f64, [nmoments * sdim, tdim, rule.npoints]);
    for n in 0..nmoments {
        for p in 0..rule.npoints {
            let q_value = *table.get([0, n, p]).unwrap();
            for (a, t) in tangents.iter().enumerate() {
                for j in 0..tdim {
                    *mat.get_mut([n * sdim + a, j, p]).unwrap() =
                        rule.weights[p] * q_value * t[j];
                }
            }
        }
    }
    Ok((pts, mat))
}

/// Create a Nedelec (first kind) element
pub fn create<T: RlstScalar>(
    cell_type: ReferenceCellType,
    degree: usize,
    continuity: Continuity,
) -> ElementResult<CiarletElement<T>> {
    let max = max_degree(cell_type)
        .ok_or_else(|| ElementError::UnsupportedCellType(cell_type.to_string()))?;
    if degree == 0 || degree > max {
        return Err(ElementError::UnsupportedOrder {
            cell: cell_type,
            degree: i64::try_from(degree).unwrap_or(i64::MAX),
            max,
        });
    }

    let tdim = reference_cell::dim(cell_type);
    let wcoeffs = polynomial_set(cell_type, degree)?;

    let vertices = reference_cell::vertices::<f64>(cell_type);
    let mut x: EntityPoints = [vec![], vec![], vec![], vec![]];
    let mut m: EntityWeights = [vec![], vec![], vec![], vec![]];
    for v in 0..vertices.len() {
        let (pts, mat) = tangential_moments(&vertices, &[v], degree, None)?;
        x[0].push(pts);
        m[0].push(mat);
    }
    for edge in reference_cell::edges(cell_type) {
        let (pts, mat) = tangential_moments(&vertices, &edge, degree, Some(degree - 1))?;
        x[1].push(pts);
        m[1].push(mat);
    }
    for face in reference_cell::faces(cell_type) {
        let (pts, mat) = tangential_moments(&vertices, &face, degree, degree.checked_sub(2))?;
        x[2].push(pts);
        m[2].push(mat);
    }
    if tdim == 3 {
        let (pts, mat) =
            tangential_moments(&vertices, &[0, 1, 2, 3], degree, degree.checked_sub(3))?;
        x[3].push(pts);
        m[3].push(mat);
    }

    CiarletElement::create(
        FAMILY_NAME,
        cell_type,
        degree,
        vec![tdim],
        wcoeffs,
        x,
        m,
        MapType::CovariantPiola,
        continuity,
        degree,
        degree - 1,
    )
}

/// Create a Nedelec (first kind) element from a signed order
///
/// Negative orders are reported as [ElementError::UnsupportedOrder].
pub fn create_from_order<T: RlstScalar>(
    cell_type: ReferenceCellType,
    order: i64,
    continuity: Continuity,
) -> ElementResult<CiarletElement<T>> {
    let max = max_degree(cell_type)
        .ok_or_else(|| ElementError::UnsupportedCellType(cell_type.to_string()))?;
    let degree = usize::try_from(order).map_err(|_| ElementError::UnsupportedOrder {
        cell: cell_type,
        degree: order,
        max,
    })?;
    create(cell_type, degree, continuity)
}

/// Nedelec (first kind) element family
pub struct NedelecElementFamily<T: RlstScalar> {
    degree: usize,
    continuity: Continuity,
    _t: PhantomData<T>,
}

impl<T: RlstScalar> NedelecElementFamily<T> {
    /// Create new family
    pub fn new(degree: usize, continuity: Continuity) -> Self {
        Self {
            degree,
            continuity,
            _t: PhantomData,
        }
    }
}

impl<T: RlstScalar> ElementFamily for NedelecElementFamily<T> {
    type T = T;
    type FiniteElement = CiarletElement<T>;
    fn element(&self, cell_type: ReferenceCellType) -> ElementResult<CiarletElement<T>> {
        create::<T>(cell_type, self.degree, self.continuity)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::FiniteElement;
    use approx::*;
    use paste::paste;
    use rlst::{rlst_dynamic_array4, RandomAccessByRef, Shape};

    fn check_dofs(e: &CiarletElement<f64>) {
        let mut ndofs = 0;
        for (dim, entity_count) in reference_cell::entity_counts(e.cell_type())
            .iter()
            .enumerate()
        {
            for entity in 0..*entity_count {
                for dof in e.entity_dofs(dim, entity).unwrap() {
                    assert_eq!(*dof, ndofs);
                    ndofs += 1;
                }
            }
        }
        assert_eq!(ndofs, e.dim());
    }

    /// Apply each degree of freedom to each basis function
    fn check_duality(e: &CiarletElement<f64>) {
        let counts = reference_cell::entity_counts(e.cell_type());
        for (dim, count) in counts.iter().enumerate() {
            for entity in 0..*count {
                let pts = e.interpolation_points(dim, entity).unwrap();
                let wts = e.interpolation_weights(dim, entity).unwrap();
                let dofs = e.entity_dofs(dim, entity).unwrap();
                assert_eq!(dofs.len(), wts.shape()[0]);
                if dofs.is_empty() {
                    continue;
                }
                let mut data =
                    rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, pts.shape()[0]));
                e.tabulate(pts, 0, &mut data);
                for (i, dof) in dofs.iter().enumerate() {
                    for b in 0..e.dim() {
                        let mut value = 0.0;
                        for j in 0..e.value_size() {
                            for p in 0..pts.shape()[0] {
                                value += *wts.get([i, j, p]).unwrap() * data[[0, p, b, j]];
                            }
                        }
                        let expected = if b == *dof { 1.0 } else { 0.0 };
                        assert_relative_eq!(value, expected, epsilon = 1e-9);
                    }
                }
            }
        }
    }

    /// The tangential components on a sub-entity only depend on the DOFs of that sub-entity
    /// and its boundary
    fn check_tangential_continuity(e: &CiarletElement<f64>) {
        let cell = e.cell_type();
        let tdim = reference_cell::dim(cell);
        let vertices = reference_cell::vertices::<f64>(cell);
        let edges = reference_cell::edges(cell);
        let mut sub_entities = edges
            .iter()
            .enumerate()
            .map(|(i, edge)| (edge.to_vec(), vec![e.entity_dofs(1, i).unwrap().to_vec()]))
            .collect::<Vec<_>>();
        if tdim == 3 {
            for (i, face) in reference_cell::faces(cell).iter().enumerate() {
                let mut dofs = vec![e.entity_dofs(2, i).unwrap().to_vec()];
                for (j, edge) in edges.iter().enumerate() {
                    if face.contains(&edge[0]) && face.contains(&edge[1]) {
                        dofs.push(e.entity_dofs(1, j).unwrap().to_vec());
                    }
                }
                sub_entities.push((face.clone(), dofs));
            }
        }

        let params = [[0.15, 0.1], [0.4, 0.35], [0.7, 0.2], [0.05, 0.8]];
        for (sub, dofs) in &sub_entities {
            let dofs = dofs.iter().flatten().copied().collect::<Vec<_>>();
            let origin = &vertices[sub[0]];
            let tangents = sub[1..]
                .iter()
                .map(|v| {
                    (0..tdim)
                        .map(|j| vertices[*v][j] - origin[j])
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();

            let mut points = rlst_dynamic_array2!(f64, [params.len(), tdim]);
            for (p, s) in params.iter().enumerate() {
                for j in 0..tdim {
                    points[[p, j]] = origin[j];
                    for (a, t) in tangents.iter().enumerate() {
                        points[[p, j]] += s[a] * t[j];
                    }
                }
            }
            let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, params.len()));
            e.tabulate(&points, 0, &mut data);

            for b in (0..e.dim()).filter(|b| !dofs.contains(b)) {
                for p in 0..params.len() {
                    for t in &tangents {
                        let value = (0..tdim).map(|j| data[[0, p, b, j]] * t[j]).sum::<f64>();
                        assert_relative_eq!(value, 0.0, epsilon = 1e-9);
                    }
                }
            }
        }
    }

    macro_rules! test_nedelec {
        ($($cell:ident, $degree:expr),+) => {
        $(
            paste! {
                #[test]
                fn [<test_nedelec_ $degree _ $cell:lower>]() {
                    let e = create::<f64>(ReferenceCellType::[<$cell>], $degree, Continuity::Continuous).unwrap();
                    let tdim = reference_cell::dim(ReferenceCellType::[<$cell>]);
                    assert_eq!(e.value_size(), tdim);
                    assert_eq!(e.value_shape(), &[tdim]);
                    assert_eq!(e.map_type(), MapType::CovariantPiola);
                    assert_eq!(e.dim(), dimension(tdim, $degree));
                    assert_eq!(e.embedded_superdegree(), $degree);
                    assert_eq!(e.embedded_subdegree(), $degree - 1);
                    for edge in 0..reference_cell::entity_counts(e.cell_type())[1] {
                        assert_eq!(e.entity_dofs(1, edge).unwrap().len(), $degree);
                    }
                    check_dofs(&e);
                    check_duality(&e);
                    check_tangential_continuity(&e);
                }

                #[test]
                fn [<test_nedelec_ $degree _ $cell:lower _discontinuous>]() {
                    let e = create::<f64>(ReferenceCellType::[<$cell>], $degree, Continuity::Discontinuous).unwrap();
                    let tdim = reference_cell::dim(ReferenceCellType::[<$cell>]);
                    assert_eq!(e.continuity(), Continuity::Discontinuous);
                    assert_eq!(e.entity_dofs(tdim, 0).unwrap().len(), e.dim());
                    for edge in 0..reference_cell::entity_counts(e.cell_type())[1] {
                        assert!(e.entity_dofs(1, edge).unwrap().is_empty());
                    }
                    check_dofs(&e);
                    check_duality(&e);
                }
            }
        )*
        };
    }

    test_nedelec!(
        Triangle, 1,
        Triangle, 2,
        Triangle, 3,
        Triangle, 4,
        Triangle, 5,
        Tetrahedron, 1,
        Tetrahedron, 2,
        Tetrahedron, 3,
        Tetrahedron, 4
    );

    #[test]
    fn test_dimensions() {
        for (degree, tri, tet) in [(1, 3, 6), (2, 8, 20), (3, 15, 45)] {
            assert_eq!(dimension(2, degree), tri);
            assert_eq!(dimension(3, degree), tet);
        }
    }

    #[test]
    fn test_entity_dof_counts_tetrahedron_3() {
        let e = create::<f64>(ReferenceCellType::Tetrahedron, 3, Continuity::Continuous).unwrap();
        for v in 0..4 {
            assert!(e.entity_dofs(0, v).unwrap().is_empty());
        }
        for edge in 0..6 {
            assert_eq!(e.entity_dofs(1, edge).unwrap().len(), 3);
        }
        for face in 0..4 {
            assert_eq!(e.entity_dofs(2, face).unwrap().len(), 6);
        }
        assert_eq!(e.entity_dofs(3, 0).unwrap().len(), 3);
    }

    #[test]
    fn test_nedelec_1_triangle_values() {
        let e = create::<f64>(ReferenceCellType::Triangle, 1, Continuity::Continuous).unwrap();
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(1, 6));
        let mut points = rlst_dynamic_array2!(f64, [6, 2]);
        points[[0, 0]] = 0.0;
        points[[0, 1]] = 0.0;
        points[[1, 0]] = 1.0;
        points[[1, 1]] = 0.0;
        points[[2, 0]] = 0.0;
        points[[2, 1]] = 1.0;
        points[[3, 0]] = 0.5;
        points[[3, 1]] = 0.0;
        points[[4, 0]] = 0.0;
        points[[4, 1]] = 0.5;
        points[[5, 0]] = 0.3;
        points[[5, 1]] = 0.2;
        e.tabulate(&points, 1, &mut data);

        for pt in 0..6 {
            let x = points[[pt, 0]];
            let y = points[[pt, 1]];
            assert_relative_eq!(data[[0, pt, 0, 0]], -y, epsilon = 1e-12);
            assert_relative_eq!(data[[0, pt, 0, 1]], x, epsilon = 1e-12);
            assert_relative_eq!(data[[0, pt, 1, 0]], y, epsilon = 1e-12);
            assert_relative_eq!(data[[0, pt, 1, 1]], 1.0 - x, epsilon = 1e-12);
            assert_relative_eq!(data[[0, pt, 2, 0]], 1.0 - y, epsilon = 1e-12);
            assert_relative_eq!(data[[0, pt, 2, 1]], x, epsilon = 1e-12);

            // d/dx
            assert_relative_eq!(data[[1, pt, 0, 1]], 1.0, epsilon = 1e-12);
            assert_relative_eq!(data[[1, pt, 1, 1]], -1.0, epsilon = 1e-12);
            assert_relative_eq!(data[[1, pt, 2, 0]], 0.0, epsilon = 1e-12);
            // d/dy
            assert_relative_eq!(data[[2, pt, 0, 0]], -1.0, epsilon = 1e-12);
            assert_relative_eq!(data[[2, pt, 1, 0]], 1.0, epsilon = 1e-12);
            assert_relative_eq!(data[[2, pt, 2, 0]], -1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_nedelec_1_tetrahedron_values() {
        let e = create::<f64>(ReferenceCellType::Tetrahedron, 1, Continuity::Continuous).unwrap();
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, 4));
        let mut points = rlst_dynamic_array2!(f64, [4, 3]);
        let coords = [
            [0.0, 0.0, 0.0],
            [0.2, 0.3, 0.1],
            [0.5, 0.0, 0.5],
            [0.1, 0.6, 0.25],
        ];
        for (i, c) in coords.iter().enumerate() {
            for j in 0..3 {
                points[[i, j]] = c[j];
            }
        }
        e.tabulate(&points, 0, &mut data);

        for (pt, [x, y, z]) in coords.iter().enumerate() {
            let expected = [
                [0.0, -z, *y],
                [-z, 0.0, *x],
                [-y, *x, 0.0],
                [*z, *z, 1.0 - x - y],
                [*y, 1.0 - x - z, *y],
                [1.0 - y - z, *x, *x],
            ];
            for (b, values) in expected.iter().enumerate() {
                for (j, v) in values.iter().enumerate() {
                    assert_relative_eq!(data[[0, pt, b, j]], *v, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_nedelec_3_tetrahedron_derivatives() {
        let e = create::<f64>(ReferenceCellType::Tetrahedron, 3, Continuity::Continuous).unwrap();
        let epsilon = 1e-8;
        let base = [0.15, 0.25, 0.3];
        let mut points = rlst_dynamic_array2!(f64, [4, 3]);
        for i in 0..4 {
            for j in 0..3 {
                points[[i, j]] = base[j];
            }
            if i > 0 {
                points[[i, i - 1]] += epsilon;
            }
        }
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(1, 4));
        e.tabulate(&points, 1, &mut data);

        for b in 0..e.dim() {
            for j in 0..3 {
                for d in 0..3 {
                    assert_relative_eq!(
                        data[[d + 1, 0, b, j]],
                        (data[[0, d + 1, b, j]] - data[[0, 0, b, j]]) / epsilon,
                        epsilon = 1e-4
                    );
                }
            }
        }
    }

    #[test]
    fn test_unsupported_cell_types() {
        for cell in [
            ReferenceCellType::Point,
            ReferenceCellType::Interval,
            ReferenceCellType::Quadrilateral,
            ReferenceCellType::Hexahedron,
            ReferenceCellType::Prism,
            ReferenceCellType::Pyramid,
        ] {
            assert_eq!(
                create::<f64>(cell, 1, Continuity::Continuous).err(),
                Some(ElementError::UnsupportedCellType(cell.to_string()))
            );
        }
    }

    #[test]
    fn test_unsupported_orders() {
        assert_eq!(
            create::<f64>(ReferenceCellType::Triangle, 0, Continuity::Continuous).err(),
            Some(ElementError::UnsupportedOrder {
                cell: ReferenceCellType::Triangle,
                degree: 0,
                max: 5
            })
        );
        assert_eq!(
            create::<f64>(ReferenceCellType::Tetrahedron, 5, Continuity::Continuous).err(),
            Some(ElementError::UnsupportedOrder {
                cell: ReferenceCellType::Tetrahedron,
                degree: 5,
                max: 4
            })
        );
    }

    #[test]
    fn test_signed_orders() {
        for order in [-1, -7, i64::MIN] {
            assert_eq!(
                create_from_order::<f64>(ReferenceCellType::Triangle, order, Continuity::Continuous)
                    .err(),
                Some(ElementError::UnsupportedOrder {
                    cell: ReferenceCellType::Triangle,
                    degree: order,
                    max: 5
                })
            );
        }
        assert_eq!(
            create_from_order::<f64>(ReferenceCellType::Tetrahedron, 0, Continuity::Continuous)
                .err(),
            Some(ElementError::UnsupportedOrder {
                cell: ReferenceCellType::Tetrahedron,
                degree: 0,
                max: 4
            })
        );
        assert_eq!(
            create_from_order::<f64>(ReferenceCellType::Prism, -1, Continuity::Continuous).err(),
            Some(ElementError::UnsupportedCellType("prism".to_string()))
        );
        let e = create_from_order::<f64>(ReferenceCellType::Tetrahedron, 2, Continuity::Continuous)
            .unwrap();
        assert_eq!(e.dim(), 20);
    }

    #[test]
    fn test_family() {
        let family = NedelecElementFamily::<f64>::new(2, Continuity::Continuous);
        let e = family.element(ReferenceCellType::Triangle).unwrap();
        assert_eq!(e.cell_type(), ReferenceCellType::Triangle);
        assert_eq!(e.degree(), 2);
        let e = family.element(ReferenceCellType::Tetrahedron).unwrap();
        assert_eq!(e.dim(), 20);
        assert!(family.element(ReferenceCellType::Hexahedron).is_err());
    }
}
