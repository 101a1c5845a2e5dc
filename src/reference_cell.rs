//! Cell definitions
//!
//! Nedelec elements are only defined here on simplices, so the sub-entity tables below cover the
//! point, interval, triangle and tetrahedron.

use crate::types::ReferenceCellType;
use rlst::RlstScalar;

/// The topological dimension of the cell
pub fn dim(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Point => 0,
        ReferenceCellType::Interval => 1,
        ReferenceCellType::Triangle => 2,
        ReferenceCellType::Quadrilateral => 2,
        ReferenceCellType::Tetrahedron => 3,
        ReferenceCellType::Hexahedron => 3,
        ReferenceCellType::Prism => 3,
        ReferenceCellType::Pyramid => 3,
    }
}

/// The vertices of the reference simplex
///
/// Vertex 0 is the origin and vertex `i > 0` is the `i`th unit vector.
pub fn vertices<T: RlstScalar<Real = T>>(cell: ReferenceCellType) -> Vec<Vec<T>> {
    let d = simplex_dim(cell);
    (0..d + 1)
        .map(|v| {
            (0..d)
                .map(|i| T::from(if v == i + 1 { 1.0 } else { 0.0 }).unwrap())
                .collect()
        })
        .collect()
}

/// The volume (or area, or length) of the reference simplex
pub fn volume(cell: ReferenceCellType) -> f64 {
    match simplex_dim(cell) {
        0 => 0.0,
        1 => 1.0,
        2 => 0.5,
        _ => 1.0 / 6.0,
    }
}

/// The edges of the reference simplex
///
/// Each edge is given by the indices of its two vertices, with the lower index first. Edge `i` of
/// a triangle is opposite vertex `i`.
pub fn edges(cell: ReferenceCellType) -> Vec<[usize; 2]> {
    match simplex_dim(cell) {
        0 => vec![],
        1 => vec![[0, 1]],
        2 => vec![[1, 2], [0, 2], [0, 1]],
        _ => vec![[2, 3], [1, 3], [1, 2], [0, 3], [0, 2], [0, 1]],
    }
}

/// The faces of the reference simplex
///
/// Face `i` of a tetrahedron is opposite vertex `i`.
pub fn faces(cell: ReferenceCellType) -> Vec<Vec<usize>> {
    match simplex_dim(cell) {
        0 | 1 => vec![],
        2 => vec![vec![0, 1, 2]],
        _ => vec![vec![1, 2, 3], vec![0, 2, 3], vec![0, 1, 3], vec![0, 1, 2]],
    }
}

/// The number of subentities of each dimension
pub fn entity_counts(cell: ReferenceCellType) -> [usize; 4] {
    match simplex_dim(cell) {
        0 => [1, 0, 0, 0],
        1 => [2, 1, 0, 0],
        2 => [3, 3, 1, 0],
        _ => [4, 6, 4, 1],
    }
}

fn simplex_dim(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Point
        | ReferenceCellType::Interval
        | ReferenceCellType::Triangle
        | ReferenceCellType::Tetrahedron => dim(cell),
        _ => panic!("Unsupported cell type: {cell}"),
    }
}
