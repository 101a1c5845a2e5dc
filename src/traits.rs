//! Trait definitions

use crate::polynomials::derivative_count;
use crate::types::{Continuity, ElementResult, MapType, ReferenceCellType};
use rlst::{RandomAccessByRef, RandomAccessMut, RlstScalar, Shape};

/// A finite element defined on a reference cell
pub trait FiniteElement {
    /// The scalar type
    type T: RlstScalar;

    /// The reference cell type
    fn cell_type(&self) -> ReferenceCellType;

    /// The polynomial degree used to name the element
    fn degree(&self) -> usize;

    /// The highest degree n such that a Lagrange (or vector Lagrange) element of degree n is a
    /// subspace of this element
    fn embedded_subdegree(&self) -> usize;

    /// The lowest degree n such that the highest degree polynomial in this element is contained
    /// in a Lagrange (or vector Lagrange) element of degree n
    fn embedded_superdegree(&self) -> usize;

    /// The number of basis functions
    fn dim(&self) -> usize;

    /// The shape of the values returned by functions in this element
    fn value_shape(&self) -> &[usize];

    /// The number of values returned
    fn value_size(&self) -> usize;

    /// The continuity of the element between cells
    fn continuity(&self) -> Continuity;

    /// The push forward / pull back map to use for this element
    fn map_type(&self) -> MapType;

    /// Tabulate the values of the basis functions and their derivatives at a set of points
    ///
    /// The data is indexed as `[derivative, point, basis function, value component]`.
    /// Derivatives are stored in triangular (2D) or tetrahedral (3D) ordering,
    /// i.e. for the (x, y) derivatives in 2D: (0,0), (1,0), (0,1), (2,0), (1,1), (0,2), ...
    fn tabulate<Array2: RandomAccessByRef<2, Item = <Self::T as RlstScalar>::Real> + Shape<2>>(
        &self,
        points: &Array2,
        nderivs: usize,
        data: &mut impl RandomAccessMut<4, Item = Self::T>,
    );

    /// The DOFs that are associated with a subentity of the reference cell
    fn entity_dofs(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]>;

    /// The shape of an array that [FiniteElement::tabulate] fills
    fn tabulate_array_shape(&self, nderivs: usize, npoints: usize) -> [usize; 4] {
        [
            derivative_count(self.cell_type(), nderivs),
            npoints,
            self.dim(),
            self.value_size(),
        ]
    }
}

/// A family of finite elements defined on various cells
pub trait ElementFamily {
    /// The scalar type
    type T: RlstScalar;
    /// The type of the elements in this family
    type FiniteElement: FiniteElement<T = Self::T>;

    /// Get the element on a cell
    fn element(&self, cell_type: ReferenceCellType) -> ElementResult<Self::FiniteElement>;
}
