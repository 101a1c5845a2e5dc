//! Type definitions
use std::fmt;
use std::str::FromStr;

/// The type of a reference cell
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum ReferenceCellType {
    /// A point
    Point = 0,
    /// A line interval
    Interval = 1,
    /// A triangle
    Triangle = 2,
    /// A quadrilateral
    Quadrilateral = 3,
    /// A tetrahedron (whose faces are all triangles)
    Tetrahedron = 4,
    /// A hexahedron (whose faces are all quadrilaterals)
    Hexahedron = 5,
    /// A triangular prism
    Prism = 6,
    /// A square-based pyramid
    Pyramid = 7,
}

impl ReferenceCellType {
    /// Create a reference cell type from a u8
    pub fn from_u8(i: u8) -> Option<ReferenceCellType> {
        match i {
            0 => Some(ReferenceCellType::Point),
            1 => Some(ReferenceCellType::Interval),
            2 => Some(ReferenceCellType::Triangle),
            3 => Some(ReferenceCellType::Quadrilateral),
            4 => Some(ReferenceCellType::Tetrahedron),
            5 => Some(ReferenceCellType::Hexahedron),
            6 => Some(ReferenceCellType::Prism),
            7 => Some(ReferenceCellType::Pyramid),
            _ => None,
        }
    }

    /// The lower-case name of the cell
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceCellType::Point => "point",
            ReferenceCellType::Interval => "interval",
            ReferenceCellType::Triangle => "triangle",
            ReferenceCellType::Quadrilateral => "quadrilateral",
            ReferenceCellType::Tetrahedron => "tetrahedron",
            ReferenceCellType::Hexahedron => "hexahedron",
            ReferenceCellType::Prism => "prism",
            ReferenceCellType::Pyramid => "pyramid",
        }
    }
}

impl fmt::Display for ReferenceCellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ReferenceCellType {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "point" => Ok(ReferenceCellType::Point),
            "interval" => Ok(ReferenceCellType::Interval),
            "triangle" => Ok(ReferenceCellType::Triangle),
            "quadrilateral" => Ok(ReferenceCellType::Quadrilateral),
            "tetrahedron" => Ok(ReferenceCellType::Tetrahedron),
            "hexahedron" => Ok(ReferenceCellType::Hexahedron),
            "prism" => Ok(ReferenceCellType::Prism),
            "pyramid" => Ok(ReferenceCellType::Pyramid),
            _ => Err(ElementError::UnsupportedCellType(s.to_string())),
        }
    }
}

/// Continuity type
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum Continuity {
    /// Degrees of freedom are shared with neighbouring cells through their sub-entities
    ///
    /// For H(curl) elements only the tangential components agree across a shared edge or face.
    Continuous = 0,
    /// The element is discontinuous between cells
    Discontinuous = 1,
}

impl fmt::Display for Continuity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Continuity::Continuous => write!(f, "continuous"),
            Continuity::Discontinuous => write!(f, "discontinuous"),
        }
    }
}

/// The map type used by an element
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum MapType {
    /// Identity map
    Identity = 0,
    /// Covariant Piola map
    ///
    /// This map is used by H(curl) elements
    CovariantPiola = 1,
    /// Contravariant Piola map
    ///
    /// This map is used by H(div) elements
    ContravariantPiola = 2,
    /// L2 Piola map
    L2Piola = 3,
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapType::Identity => write!(f, "identity map"),
            MapType::CovariantPiola => write!(f, "covariant Piola map"),
            MapType::ContravariantPiola => write!(f, "contravariant Piola map"),
            MapType::L2Piola => write!(f, "L2 Piola map"),
        }
    }
}

/// Errors raised while creating or evaluating an element
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    /// The cell type is not recognised or not supported by the element family
    #[error("Unsupported cell type: {0}")]
    UnsupportedCellType(String),
    /// The order is outside the supported range for the cell type
    #[error("Unsupported order {degree} on a {cell} (supported orders are 1 to {max})")]
    UnsupportedOrder {
        /// The cell type
        cell: ReferenceCellType,
        /// The requested order
        degree: i64,
        /// The highest supported order
        max: usize,
    },
    /// The interpolation weights do not match the value shape
    #[error("Incompatible value size")]
    IncompatibleValueSize,
    /// The degrees of freedom are not unisolvent on the polynomial set
    #[error("Singular dual matrix")]
    SingularDualMatrix,
    /// The polynomials spanning an element are not linearly independent
    #[error("Polynomial set is linearly dependent")]
    DependentPolynomials,
}

/// Result type
pub type ElementResult<T> = Result<T, ElementError>;
