//! Nedelec
//!
//! H(curl)-conforming Nedelec (first kind) finite elements on triangles and tetrahedra.
//!
//! ```
//! use ndnedelec::ciarlet::nedelec;
//! use ndnedelec::traits::FiniteElement;
//! use ndnedelec::types::{Continuity, ReferenceCellType};
//!
//! let element = nedelec::create::<f64>(ReferenceCellType::Triangle, 2, Continuity::Continuous)
//!     .unwrap();
//! assert_eq!(element.dim(), 8);
//! ```
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod ciarlet;
pub mod polynomials;
mod quadrature;
pub mod reference_cell;
pub mod traits;
pub mod types;
