use ndnedelec::ciarlet::nedelec;
use ndnedelec::traits::FiniteElement;
use ndnedelec::types::{Continuity, ReferenceCellType};
use rlst::{rlst_dynamic_array2, rlst_dynamic_array4};

fn main() {
    // Create Nedelec elements of each supported cell type and degree
    for cell in [ReferenceCellType::Triangle, ReferenceCellType::Tetrahedron] {
        for degree in 1..4 {
            let element = nedelec::create::<f64>(cell, degree, Continuity::Continuous).unwrap();
            println!("{element}");
        }
    }

    // Create a degree 1 element on a triangle
    let element =
        nedelec::create::<f64>(ReferenceCellType::Triangle, 1, Continuity::Continuous).unwrap();

    // Create an array to store the basis function values
    let mut basis_values = rlst_dynamic_array4!(f64, element.tabulate_array_shape(0, 1));
    // Create array containing the point [1/3, 1/3]
    let mut points = rlst_dynamic_array2!(f64, [1, 2]);
    points[[0, 0]] = 1.0 / 3.0;
    points[[0, 1]] = 1.0 / 3.0;
    // Tabulate the element's basis functions at the point
    element.tabulate(&points, 0, &mut basis_values);
    for b in 0..element.dim() {
        println!(
            "Basis function {b} at the point (1/3, 1/3): ({}, {})",
            basis_values[[0, 0, b, 0]],
            basis_values[[0, 0, b, 1]]
        );
    }

    // Unsupported cells and degrees are reported as errors
    for (cell, degree) in [
        (ReferenceCellType::Quadrilateral, 1),
        (ReferenceCellType::Triangle, 6),
    ] {
        if let Err(e) = nedelec::create::<f64>(cell, degree, Continuity::Continuous) {
            println!("{e}");
        }
    }
}
