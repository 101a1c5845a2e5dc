use ndnedelec::ciarlet::NedelecElementFamily;
use ndnedelec::traits::{ElementFamily, FiniteElement};
use ndnedelec::types::{Continuity, ReferenceCellType};

fn main() {
    // Create the degree 2 Nedelec element family. A family is a set of finite elements with the
    // same family type, degree, and continuity across a set of cells
    let family = NedelecElementFamily::<f64>::new(2, Continuity::Continuous);

    // Get the element in the family on a triangle
    let element = family.element(ReferenceCellType::Triangle).unwrap();
    println!("Cell: {:?}, basis functions: {}", element.cell_type(), element.dim());

    // Get the element in the family on a tetrahedron
    let element = family.element(ReferenceCellType::Tetrahedron).unwrap();
    println!("Cell: {:?}, basis functions: {}", element.cell_type(), element.dim());
}
