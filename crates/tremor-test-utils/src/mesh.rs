//! Small meshes for kernel and driver tests.

use tremor_mesh::{build_box, BoxSpec, Discretization, ElementType, MeshError};

/// One reference element of the given type at the unit simplex.
pub fn single_element(element_type: ElementType) -> Result<Discretization, MeshError> {
    let (coords, conn) = match element_type {
        ElementType::Bar2 => (vec![0.0, 1.0], vec![0, 1]),
        ElementType::Tri3 => (vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0], vec![0, 1, 2]),
        ElementType::Tet4 => (
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
            vec![0, 1, 2, 3],
        ),
    };
    Discretization::new(element_type, coords, conn)
}

/// `n` bars of length `1 / n` on `[0, 1]`.
pub fn bar_line(n: usize) -> Result<Discretization, MeshError> {
    build_box(
        ElementType::Bar2,
        &BoxSpec {
            elements: [n, 1, 1],
            size: [1.0, 1.0, 1.0],
        },
    )
}

/// `n x n` unit square split into triangles.
pub fn tri_patch(n: usize) -> Result<Discretization, MeshError> {
    build_box(
        ElementType::Tri3,
        &BoxSpec {
            elements: [n, n, 1],
            size: [1.0, 1.0, 1.0],
        },
    )
}

/// `n x n x n` unit cube split into tetrahedra.
pub fn tet_patch(n: usize) -> Result<Discretization, MeshError> {
    build_box(
        ElementType::Tet4,
        &BoxSpec {
            elements: [n, n, n],
            size: [1.0, 1.0, 1.0],
        },
    )
}
