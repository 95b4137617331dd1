//! Four-node linear tetrahedron.

use smallvec::smallvec;

use crate::element::{ElementKind, ElementType, PointGeometry};
use crate::geom::{add, cross, dot, scale, sub, Vec3};

/// Four-node tetrahedron with one-point (centroid) quadrature.
///
/// Nodes are expected in positive orientation:
/// `(x1 - x0) . ((x2 - x0) x (x3 - x0)) > 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tet4;

impl ElementKind for Tet4 {
    const TYPE: ElementType = ElementType::Tet4;
    const DIM: usize = 3;
    const NODES: usize = 4;
    const POINTS: usize = 1;

    fn basis(_point: usize, _node: usize) -> f64 {
        0.25
    }

    fn point_geometry(coords: &[Vec3], _point: usize) -> PointGeometry {
        let e1 = sub(coords[1], coords[0]);
        let e2 = sub(coords[2], coords[0]);
        let e3 = sub(coords[3], coords[0]);
        let det = dot(e1, cross(e2, e3));
        // Rows of the inverse Jacobian.
        let g1 = scale(1.0 / det, cross(e2, e3));
        let g2 = scale(1.0 / det, cross(e3, e1));
        let g3 = scale(1.0 / det, cross(e1, e2));
        let g0 = scale(-1.0, add(add(g1, g2), g3));
        PointGeometry {
            gradients: smallvec![g0, g1, g2, g3],
            weight: det / 6.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    const UNIT: [Vec3; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];

    #[test]
    fn unit_tet_geometry() {
        let g = Tet4::point_geometry(&UNIT, 0);
        assert!((g.weight - 1.0 / 6.0).abs() < 1e-15);
        assert_eq!(g.gradients[0], [-1.0, -1.0, -1.0]);
        assert_eq!(g.gradients[3], [0.0, 0.0, 1.0]);
        assert!((g.characteristic_length() - 1.0 / 3.0_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn compliance_suite() {
        compliance::run_full_compliance::<Tet4>(&[
            [0.1, 0.0, 0.2],
            [1.2, 0.1, 0.0],
            [0.3, 0.9, 0.1],
            [0.2, 0.3, 1.4],
        ]);
    }
}
