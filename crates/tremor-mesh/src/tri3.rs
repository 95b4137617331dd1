//! Three-node linear triangle.

use smallvec::smallvec;

use crate::element::{ElementKind, ElementType, PointGeometry};
use crate::geom::{add, scale, sub, Vec3};

/// Three-node triangle with one-point (centroid) quadrature.
///
/// Nodes are expected in counter-clockwise order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tri3;

impl ElementKind for Tri3 {
    const TYPE: ElementType = ElementType::Tri3;
    const DIM: usize = 2;
    const NODES: usize = 3;
    const POINTS: usize = 1;

    fn basis(_point: usize, _node: usize) -> f64 {
        1.0 / 3.0
    }

    fn point_geometry(coords: &[Vec3], _point: usize) -> PointGeometry {
        let e1 = sub(coords[1], coords[0]);
        let e2 = sub(coords[2], coords[0]);
        let det = e1[0] * e2[1] - e1[1] * e2[0];
        let g1 = [e2[1] / det, -e2[0] / det, 0.0];
        let g2 = [-e1[1] / det, e1[0] / det, 0.0];
        let g0 = scale(-1.0, add(g1, g2));
        PointGeometry {
            gradients: smallvec![g0, g1, g2],
            weight: det / 2.0,
        }
    }
}
