//! Two-node linear bar.

use smallvec::smallvec;

use crate::element::{ElementKind, ElementType, PointGeometry};
use crate::geom::Vec3;

/// Two-node bar with one-point (midpoint) quadrature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bar2;

impl ElementKind for Bar2 {
    const TYPE: ElementType = ElementType::Bar2;
    const DIM: usize = 1;
    const NODES: usize = 2;
    const POINTS: usize = 1;

    fn basis(_point: usize, _node: usize) -> f64 {
        0.5
    }

    fn point_geometry(coords: &[Vec3], _point: usize) -> PointGeometry {
        let length = coords[1][0] - coords[0][0];
        PointGeometry {
            gradients: smallvec![[-1.0 / length, 0.0, 0.0], [1.0 / length, 0.0, 0.0]],
            weight: length,
        }
    }
}
