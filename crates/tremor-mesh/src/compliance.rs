//! Element-kind compliance test helpers.
//!
//! These functions verify that an [`ElementKind`] implementation satisfies
//! the invariants the kernels rely on. Reused across all kind test modules
//! (Bar2, Tri3, Tet4).

use crate::element::ElementKind;
use crate::geom::{dot, Vec3};

const TOL: f64 = 1e-12;

/// Assert that the basis values sum to one at every quadrature point.
pub fn assert_partition_of_unity<K: ElementKind>() {
    for point in 0..K::POINTS {
        let sum: f64 = (0..K::NODES).map(|n| K::basis(point, n)).sum();
        assert!(
            (sum - 1.0).abs() < TOL,
            "{:?}: basis sums to {sum} at point {point}",
            K::TYPE
        );
    }
}

/// Assert that basis gradients sum to zero (constants have no gradient).
pub fn assert_gradients_sum_to_zero<K: ElementKind>(coords: &[Vec3]) {
    for point in 0..K::POINTS {
        let g = K::point_geometry(coords, point);
        assert_eq!(g.gradients.len(), K::NODES);
        for d in 0..3 {
            let sum: f64 = g.gradients.iter().map(|v| v[d]).sum();
            assert!(sum.abs() < TOL, "{:?}: gradient sum[{d}] = {sum}", K::TYPE);
        }
    }
}

/// Assert that interpolating a linear field reproduces its exact gradient.
pub fn assert_linear_reproduction<K: ElementKind>(coords: &[Vec3]) {
    let slope: Vec3 = [0.7, -1.3, 2.1];
    let mut expected = [0.0; 3];
    expected[..K::DIM].copy_from_slice(&slope[..K::DIM]);
    for point in 0..K::POINTS {
        let g = K::point_geometry(coords, point);
        for d in 0..3 {
            let recovered: f64 = coords
                .iter()
                .zip(&g.gradients)
                .map(|(x, grad)| (dot(slope, *x) + 4.0) * grad[d])
                .sum();
            assert!(
                (recovered - expected[d]).abs() < 1e-10,
                "{:?}: recovered gradient[{d}] = {recovered}, expected {}",
                K::TYPE,
                expected[d]
            );
        }
    }
}

/// Assert that a positively oriented element has positive weight and a
/// finite characteristic length.
pub fn assert_positive_measure<K: ElementKind>(coords: &[Vec3]) {
    for point in 0..K::POINTS {
        let g = K::point_geometry(coords, point);
        assert!(g.weight > 0.0, "{:?}: weight {} <= 0", K::TYPE, g.weight);
        let h = g.characteristic_length();
        assert!(h.is_finite() && h > 0.0, "{:?}: h = {h}", K::TYPE);
    }
}

/// Run every compliance check against one positively oriented element.
pub fn run_full_compliance<K: ElementKind>(coords: &[Vec3]) {
    assert_eq!(coords.len(), K::NODES);
    assert_partition_of_unity::<K>();
    assert_gradients_sum_to_zero::<K>(coords);
    assert_linear_reproduction::<K>(coords);
    assert_positive_measure::<K>(coords);
}
