//! Element-local gathers and point interpolation.
//!
//! Gathers copy one element's nodal values out of a global node array into
//! a stack-allocated buffer, so per-quadrature-point loops never touch the
//! heap.

use smallvec::SmallVec;

use crate::element::{ElementKind, MAX_NODES};
use crate::geom::{from_slice, Vec3, ZERO};

/// Element-local nodal vectors.
pub type LocalVectors = SmallVec<[Vec3; MAX_NODES]>;

/// Element-local nodal scalars.
pub type LocalScalars = SmallVec<[f64; MAX_NODES]>;

/// Gather `K::DIM`-component nodal vectors for the nodes of one element.
#[inline]
pub fn gather_vectors<K: ElementKind>(nodes: &[u32], data: &[f64]) -> LocalVectors {
    nodes
        .iter()
        .map(|&n| from_slice(&data[n as usize * K::DIM..], K::DIM))
        .collect()
}

/// Gather single-component nodal values for the nodes of one element.
#[inline]
pub fn gather_scalars(nodes: &[u32], data: &[f64]) -> LocalScalars {
    nodes.iter().map(|&n| data[n as usize]).collect()
}

/// Read the `K::NODES` basis gradients stored for one quadrature point.
///
/// `grads` holds `K::NODES * K::DIM` values per point.
#[inline]
pub fn point_gradients<K: ElementKind>(grads: &[f64], point: usize) -> LocalVectors {
    let block = K::NODES * K::DIM;
    grads[point * block..(point + 1) * block]
        .chunks_exact(K::DIM)
        .map(|g| from_slice(g, K::DIM))
        .collect()
}

/// Interpolate nodal scalars to quadrature point `point`.
#[inline]
pub fn interpolate_scalar<K: ElementKind>(point: usize, values: &[f64]) -> f64 {
    values
        .iter()
        .enumerate()
        .map(|(n, v)| K::basis(point, n) * v)
        .sum()
}

/// Interpolate nodal vectors to quadrature point `point`.
#[inline]
pub fn interpolate_vector<K: ElementKind>(point: usize, values: &[Vec3]) -> Vec3 {
    let mut out = ZERO;
    for (n, v) in values.iter().enumerate() {
        let phi = K::basis(point, n);
        for d in 0..3 {
            out[d] += phi * v[d];
        }
    }
    out
}

/// Gradient of an interpolated scalar field.
#[inline]
pub fn scalar_gradient(gradients: &[Vec3], values: &[f64]) -> Vec3 {
    let mut out = ZERO;
    for (g, v) in gradients.iter().zip(values) {
        for d in 0..3 {
            out[d] += g[d] * v;
        }
    }
    out
}

/// Gradient of an interpolated vector field, `out[i][j] = d v_i / d x_j`.
#[inline]
pub fn vector_gradient(gradients: &[Vec3], values: &[Vec3]) -> [Vec3; 3] {
    let mut out = [ZERO; 3];
    for (g, v) in gradients.iter().zip(values) {
        for i in 0..3 {
            for j in 0..3 {
                out[i][j] += v[i] * g[j];
            }
        }
    }
    out
}

/// Trace of a 3x3 tensor.
#[inline]
pub fn trace(t: &[Vec3; 3]) -> f64 {
    t[0][0] + t[1][1] + t[2][2]
}
