//! Per-point geometry from current nodal positions.

use rayon::prelude::*;

use crate::discretization::Discretization;
use crate::element::ElementKind;
use crate::gather::gather_vectors;

/// Output arrays of [`configure`], all sized by element point.
#[derive(Debug)]
pub struct PointGeometryFields<'a> {
    /// `K::NODES * K::DIM` basis gradient components per point.
    pub gradients: &'a mut [f64],
    /// Quadrature weight times Jacobian determinant per point.
    pub weights: &'a mut [f64],
    /// Characteristic length per point.
    pub lengths: &'a mut [f64],
}

/// Recompute gradients, weights and lengths at every element point from
/// `positions` (`K::DIM` values per node).
///
/// Returns the number of points with a non-positive weight. Those values
/// are still written.
pub fn configure<K: ElementKind>(
    mesh: &Discretization,
    positions: &[f64],
    out: PointGeometryFields<'_>,
) -> usize {
    let block = K::NODES * K::DIM;
    out.gradients
        .par_chunks_mut(K::POINTS * block)
        .zip(out.weights.par_chunks_mut(K::POINTS))
        .zip(out.lengths.par_chunks_mut(K::POINTS))
        .enumerate()
        .map(|(elem, ((grads, weights), lengths))| {
            let x = gather_vectors::<K>(mesh.element_nodes(elem), positions);
            let mut inverted = 0;
            for pt in 0..K::POINTS {
                let geometry = K::point_geometry(&x, pt);
                let dst = &mut grads[pt * block..(pt + 1) * block];
                for (chunk, g) in dst.chunks_exact_mut(K::DIM).zip(&geometry.gradients) {
                    chunk.copy_from_slice(&g[..K::DIM]);
                }
                weights[pt] = geometry.weight;
                lengths[pt] = geometry.characteristic_length();
                if geometry.weight <= 0.0 {
                    inverted += 1;
                }
            }
            inverted
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{build_box, BoxSpec};
    use crate::element::ElementType;
    use crate::tri3::Tri3;

    #[test]
    fn unit_square_weights_sum_to_area() {
        let mesh = build_box(
            ElementType::Tri3,
            &BoxSpec {
                elements: [2, 2, 0],
                size: [1.0, 1.0, 1.0],
            },
        )
        .unwrap();
        let points = mesh.element_count();
        let (mut g, mut w, mut h) = (vec![0.0; points * 6], vec![0.0; points], vec![0.0; points]);
        let inverted = configure::<Tri3>(
            &mesh,
            mesh.coords(),
            PointGeometryFields {
                gradients: &mut g,
                weights: &mut w,
                lengths: &mut h,
            },
        );
        assert_eq!(inverted, 0);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(h.iter().all(|&h| h > 0.0 && h <= 0.5));
    }

    #[test]
    fn inverted_elements_are_counted() {
        let mut coords = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let mesh = Discretization::new(ElementType::Tri3, coords.clone(), vec![0, 1, 2]).unwrap();
        coords[5] = -1.0;
        let (mut g, mut w, mut h) = (vec![0.0; 6], vec![0.0; 1], vec![0.0; 1]);
        let inverted = configure::<Tri3>(
            &mesh,
            &coords,
            PointGeometryFields {
                gradients: &mut g,
                weights: &mut w,
                lengths: &mut h,
            },
        );
        assert_eq!(inverted, 1);
        assert!(w[0] < 0.0);
    }
}
