//! Node-gather assembly of the nodal pressure rate.
//!
//! Every pass is a parallel loop over nodes. Each node walks its incident
//! elements through the CSR node-to-element adjacency, uses the orientation
//! code to find which local node it is, and accumulates into a local sum.
//! The sum is written to the node's own slot at the end, so no two
//! iterations ever touch the same output and no locking is needed.

use rayon::prelude::*;
use tremor_mesh::gather::{
    gather_scalars, gather_vectors, interpolate_vector, point_gradients, scalar_gradient, trace,
    vector_gradient,
};
use tremor_mesh::geom::{dot, scale, sub};
use tremor_mesh::{Discretization, ElementKind};

/// Read-only inputs of [`assemble_pressure_rate`].
///
/// Node arrays hold `K::DIM` (vectors) or one (scalars) value per node.
/// Point arrays hold one value per quadrature point, element major, except
/// `gradients`, which holds `K::NODES * K::DIM` values per point.
#[derive(Clone, Copy, Debug)]
pub struct RateInputs<'a> {
    /// Nodal pressure.
    pub pressure: &'a [f64],
    /// Nodal velocity.
    pub velocity: &'a [f64],
    /// Nodal acceleration.
    pub acceleration: &'a [f64],
    /// Basis gradients per point.
    pub gradients: &'a [f64],
    /// Quadrature weights.
    pub weights: &'a [f64],
    /// Density per point.
    pub density: &'a [f64],
    /// Effective bulk modulus per point.
    pub bulk_modulus: &'a [f64],
    /// Velocity stabilization coefficient per point.
    pub stabilization: &'a [f64],
}

/// Assemble the pressure rate at every node into `rate` (overwriting).
///
/// For node `a` and each quadrature point of each incident element:
///
/// ```text
/// rate[a] += phi_a * kappa * div(v) * w
///          + grad(phi_a) . (kappa * v') * w
/// v'       = -(tau_v / rho) * (rho * a_q - grad(p))
/// ```
///
/// Calling it twice with the same inputs gives the same result.
/// Non-finite values (e.g. zero density) propagate unchecked.
pub fn assemble_pressure_rate<K: ElementKind>(
    mesh: &Discretization,
    inputs: &RateInputs<'_>,
    rate: &mut [f64],
) {
    let adjacency = mesh.node_to_element();
    rate.par_iter_mut().enumerate().for_each(|(node, out)| {
        let mut node_rate = 0.0;
        for (elem, code) in adjacency.incident(node) {
            let local = code.which_down();
            let nodes = mesh.element_nodes(elem);
            let v = gather_vectors::<K>(nodes, inputs.velocity);
            let a = gather_vectors::<K>(nodes, inputs.acceleration);
            let p = gather_scalars(nodes, inputs.pressure);
            for elem_pt in 0..K::POINTS {
                let point = elem * K::POINTS + elem_pt;
                let weight = inputs.weights[point];
                let grads = point_gradients::<K>(inputs.gradients, point);
                let div_v = trace(&vector_gradient(&grads, &v));
                let kappa = inputs.bulk_modulus[point];
                let phi = K::basis(elem_pt, local);
                node_rate += phi * kappa * div_v * weight;

                let rho = inputs.density[point];
                let tau_v = inputs.stabilization[point];
                let point_a = interpolate_vector::<K>(elem_pt, &a);
                let grad_p = scalar_gradient(&grads, &p);
                let v_prime = scale(-(tau_v / rho), sub(scale(rho, point_a), grad_p));
                node_rate += dot(grads[local], scale(kappa, v_prime)) * weight;
            }
        }
        *out = node_rate;
    });
}

/// Lumped nodal volume `V_a = sum phi_a * w` over incident element points.
pub fn nodal_volumes<K: ElementKind>(mesh: &Discretization, weights: &[f64], volumes: &mut [f64]) {
    let adjacency = mesh.node_to_element();
    volumes.par_iter_mut().enumerate().for_each(|(node, out)| {
        *out = adjacency
            .incident(node)
            .map(|(elem, code)| {
                (0..K::POINTS)
                    .map(|pt| K::basis(pt, code.which_down()) * weights[elem * K::POINTS + pt])
                    .sum::<f64>()
            })
            .sum();
    });
}
