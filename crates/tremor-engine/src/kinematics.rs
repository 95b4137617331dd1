//! Driver-owned element and node passes.
//!
//! Node passes write only their own node's slot; element passes write only
//! their own element's points. Every pass reads its inputs through a
//! [`FieldReads`](tremor_fields::FieldReads) view taken next to the
//! exclusive output borrow.

use rayon::prelude::*;
use tracing::{debug_span, warn};
use tremor_core::FieldError;
use tremor_fields::FieldStore;
use tremor_mesh::gather::point_gradients;
use tremor_mesh::{configure, Discretization, ElementKind, PointGeometryFields};
use tremor_model::CoreFields;

/// Compute `grad`, `w` and `h` from the current positions.
///
/// Returns the number of points with a non-positive weight.
pub fn initialize_configuration<K: ElementKind>(
    mesh: &Discretization,
    fields: &mut FieldStore,
    core: &CoreFields,
) -> Result<usize, FieldError> {
    let _span = debug_span!("initialize_configuration").entered();
    let ([gradients, weights, lengths], reads) =
        fields.write_with_reads([core.gradients, core.weight, core.length])?;
    let positions = reads.read(core.position)?;
    let inverted = configure::<K>(
        mesh,
        positions,
        PointGeometryFields {
            gradients,
            weights,
            lengths,
        },
    );
    if inverted > 0 {
        warn!(inverted, "elements with non-positive volume");
    }
    Ok(inverted)
}

/// Recompute the geometry and conserve mass pointwise:
/// `rho_new = rho_old * w_old / w_new`.
pub fn update_configuration<K: ElementKind>(
    mesh: &Discretization,
    fields: &mut FieldStore,
    core: &CoreFields,
) -> Result<usize, FieldError> {
    let _span = debug_span!("update_configuration").entered();
    let old_weights = fields.read(core.weight)?.to_vec();
    let inverted = initialize_configuration::<K>(mesh, fields, core)?;
    let ([density], reads) = fields.write_with_reads([core.density])?;
    let weights = reads.read(core.weight)?;
    density
        .par_iter_mut()
        .zip(old_weights.par_iter().zip(weights.par_iter()))
        .for_each(|(rho, (w_old, w_new))| *rho *= w_old / w_new);
    Ok(inverted)
}

/// `m_a = sum rho * phi_a * w` over the points of every incident element.
pub fn lump_masses<K: ElementKind>(
    mesh: &Discretization,
    fields: &mut FieldStore,
    core: &CoreFields,
) -> Result<(), FieldError> {
    let _span = debug_span!("lump_masses").entered();
    let ([mass], reads) = fields.write_with_reads([core.mass])?;
    let density = reads.read(core.density)?;
    let weights = reads.read(core.weight)?;
    let adjacency = mesh.node_to_element();
    mass.par_iter_mut().enumerate().for_each(|(node, m)| {
        *m = adjacency
            .incident(node)
            .map(|(elem, code)| {
                (0..K::POINTS)
                    .map(|pt| {
                        let point = elem * K::POINTS + pt;
                        density[point] * K::basis(pt, code.which_down()) * weights[point]
                    })
                    .sum::<f64>()
            })
            .sum();
    });
    Ok(())
}

/// `dt_pt = h / c`; infinite where `c == 0`.
pub fn compute_point_time_steps(fields: &mut FieldStore, core: &CoreFields) -> Result<(), FieldError> {
    let _span = debug_span!("compute_point_time_steps").entered();
    let ([point_dt], reads) = fields.write_with_reads([core.point_dt])?;
    if !reads.exists(core.wave_speed) {
        point_dt.fill(f64::INFINITY);
        return Ok(());
    }
    let lengths = reads.read(core.length)?;
    let speeds = reads.read(core.wave_speed)?;
    point_dt
        .par_iter_mut()
        .zip(lengths.par_iter().zip(speeds.par_iter()))
        .for_each(|(dt, (h, c))| *dt = if *c == 0.0 { f64::INFINITY } else { h / c });
    Ok(())
}

/// Smallest point time step.
pub fn stable_time_step(fields: &FieldStore, core: &CoreFields) -> Result<f64, FieldError> {
    Ok(fields
        .read(core.point_dt)?
        .par_iter()
        .copied()
        .reduce(|| f64::INFINITY, f64::min))
}

/// `f_a = - sum sigma . grad(phi_a) * w` over incident element points.
///
/// Zero everywhere if no model has written a stress.
pub fn compute_stress_divergence<K: ElementKind>(
    mesh: &Discretization,
    fields: &mut FieldStore,
    core: &CoreFields,
) -> Result<(), FieldError> {
    let _span = debug_span!("compute_stress_divergence").entered();
    let ([force], reads) = fields.write_with_reads([core.force])?;
    if !reads.exists(core.stress) {
        force.fill(0.0);
        return Ok(());
    }
    let stress = reads.read(core.stress)?;
    let gradients = reads.read(core.gradients)?;
    let weights = reads.read(core.weight)?;
    let adjacency = mesh.node_to_element();
    let dd = K::DIM * K::DIM;
    force
        .par_chunks_mut(K::DIM)
        .enumerate()
        .for_each(|(node, f)| {
            f.fill(0.0);
            for (elem, code) in adjacency.incident(node) {
                let local = code.which_down();
                for pt in 0..K::POINTS {
                    let point = elem * K::POINTS + pt;
                    let grad = point_gradients::<K>(gradients, point)[local];
                    let sigma = &stress[point * dd..(point + 1) * dd];
                    for (i, fi) in f.iter_mut().enumerate() {
                        let row = &sigma[i * K::DIM..(i + 1) * K::DIM];
                        let traction: f64 = row.iter().zip(&grad).map(|(s, g)| s * g).sum();
                        *fi -= traction * weights[point];
                    }
                }
            }
        });
    Ok(())
}

/// `a = f / m`, unchecked.
pub fn compute_nodal_acceleration<K: ElementKind>(
    fields: &mut FieldStore,
    core: &CoreFields,
) -> Result<(), FieldError> {
    let _span = debug_span!("compute_nodal_acceleration").entered();
    let ([acceleration], reads) = fields.write_with_reads([core.acceleration])?;
    let force = reads.read(core.force)?;
    let mass = reads.read(core.mass)?;
    acceleration
        .par_chunks_mut(K::DIM)
        .zip(force.par_chunks(K::DIM).zip(mass.par_iter()))
        .for_each(|(a, (f, m))| {
            for (ai, fi) in a.iter_mut().zip(f) {
                *ai = fi / m;
            }
        });
    Ok(())
}

/// Velocity Verlet predictor: `x += dt*v + dt^2/2*a`, `v += dt/2*a`.
pub fn update_position(fields: &mut FieldStore, core: &CoreFields, dt: f64) -> Result<(), FieldError> {
    let _span = debug_span!("update_position").entered();
    fields.read_write(core.position)?;
    fields.read_write(core.velocity)?;
    let ([position, velocity], reads) = fields.write_with_reads([core.position, core.velocity])?;
    let acceleration = reads.read(core.acceleration)?;
    position
        .par_iter_mut()
        .zip(velocity.par_iter_mut().zip(acceleration.par_iter()))
        .for_each(|(x, (v, a))| {
            *x += dt * *v + 0.5 * dt * dt * a;
            *v += 0.5 * dt * a;
        });
    Ok(())
}

/// Velocity corrector with the end-of-step acceleration: `v += dt/2*a`.
pub fn correct_velocity(fields: &mut FieldStore, core: &CoreFields, dt: f64) -> Result<(), FieldError> {
    let _span = debug_span!("correct_velocity").entered();
    fields.read_write(core.velocity)?;
    let ([velocity], reads) = fields.write_with_reads([core.velocity])?;
    let acceleration = reads.read(core.acceleration)?;
    velocity
        .par_iter_mut()
        .zip(acceleration.par_iter())
        .for_each(|(v, a)| *v += 0.5 * dt * a);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_mesh::{build_box, Bar2, BoxSpec, ElementType};

    struct Bed {
        mesh: Discretization,
        fields: FieldStore,
        core: CoreFields,
    }

    /// Bar of two elements on [0, 1], density 2, positions from the mesh.
    fn bar() -> Bed {
        let spec = BoxSpec {
            elements: [2, 1, 1],
            ..BoxSpec::default()
        };
        let mesh = build_box(ElementType::Bar2, &spec).unwrap();
        let mut fields = FieldStore::new(&mesh);
        let core = CoreFields::define(&mut fields, ElementType::Bar2).unwrap();
        fields.assign(core.position, mesh.coords().to_vec()).unwrap();
        fields.assign(core.density, vec![2.0, 2.0]).unwrap();
        initialize_configuration::<Bar2>(&mesh, &mut fields, &core).unwrap();
        Bed { mesh, fields, core }
    }

    #[test]
    fn lumped_mass_sums_to_total_mass() {
        let mut bed = bar();
        lump_masses::<Bar2>(&bed.mesh, &mut bed.fields, &bed.core).unwrap();
        assert_eq!(bed.fields.read(bed.core.mass).unwrap(), &[0.5, 1.0, 0.5]);
    }

    #[test]
    fn uniform_tension_loads_only_the_ends() {
        let mut bed = bar();
        bed.fields.assign(bed.core.stress, vec![3.0, 3.0]).unwrap();
        compute_stress_divergence::<Bar2>(&bed.mesh, &mut bed.fields, &bed.core).unwrap();
        assert_eq!(bed.fields.read(bed.core.force).unwrap(), &[3.0, 0.0, -3.0]);
    }

    #[test]
    fn missing_stress_gives_zero_force() {
        let mut bed = bar();
        compute_stress_divergence::<Bar2>(&bed.mesh, &mut bed.fields, &bed.core).unwrap();
        assert_eq!(bed.fields.read(bed.core.force).unwrap(), &[0.0; 3]);
    }

    #[test]
    fn stretching_conserves_mass() {
        let mut bed = bar();
        bed.fields.assign(bed.core.position, vec![0.0, 1.0, 2.0]).unwrap();
        update_configuration::<Bar2>(&bed.mesh, &mut bed.fields, &bed.core).unwrap();
        assert_eq!(bed.fields.read(bed.core.density).unwrap(), &[1.0, 1.0]);
        assert_eq!(bed.fields.read(bed.core.weight).unwrap(), &[1.0, 1.0]);
    }

    #[test]
    fn point_time_step_is_length_over_speed() {
        let mut bed = bar();
        bed.fields.assign(bed.core.wave_speed, vec![2.0, 0.0]).unwrap();
        compute_point_time_steps(&mut bed.fields, &bed.core).unwrap();
        assert_eq!(bed.fields.read(bed.core.point_dt).unwrap(), &[0.25, f64::INFINITY]);
        assert_eq!(stable_time_step(&bed.fields, &bed.core).unwrap(), 0.25);
    }

    #[test]
    fn verlet_halves_compose_to_full_kick() {
        let mut bed = bar();
        bed.fields.write(bed.core.velocity).unwrap().fill(1.0);
        bed.fields.write(bed.core.acceleration).unwrap().fill(2.0);
        update_position(&mut bed.fields, &bed.core, 0.5).unwrap();
        // x += 0.5 * 1 + 0.125 * 2
        assert_eq!(bed.fields.read(bed.core.position).unwrap(), &[0.75, 1.25, 1.75]);
        correct_velocity(&mut bed.fields, &bed.core, 0.5).unwrap();
        assert_eq!(bed.fields.read(bed.core.velocity).unwrap(), &[2.0; 3]);
    }

    #[test]
    fn acceleration_is_force_over_mass() {
        let mut bed = bar();
        lump_masses::<Bar2>(&bed.mesh, &mut bed.fields, &bed.core).unwrap();
        bed.fields.assign(bed.core.force, vec![1.0, 1.0, -1.0]).unwrap();
        compute_nodal_acceleration::<Bar2>(&mut bed.fields, &bed.core).unwrap();
        assert_eq!(bed.fields.read(bed.core.acceleration).unwrap(), &[2.0, 1.0, -2.0]);
    }
}
