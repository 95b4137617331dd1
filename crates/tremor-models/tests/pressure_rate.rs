//! Properties of the assembled pressure rate on small patches, and the
//! predictor/corrector driven through a registry.

use proptest::prelude::*;
use tremor_core::{ParameterMap, Stage};
use tremor_mesh::{configure, ElementKind, PointGeometryFields, Tet4, Tri3};
use tremor_model::{ModelContext, ModelRegistry};
use tremor_models::{NodalPressure, HYDROSTATIC};
use tremor_test_utils::{tet_patch, tri_patch, TestBed};

fn configured_bed<K: ElementKind>(bed: &mut TestBed) {
    let core = bed.core;
    let ([grad, w, h], _) = bed
        .fields
        .write_with_reads([core.gradients, core.weight, core.length])
        .unwrap();
    configure::<K>(
        &bed.mesh,
        bed.mesh.coords(),
        PointGeometryFields {
            gradients: grad,
            weights: w,
            lengths: h,
        },
    );
}

fn fill_material(bed: &mut TestBed, np: &NodalPressure<impl ElementKind>, kappa: f64, tau: f64) {
    bed.fields.write(bed.core.density).unwrap().fill(1.5);
    bed.fields.write(np.bulk_modulus()).unwrap().fill(kappa);
    bed.fields.write(np.stabilization()).unwrap().fill(tau);
    bed.fields.write(bed.core.acceleration).unwrap();
    bed.fields.write(np.pressure()).unwrap();
}

fn rate_for<K: ElementKind>(bed: &mut TestBed, np: &NodalPressure<K>, velocity: &[f64]) -> Vec<f64> {
    bed.fields.assign(bed.core.velocity, velocity.to_vec()).unwrap();
    np.compute_pressure_rate(&mut bed.fields, &bed.mesh, &bed.core)
        .unwrap();
    bed.fields.read(np.rate()).unwrap().to_vec()
}

fn tet_bed(kappa: f64, tau: f64) -> (TestBed, NodalPressure<Tet4>) {
    let mut bed = TestBed::new(tet_patch(2).unwrap()).unwrap();
    let np = NodalPressure::<Tet4>::new(&mut bed.setup(), &ParameterMap::new()).unwrap();
    configured_bed::<Tet4>(&mut bed);
    fill_material(&mut bed, &np, kappa, tau);
    (bed, np)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rate_is_linear_in_velocity_without_stabilization(
        seed in prop::collection::vec(-1.0..1.0f64, 27 * 3),
        c in -4.0..4.0f64,
    ) {
        let (mut bed, np) = tet_bed(2.0, 0.0);
        let base = rate_for(&mut bed, &np, &seed);
        let scaled: Vec<f64> = seed.iter().map(|v| c * v).collect();
        let rate = rate_for(&mut bed, &np, &scaled);
        for (r, b) in rate.iter().zip(&base) {
            prop_assert!((r - c * b).abs() <= 1e-10 * (1.0 + b.abs()));
        }
    }

    #[test]
    fn rest_state_has_zero_rate(
        kappa in 0.1..100.0f64,
        tau in 0.0..1.0f64,
        p in -10.0..10.0f64,
    ) {
        let (mut bed, np) = tet_bed(kappa, tau);
        bed.fields.write(np.pressure()).unwrap().fill(p);
        let rate = rate_for(&mut bed, &np, &[0.0; 27 * 3]);
        for r in rate {
            prop_assert!(r.abs() <= 1e-9 * (1.0 + kappa * (1.0 + p.abs())));
        }
    }
}

#[test]
fn assembly_is_idempotent() {
    let (mut bed, np) = tet_bed(3.0, 0.2);
    let v: Vec<f64> = (0..27 * 3).map(|i| (i as f64 * 0.37).sin()).collect();
    let first = rate_for(&mut bed, &np, &v);
    let second = rate_for(&mut bed, &np, &v);
    assert_eq!(first, second);
}

#[test]
fn normalized_rate_recovers_divergence() {
    // v = (x, y) gives div v = 2 everywhere; normalized rate = kappa * 2.
    let mut bed = TestBed::new(tri_patch(3).unwrap()).unwrap();
    let params = ParameterMap::new().with("normalize by nodal volume", true);
    let np = NodalPressure::<Tri3>::new(&mut bed.setup(), &params).unwrap();
    configured_bed::<Tri3>(&mut bed);
    fill_material(&mut bed, &np, 5.0, 0.0);
    let v = bed.mesh.coords().to_vec();
    for r in rate_for(&mut bed, &np, &v) {
        assert!((r - 10.0).abs() < 1e-10, "{r}");
    }
}

/// Run one close's worth of pressure stages, then the corrector.
fn step(registry: &mut ModelRegistry, bed: &mut TestBed, correct: bool) {
    let mut ctx = ModelContext::new(&mut bed.fields, &bed.mesh, &bed.clock, &bed.core);
    for stage in [
        Stage::BeforeMaterialModel,
        Stage::AtMaterialModel,
        Stage::BeforeSecondaries,
    ] {
        registry.run_stage(stage, &mut ctx).unwrap();
    }
    if correct {
        registry.run_stage(Stage::AfterCorrection, &mut ctx).unwrap();
    }
}

#[test]
fn steady_rate_integrates_like_forward_euler() {
    let mut bed = TestBed::new(tri_patch(2).unwrap()).unwrap();
    let factories = tremor_models::default_factories();
    let mut registry = ModelRegistry::new();
    let hydro = factories.get(HYDROSTATIC).unwrap();
    let np = factories.get(tremor_models::NODAL_PRESSURE).unwrap();
    let et = bed.mesh.element_type();
    // Material first: fields are resolved lazily, so order does not matter.
    let params = ParameterMap::new()
        .with("bulk modulus", 4.0)
        .with("stabilization factor", 0.0);
    registry.register(hydro(et, &mut bed.setup(), "fluid", &params).unwrap()).unwrap();
    registry
        .register(np(et, &mut bed.setup(), "pressure", &ParameterMap::new()).unwrap())
        .unwrap();
    configured_bed::<Tri3>(&mut bed);
    bed.fields.write(bed.core.density).unwrap().fill(1.0);
    bed.fields.write(bed.core.acceleration).unwrap();
    let v: Vec<f64> = bed.mesh.coords().iter().map(|x| 0.5 * x).collect();
    bed.fields.assign(bed.core.velocity, v).unwrap();

    // First close at dt = 0 seeds the rate.
    step(&mut registry, &mut bed, false);
    let p_id = bed.fields.find("p").unwrap();
    let rate_id = bed.fields.find("p_dot").unwrap();
    let rate = bed.fields.read(rate_id).unwrap().to_vec();
    assert!(rate.iter().all(|r| *r > 0.0));

    bed.clock.dt = 0.01;
    for _ in 0..5 {
        step(&mut registry, &mut bed, true);
    }
    let p = bed.fields.read(p_id).unwrap();
    for (p, r) in p.iter().zip(&rate) {
        assert!((p - 0.05 * r).abs() < 1e-12 * (1.0 + r.abs()), "{p} vs {r}");
    }
}
