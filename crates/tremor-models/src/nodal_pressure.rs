//! Stabilized nodal pressure with a midpoint predictor/corrector.
//!
//! Per step, with `dt` the step increment and `p_dot_n` the rate assembled
//! during the previous step:
//!
//! ```text
//! before_material_model:  p~        = p_n + dt * p_dot_n
//! before_secondaries:     p_{n+1/2} = p~ - dt/2 * p_dot_n
//!                         p_dot     = 0, then p_dot_{n+1} = assemble(...)
//! after_correction:       p_{n+1}   = p_{n+1/2} + dt/2 * p_dot_{n+1}
//! ```
//!
//! Material models read the predicted pressure `p~`.

use std::marker::PhantomData;

use rayon::prelude::*;
use tracing::debug_span;
use tremor_core::{FieldId, Location, ModelError, ParameterMap, Stages};
use tremor_fields::FieldStore;
use tremor_mesh::{with_element_kind, Discretization, ElementKind, ElementType, BODY_CLASS};
use tremor_model::{CoreFields, Model, ModelContext, ModelSetup};

use crate::assembly::{assemble_pressure_rate, nodal_volumes, RateInputs};
use crate::fields::{
    BULK_MODULUS, BULK_MODULUS_LONG, PRESSURE, PRESSURE_LONG, PRESSURE_RATE, PRESSURE_RATE_LONG,
    STABILIZATION, STABILIZATION_LONG,
};
use crate::NODAL_PRESSURE;

/// Parameter key enabling division of the assembled rate by the lumped
/// nodal volume.
pub const NORMALIZE_KEY: &str = "normalize by nodal volume";

/// Nodal pressure contributor for element kind `K`.
///
/// Owns four fields: `p` and `p_dot` on nodes, `kappa` and `tau_v` on
/// element points. `kappa` and `tau_v` are written by a material model.
#[derive(Debug)]
pub struct NodalPressure<K> {
    pressure: FieldId,
    rate: FieldId,
    bulk_modulus: FieldId,
    stabilization: FieldId,
    normalize: bool,
    _kind: PhantomData<K>,
}

impl<K: ElementKind> NodalPressure<K> {
    /// Define the owned fields and read options from `params`.
    pub fn new(setup: &mut ModelSetup<'_>, params: &ParameterMap) -> Result<Self, ModelError> {
        let everywhere = [BODY_CLASS];
        Ok(Self {
            pressure: setup.define(PRESSURE, PRESSURE_LONG, 1, Location::Node, true, &everywhere)?,
            rate: setup.define(
                PRESSURE_RATE,
                PRESSURE_RATE_LONG,
                1,
                Location::Node,
                false,
                &everywhere,
            )?,
            bulk_modulus: setup.define(
                BULK_MODULUS,
                BULK_MODULUS_LONG,
                1,
                Location::Element,
                true,
                &everywhere,
            )?,
            stabilization: setup.define(
                STABILIZATION,
                STABILIZATION_LONG,
                1,
                Location::Element,
                true,
                &everywhere,
            )?,
            normalize: params.get_bool_or(NORMALIZE_KEY, false)?,
            _kind: PhantomData,
        })
    }

    /// Id of `p`.
    pub fn pressure(&self) -> FieldId {
        self.pressure
    }

    /// Id of `p_dot`.
    pub fn rate(&self) -> FieldId {
        self.rate
    }

    /// Id of `kappa`.
    pub fn bulk_modulus(&self) -> FieldId {
        self.bulk_modulus
    }

    /// Id of `tau_v`.
    pub fn stabilization(&self) -> FieldId {
        self.stabilization
    }

    /// `p += scale * dt * p_dot` at every node.
    fn advance(&self, fields: &mut FieldStore, scale: f64) -> Result<(), ModelError> {
        fields.read_write(self.pressure)?;
        let ([p], reads) = fields.write_with_reads([self.pressure])?;
        let p_dot = reads.read(self.rate)?;
        p.par_iter_mut()
            .zip(p_dot.par_iter())
            .for_each(|(p, r)| *p += scale * r);
        Ok(())
    }

    fn predict(&self, fields: &mut FieldStore, dt: f64) -> Result<(), ModelError> {
        let _span = debug_span!("nodal_pressure_predictor").entered();
        self.advance(fields, dt)
    }

    fn backtrack_to_midpoint(&self, fields: &mut FieldStore, dt: f64) -> Result<(), ModelError> {
        let _span = debug_span!("nodal_pressure_backtrack").entered();
        self.advance(fields, -0.5 * dt)
    }

    fn correct(&self, fields: &mut FieldStore, dt: f64) -> Result<(), ModelError> {
        let _span = debug_span!("nodal_pressure_corrector").entered();
        self.advance(fields, 0.5 * dt)
    }

    fn zero_rate(&self, fields: &mut FieldStore) -> Result<(), ModelError> {
        fields.write(self.rate)?.fill(0.0);
        Ok(())
    }

    /// Assemble the rate for the current configuration, overwriting `p_dot`.
    pub fn compute_pressure_rate(
        &self,
        fields: &mut FieldStore,
        mesh: &Discretization,
        core: &CoreFields,
    ) -> Result<(), ModelError> {
        let _span = debug_span!("compute_pressure_rate").entered();
        let ([rate], reads) = fields.write_with_reads([self.rate])?;
        let inputs = RateInputs {
            pressure: reads.read(self.pressure)?,
            velocity: reads.read(core.velocity)?,
            acceleration: reads.read(core.acceleration)?,
            gradients: reads.read(core.gradients)?,
            weights: reads.read(core.weight)?,
            density: reads.read(core.density)?,
            bulk_modulus: reads.read(self.bulk_modulus)?,
            stabilization: reads.read(self.stabilization)?,
        };
        assemble_pressure_rate::<K>(mesh, &inputs, rate);
        if self.normalize {
            let mut volumes = vec![0.0; rate.len()];
            nodal_volumes::<K>(mesh, inputs.weights, &mut volumes);
            rate.par_iter_mut()
                .zip(volumes.par_iter())
                .for_each(|(r, v)| *r /= v);
        }
        Ok(())
    }
}

impl<K: ElementKind> Model for NodalPressure<K> {
    fn name(&self) -> &str {
        NODAL_PRESSURE
    }

    fn stages(&self) -> Stages {
        Stages::BEFORE_MATERIAL_MODEL | Stages::BEFORE_SECONDARIES | Stages::AFTER_CORRECTION
    }

    fn before_material_model(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        let dt = ctx.dt();
        let fields = ctx.fields_mut();
        if dt == 0.0 && !fields.exists(self.rate) {
            self.zero_rate(fields)?;
        }
        if !fields.exists(self.pressure) {
            fields.write(self.pressure)?;
        }
        self.predict(fields, dt)
    }

    fn before_secondaries(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        let dt = ctx.dt();
        let mesh = ctx.mesh();
        let core = ctx.core();
        let fields = ctx.fields_mut();
        self.backtrack_to_midpoint(fields, dt)?;
        self.zero_rate(fields)?;
        self.compute_pressure_rate(fields, mesh, core)
    }

    fn after_correction(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        let dt = ctx.dt();
        self.correct(ctx.fields_mut(), dt)
    }
}

/// [`ModelFactory`](tremor_model::ModelFactory) for [`NodalPressure`].
pub fn nodal_pressure_factory(
    element_type: ElementType,
    setup: &mut ModelSetup<'_>,
    _name: &str,
    params: &ParameterMap,
) -> Result<Box<dyn Model>, ModelError> {
    with_element_kind!(element_type, K => {
        let model: Box<dyn Model> = Box::new(NodalPressure::<K>::new(setup, params)?);
        Ok(model)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tremor_mesh::Tet4;
    use tremor_test_utils::{single_element, TestBed};

    fn bed_with_model() -> (TestBed, NodalPressure<Tet4>) {
        let mut bed = TestBed::new(single_element(ElementType::Tet4).unwrap()).unwrap();
        let model = NodalPressure::<Tet4>::new(&mut bed.setup(), &ParameterMap::new()).unwrap();
        (bed, model)
    }

    #[test]
    fn declares_three_stages_and_fixed_name() {
        let (_, model) = bed_with_model();
        assert_eq!(model.name(), "nodal pressure");
        assert_eq!(
            model.stages().iter().collect::<Vec<_>>(),
            vec![
                tremor_core::Stage::BeforeMaterialModel,
                tremor_core::Stage::BeforeSecondaries,
                tremor_core::Stage::AfterCorrection
            ]
        );
    }

    #[test]
    fn defines_fields_with_expected_persistence() {
        let (bed, model) = bed_with_model();
        let def = |id| bed.fields.def(id).unwrap().clone();
        assert_eq!(def(model.pressure()).long_name, "nodal pressure");
        assert!(!def(model.rate()).is_persistent());
        assert!(def(model.bulk_modulus()).is_persistent());
        assert_eq!(def(model.stabilization()).location, Location::Element);
    }

    #[test]
    fn second_instance_is_a_duplicate_definition() {
        let (mut bed, _model) = bed_with_model();
        assert!(matches!(
            NodalPressure::<Tet4>::new(&mut bed.setup(), &ParameterMap::new()),
            Err(ModelError::Field(tremor_core::FieldError::Duplicate { .. }))
        ));
    }

    #[test]
    fn first_step_zeroes_missing_rate() {
        let (mut bed, mut model) = bed_with_model();
        bed.fields.write(model.pressure()).unwrap().fill(2.0);
        model.before_material_model(&mut bed.context()).unwrap();
        assert_eq!(bed.fields.read(model.rate()).unwrap(), &[0.0; 4]);
        assert_eq!(bed.fields.read(model.pressure()).unwrap(), &[2.0; 4]);
    }

    #[test]
    fn missing_rate_with_nonzero_dt_is_fatal() {
        let (mut bed, mut model) = bed_with_model();
        bed.clock.dt = 0.1;
        assert!(matches!(
            model.before_material_model(&mut bed.context()),
            Err(ModelError::Field(tremor_core::FieldError::NotAllocated { .. }))
        ));
    }

    fn predict_backtrack_correct(
        p0: f64,
        rate_n: f64,
        rate_np1: f64,
        dt: f64,
    ) -> (f64, f64, f64) {
        let (mut bed, model) = bed_with_model();
        bed.fields.write(model.pressure()).unwrap().fill(p0);
        bed.fields.write(model.rate()).unwrap().fill(rate_n);
        model.predict(&mut bed.fields, dt).unwrap();
        let predicted = bed.fields.read(model.pressure()).unwrap()[0];
        model.backtrack_to_midpoint(&mut bed.fields, dt).unwrap();
        let midpoint = bed.fields.read(model.pressure()).unwrap()[0];
        bed.fields.write(model.rate()).unwrap().fill(rate_np1);
        model.correct(&mut bed.fields, dt).unwrap();
        (predicted, midpoint, bed.fields.read(model.pressure()).unwrap()[0])
    }

    #[test]
    fn midpoint_scheme_uses_both_rates() {
        let (predicted, midpoint, end) = predict_backtrack_correct(1.0, 2.0, 4.0, 0.5);
        assert_eq!(predicted, 2.0);
        assert_eq!(midpoint, 1.5);
        assert_eq!(end, 2.5);
    }

    proptest! {
        #[test]
        fn constant_rate_matches_forward_euler(
            p0 in -1.0e3..1.0e3f64,
            rate in -1.0e3..1.0e3f64,
            dt in 0.0..1.0f64,
        ) {
            let (_, _, end) = predict_backtrack_correct(p0, rate, rate, dt);
            let euler = p0 + dt * rate;
            prop_assert!((end - euler).abs() <= 1e-9 * (1.0 + euler.abs()));
        }
    }
}
