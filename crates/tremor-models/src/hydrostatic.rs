//! Pressure-only material model driven by the nodal pressure field.
//!
//! At each element point the stress is the interpolated nodal pressure
//! times the identity (tension positive), and the bulk modulus, wave speed
//! and velocity stabilization are written for the pressure rate assembly
//! and the stable time step.

use std::marker::PhantomData;

use rayon::prelude::*;
use tracing::debug_span;
use tremor_core::{FieldId, ModelError, ParameterMap, Stages};
use tremor_mesh::gather::{gather_scalars, interpolate_scalar};
use tremor_mesh::{with_element_kind, ElementKind, ElementType};
use tremor_model::{Model, ModelContext, ModelSetup};

use crate::fields::{BULK_MODULUS, PRESSURE, STABILIZATION};

/// Parameter key of the bulk modulus.
pub const BULK_MODULUS_KEY: &str = "bulk modulus";
/// Parameter key of the stabilization scaling factor.
pub const STABILIZATION_FACTOR_KEY: &str = "stabilization factor";

#[derive(Clone, Copy, Debug)]
struct Owned {
    pressure: FieldId,
    bulk_modulus: FieldId,
    stabilization: FieldId,
}

/// Linear pressure material for element kind `K`.
///
/// Requires a [`NodalPressure`](crate::NodalPressure) instance in the same
/// run. Its fields are located by name on the first call, so the two may
/// be registered in either order.
#[derive(Debug)]
pub struct Hydrostatic<K> {
    name: String,
    bulk_modulus: f64,
    factor: f64,
    owned: Option<Owned>,
    _kind: PhantomData<K>,
}

impl<K: ElementKind> Hydrostatic<K> {
    /// Read `"bulk modulus"` (required, positive) and
    /// `"stabilization factor"` (default `0.5`, non-negative).
    pub fn new(name: impl Into<String>, params: &ParameterMap) -> Result<Self, ModelError> {
        let name = name.into();
        let bulk_modulus = params.get_real(BULK_MODULUS_KEY)?;
        if bulk_modulus.is_nan() || bulk_modulus <= 0.0 {
            return Err(ModelError::Setup {
                reason: format!("{name}: bulk modulus must be positive, got {bulk_modulus}"),
            });
        }
        let factor = params.get_real_or(STABILIZATION_FACTOR_KEY, 0.5)?;
        if factor.is_nan() || factor < 0.0 {
            return Err(ModelError::Setup {
                reason: format!("{name}: stabilization factor must be non-negative, got {factor}"),
            });
        }
        Ok(Self {
            name,
            bulk_modulus,
            factor,
            owned: None,
            _kind: PhantomData,
        })
    }

    /// Configured bulk modulus.
    pub fn bulk_modulus(&self) -> f64 {
        self.bulk_modulus
    }

    fn owned(&mut self, ctx: &ModelContext<'_>) -> Result<Owned, ModelError> {
        if let Some(owned) = self.owned {
            return Ok(owned);
        }
        let fields = ctx.fields();
        let owned = Owned {
            pressure: fields.find(PRESSURE)?,
            bulk_modulus: fields.find(BULK_MODULUS)?,
            stabilization: fields.find(STABILIZATION)?,
        };
        self.owned = Some(owned);
        Ok(owned)
    }
}

impl<K: ElementKind> Model for Hydrostatic<K> {
    fn name(&self) -> &str {
        &self.name
    }

    fn stages(&self) -> Stages {
        Stages::AT_MATERIAL_MODEL
    }

    fn at_material_model(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        let _span = debug_span!("hydrostatic", model = %self.name).entered();
        let owned = self.owned(ctx)?;
        let core = ctx.core();
        let mesh = ctx.mesh();
        let (bulk, factor) = (self.bulk_modulus, self.factor);
        let dd = K::DIM * K::DIM;

        let ([sigma, kappa, c, tau_v], reads) = ctx.fields_mut().write_with_reads([
            core.stress,
            owned.bulk_modulus,
            core.wave_speed,
            owned.stabilization,
        ])?;
        let pressure = reads.read(owned.pressure)?;
        let density = reads.read(core.density)?;
        let length = reads.read(core.length)?;

        sigma
            .par_chunks_mut(K::POINTS * dd)
            .zip(kappa.par_chunks_mut(K::POINTS))
            .zip(c.par_chunks_mut(K::POINTS))
            .zip(tau_v.par_chunks_mut(K::POINTS))
            .enumerate()
            .for_each(|(elem, (((sigma, kappa), c), tau_v))| {
                let p = gather_scalars(mesh.element_nodes(elem), pressure);
                for pt in 0..K::POINTS {
                    let point = elem * K::POINTS + pt;
                    let p_bar = interpolate_scalar::<K>(pt, &p);
                    let s = &mut sigma[pt * dd..(pt + 1) * dd];
                    s.fill(0.0);
                    for i in 0..K::DIM {
                        s[i * K::DIM + i] = p_bar;
                    }
                    kappa[pt] = bulk;
                    c[pt] = (bulk / density[point]).sqrt();
                    tau_v[pt] = factor * length[point] / c[pt];
                }
            });
        Ok(())
    }
}

/// [`ModelFactory`](tremor_model::ModelFactory) for [`Hydrostatic`].
pub fn hydrostatic_factory(
    element_type: ElementType,
    _setup: &mut ModelSetup<'_>,
    name: &str,
    params: &ParameterMap,
) -> Result<Box<dyn Model>, ModelError> {
    with_element_kind!(element_type, K => {
        let model: Box<dyn Model> = Box::new(Hydrostatic::<K>::new(name, params)?);
        Ok(model)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_mesh::Tri3;
    use tremor_test_utils::{single_element, TestBed};

    use crate::NodalPressure;

    fn params(bulk: f64) -> ParameterMap {
        ParameterMap::new().with(BULK_MODULUS_KEY, bulk)
    }

    #[test]
    fn rejects_non_positive_bulk_modulus() {
        assert!(matches!(
            Hydrostatic::<Tri3>::new("fluid", &params(0.0)),
            Err(ModelError::Setup { .. })
        ));
        assert!(matches!(
            Hydrostatic::<Tri3>::new("fluid", &ParameterMap::new()),
            Err(ModelError::Param(_))
        ));
    }

    #[test]
    fn missing_pressure_contributor_is_reported() {
        let mut bed = TestBed::new(single_element(ElementType::Tri3).unwrap()).unwrap();
        let mut model = Hydrostatic::<Tri3>::new("fluid", &params(4.0)).unwrap();
        assert!(matches!(
            model.at_material_model(&mut bed.context()),
            Err(ModelError::Field(tremor_core::FieldError::Undefined { .. }))
        ));
    }

    #[test]
    fn writes_isotropic_stress_and_material_state() {
        let mut bed = TestBed::new(single_element(ElementType::Tri3).unwrap()).unwrap();
        let np = NodalPressure::<Tri3>::new(&mut bed.setup(), &ParameterMap::new()).unwrap();
        let mut model = Hydrostatic::<Tri3>::new("fluid", &params(4.0)).unwrap();
        bed.fields.assign(np.pressure(), vec![3.0, 3.0, 3.0]).unwrap();
        bed.fields.write(bed.core.density).unwrap().fill(1.0);
        bed.fields.write(bed.core.length).unwrap().fill(0.5);

        model.at_material_model(&mut bed.context()).unwrap();

        assert_eq!(bed.fields.read(bed.core.stress).unwrap(), &[3.0, 0.0, 0.0, 3.0]);
        assert_eq!(bed.fields.read(np.bulk_modulus()).unwrap(), &[4.0]);
        assert_eq!(bed.fields.read(bed.core.wave_speed).unwrap(), &[2.0]);
        assert_eq!(bed.fields.read(np.stabilization()).unwrap(), &[0.125]);
    }
}
