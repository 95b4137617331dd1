//! Names of the fields owned by the contributors in this crate.
//!
//! Other models locate these fields by name through
//! [`FieldStore::find`](tremor_fields::FieldStore::find), so the names are
//! part of the public contract.

/// Nodal pressure (1 component per node).
pub const PRESSURE: &str = "p";
/// Long name of [`PRESSURE`].
pub const PRESSURE_LONG: &str = "nodal pressure";
/// Nodal pressure rate (1 component per node).
pub const PRESSURE_RATE: &str = "p_dot";
/// Long name of [`PRESSURE_RATE`].
pub const PRESSURE_RATE_LONG: &str = "nodal pressure rate";
/// Effective bulk modulus (1 component per element point).
pub const BULK_MODULUS: &str = "kappa";
/// Long name of [`BULK_MODULUS`].
pub const BULK_MODULUS_LONG: &str = "effective bulk modulus";
/// Velocity stabilization coefficient (1 component per element point).
pub const STABILIZATION: &str = "tau_v";
/// Long name of [`STABILIZATION`].
pub const STABILIZATION_LONG: &str = "velocity stabilization";
