//! In-memory parameter map consumed by the driver and contributors.
//!
//! Parsing from input files is handled elsewhere; this is the typed,
//! insertion-ordered tree that parsing produces. Order matters: the
//! `"models"` sub-map is registered in the order its entries appear.

use indexmap::IndexMap;

use crate::error::ParamError;

/// A single parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    /// Boolean flag.
    Bool(bool),
    /// Integer value; also accepted where a real is requested.
    Int(i64),
    /// Real value.
    Real(f64),
    /// String value.
    Str(String),
    /// Ordered list.
    List(Vec<Param>),
    /// Nested map.
    Map(ParameterMap),
}

impl Param {
    /// The value as a real, promoting integers.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The value as a list of reals; a scalar becomes a one-element list.
    pub fn as_reals(&self) -> Option<Vec<f64>> {
        match self {
            Self::List(items) => items.iter().map(Param::as_real).collect(),
            other => other.as_real().map(|v| vec![v]),
        }
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<f64>> for Param {
    fn from(v: Vec<f64>) -> Self {
        Self::List(v.into_iter().map(Param::Real).collect())
    }
}

impl From<Vec<Param>> for Param {
    fn from(v: Vec<Param>) -> Self {
        Self::List(v)
    }
}

impl From<ParameterMap> for Param {
    fn from(v: ParameterMap) -> Self {
        Self::Map(v)
    }
}

/// Insertion-ordered string-keyed parameter tree.
///
/// # Examples
///
/// ```
/// use tremor_core::ParameterMap;
///
/// let params = ParameterMap::new()
///     .with("element type", "Tet4")
///     .with("end time", 1.0e-3);
/// assert_eq!(params.get_str("element type").unwrap(), "Tet4");
/// assert_eq!(params.get_real_or("CFL", 0.9).unwrap(), 0.9);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterMap {
    entries: IndexMap<String, Param>,
}

impl ParameterMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Param>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Param>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw access.
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.entries.get(key)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require(&self, key: &str) -> Result<&Param, ParamError> {
        self.entries.get(key).ok_or_else(|| ParamError::Missing {
            key: key.to_string(),
        })
    }

    /// Required string.
    pub fn get_str(&self, key: &str) -> Result<&str, ParamError> {
        match self.require(key)? {
            Param::Str(s) => Ok(s),
            _ => Err(wrong_type(key, "a string")),
        }
    }

    /// Required real (integers are promoted).
    pub fn get_real(&self, key: &str) -> Result<f64, ParamError> {
        self.require(key)?
            .as_real()
            .ok_or_else(|| wrong_type(key, "a number"))
    }

    /// Optional real with a default.
    pub fn get_real_or(&self, key: &str, default: f64) -> Result<f64, ParamError> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(p) => p.as_real().ok_or_else(|| wrong_type(key, "a number")),
        }
    }

    /// Optional non-negative integer with a default.
    pub fn get_count_or(&self, key: &str, default: u64) -> Result<u64, ParamError> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(Param::Int(v)) => u64::try_from(*v).map_err(|_| ParamError::Invalid {
                key: key.to_string(),
                reason: format!("{v} is negative"),
            }),
            Some(_) => Err(wrong_type(key, "an integer")),
        }
    }

    /// Optional boolean with a default.
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, ParamError> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(Param::Bool(b)) => Ok(*b),
            Some(_) => Err(wrong_type(key, "a boolean")),
        }
    }

    /// Required list of reals; a bare scalar is accepted as a one-element list.
    pub fn get_reals(&self, key: &str) -> Result<Vec<f64>, ParamError> {
        self.require(key)?
            .as_reals()
            .ok_or_else(|| wrong_type(key, "a number or a list of numbers"))
    }

    /// Required nested map.
    pub fn get_map(&self, key: &str) -> Result<&ParameterMap, ParamError> {
        match self.require(key)? {
            Param::Map(m) => Ok(m),
            _ => Err(wrong_type(key, "a map")),
        }
    }

    /// Optional nested map; absent keys yield `None`.
    pub fn get_map_opt(&self, key: &str) -> Result<Option<&ParameterMap>, ParamError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Param::Map(m)) => Ok(Some(m)),
            Some(_) => Err(wrong_type(key, "a map")),
        }
    }
}

fn wrong_type(key: &str, expected: &'static str) -> ParamError {
    ParamError::WrongType {
        key: key.to_string(),
        expected,
    }
}
