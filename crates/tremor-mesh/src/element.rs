//! Element kinds and the runtime [`ElementType`] key.
//!
//! An element kind is a zero-sized type implementing [`ElementKind`]. Kernels
//! are generic over the kind, so every per-quadrature-point loop is
//! monomorphized and free of dynamic dispatch. The kind is chosen once at
//! startup from a string key via [`ElementType::from_name`] and the
//! [`with_element_kind!`](crate::with_element_kind) macro.

use std::fmt;

use smallvec::SmallVec;

use crate::geom::{norm, Vec3};

/// Largest node count of any supported element.
pub const MAX_NODES: usize = 4;

/// Basis gradients and integration weight at one quadrature point.
#[derive(Clone, Debug, PartialEq)]
pub struct PointGeometry {
    /// Gradient of each local basis function, in local node order.
    pub gradients: SmallVec<[Vec3; MAX_NODES]>,
    /// Quadrature weight times the Jacobian determinant.
    pub weight: f64,
}

impl PointGeometry {
    /// Characteristic length used for the stable time step: the inverse of
    /// the largest basis-gradient magnitude.
    pub fn characteristic_length(&self) -> f64 {
        let max = self
            .gradients
            .iter()
            .map(|g| norm(*g))
            .fold(0.0_f64, f64::max);
        1.0 / max
    }
}

/// A reference-element kind.
///
/// Implementors are zero-sized markers; all information is carried by
/// associated constants and functions.
pub trait ElementKind: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Runtime key for this kind.
    const TYPE: ElementType;
    /// Spatial dimension.
    const DIM: usize;
    /// Nodes per element.
    const NODES: usize;
    /// Quadrature points per element.
    const POINTS: usize;

    /// Value of local basis function `node` at quadrature point `point`.
    fn basis(point: usize, node: usize) -> f64;

    /// Basis gradients and weight at `point` for an element whose nodes sit
    /// at `coords` (local node order, `NODES` entries).
    ///
    /// Inverted elements produce a negative weight; the value is returned
    /// unchecked.
    fn point_geometry(coords: &[Vec3], point: usize) -> PointGeometry;
}

/// Runtime key selecting one of the compiled element kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Two-node bar.
    Bar2,
    /// Three-node triangle.
    Tri3,
    /// Four-node tetrahedron.
    Tet4,
}

impl ElementType {
    /// Every supported kind.
    pub const ALL: [ElementType; 3] = [ElementType::Bar2, ElementType::Tri3, ElementType::Tet4];

    /// Match a parameter string against the supported kinds.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// The parameter string for this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bar2 => "Bar2",
            Self::Tri3 => "Tri3",
            Self::Tet4 => "Tet4",
        }
    }

    /// Spatial dimension.
    pub fn dim(self) -> usize {
        crate::with_element_kind!(self, K => K::DIM)
    }

    /// Nodes per element.
    pub fn nodes(self) -> usize {
        crate::with_element_kind!(self, K => K::NODES)
    }

    /// Quadrature points per element.
    pub fn points(self) -> usize {
        crate::with_element_kind!(self, K => K::POINTS)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluate an expression with a type alias bound to the concrete
/// [`ElementKind`] selected by an [`ElementType`] value.
///
/// ```
/// use tremor_mesh::{with_element_kind, ElementKind, ElementType};
///
/// let ty = ElementType::from_name("Tri3").unwrap();
/// let nodes = with_element_kind!(ty, K => K::NODES);
/// assert_eq!(nodes, 3);
/// ```
#[macro_export]
macro_rules! with_element_kind {
    ($ty:expr, $kind:ident => $body:expr) => {
        match $ty {
            $crate::ElementType::Bar2 => {
                type $kind = $crate::Bar2;
                $body
            }
            $crate::ElementType::Tri3 => {
                type $kind = $crate::Tri3;
                $body
            }
            $crate::ElementType::Tet4 => {
                type $kind = $crate::Tet4;
                $body
            }
        }
    };
}
