//! Structured box meshes split into simplices.

use crate::discretization::Discretization;
use crate::element::ElementType;
use crate::error::MeshError;

/// Extent and resolution of a box mesh.
///
/// Only the first `dim` axes of the requested element type are used.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpec {
    /// Element divisions along each axis.
    pub elements: [usize; 3],
    /// Edge length along each axis.
    pub size: [f64; 3],
}

impl Default for BoxSpec {
    fn default() -> Self {
        Self {
            elements: [1, 1, 1],
            size: [1.0, 1.0, 1.0],
        }
    }
}

const AXES: [&str; 3] = ["x", "y", "z"];

/// Build a box of `element_type` simplices.
///
/// - `Bar2`: `nx` bars.
/// - `Tri3`: each quad split into two counter-clockwise triangles.
/// - `Tet4`: each hexahedron split into six positively oriented tetrahedra
///   around its main diagonal.
///
/// Node sets `"x-"`, `"x+"` (and `"y-"`, `"y+"`, `"z-"`, `"z+"` where the
/// dimension allows) hold the nodes on each boundary face.
pub fn build_box(element_type: ElementType, spec: &BoxSpec) -> Result<Discretization, MeshError> {
    let dim = element_type.dim();
    for axis in 0..dim {
        if spec.elements[axis] == 0 {
            return Err(MeshError::InvalidBox {
                reason: format!("{} elements must be positive", AXES[axis]),
            });
        }
        if !(spec.size[axis] > 0.0) {
            return Err(MeshError::InvalidBox {
                reason: format!("{} size must be positive", AXES[axis]),
            });
        }
    }
    let mut n = [1usize; 3];
    for axis in 0..dim {
        n[axis] = spec.elements[axis];
    }
    let stride = [1, n[0] + 1, (n[0] + 1) * (n[1] + 1)];
    let node_dims = [
        n[0] + 1,
        if dim > 1 { n[1] + 1 } else { 1 },
        if dim > 2 { n[2] + 1 } else { 1 },
    ];
    let node_id = |i: usize, j: usize, k: usize| (i * stride[0] + j * stride[1] + k * stride[2]) as u32;

    let mut coords = Vec::with_capacity(node_dims.iter().product::<usize>() * dim);
    for k in 0..node_dims[2] {
        for j in 0..node_dims[1] {
            for i in 0..node_dims[0] {
                let ijk = [i, j, k];
                for axis in 0..dim {
                    coords.push(spec.size[axis] * ijk[axis] as f64 / n[axis] as f64);
                }
            }
        }
    }

    let mut connectivity = Vec::new();
    match element_type {
        ElementType::Bar2 => {
            for i in 0..n[0] {
                connectivity.extend([node_id(i, 0, 0), node_id(i + 1, 0, 0)]);
            }
        }
        ElementType::Tri3 => {
            for j in 0..n[1] {
                for i in 0..n[0] {
                    let v00 = node_id(i, j, 0);
                    let v10 = node_id(i + 1, j, 0);
                    let v11 = node_id(i + 1, j + 1, 0);
                    let v01 = node_id(i, j + 1, 0);
                    connectivity.extend([v00, v10, v11, v00, v11, v01]);
                }
            }
        }
        ElementType::Tet4 => {
            // Kuhn subdivision: one tet per axis permutation, walking from
            // the low corner to the high corner.
            const PERMS: [([usize; 3], bool); 6] = [
                ([0, 1, 2], true),
                ([0, 2, 1], false),
                ([1, 0, 2], false),
                ([1, 2, 0], true),
                ([2, 0, 1], true),
                ([2, 1, 0], false),
            ];
            for k in 0..n[2] {
                for j in 0..n[1] {
                    for i in 0..n[0] {
                        for (perm, even) in PERMS {
                            let mut corner = [i, j, k];
                            let mut tet = [node_id(i, j, k); 4];
                            for (slot, &axis) in perm.iter().enumerate() {
                                corner[axis] += 1;
                                tet[slot + 1] = node_id(corner[0], corner[1], corner[2]);
                            }
                            if !even {
                                tet.swap(2, 3);
                            }
                            connectivity.extend(tet);
                        }
                    }
                }
            }
        }
    }

    let mut mesh = Discretization::new(element_type, coords, connectivity)?;
    for axis in 0..dim {
        for (suffix, at) in [("-", 0), ("+", n[axis])] {
            let mut nodes = Vec::new();
            for k in 0..node_dims[2] {
                for j in 0..node_dims[1] {
                    for i in 0..node_dims[0] {
                        if [i, j, k][axis] == at {
                            nodes.push(node_id(i, j, k));
                        }
                    }
                }
            }
            mesh.add_node_set(format!("{}{suffix}", AXES[axis]), nodes)?;
        }
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::gather::gather_vectors;
    use crate::{Bar2, Tet4, Tri3};

    fn total_measure<K: ElementKind>(mesh: &Discretization) -> f64 {
        (0..mesh.element_count())
            .map(|e| {
                let x = gather_vectors::<K>(mesh.element_nodes(e), mesh.coords());
                let g = K::point_geometry(&x, 0);
                assert!(g.weight > 0.0, "element {e} inverted");
                g.weight
            })
            .sum()
    }

    #[test]
    fn bar_box() {
        let spec = BoxSpec {
            elements: [4, 0, 0],
            size: [2.0, 0.0, 0.0],
        };
        let mesh = build_box(ElementType::Bar2, &spec).unwrap();
        assert_eq!(mesh.node_count(), 5);
        assert_eq!(mesh.element_count(), 4);
        assert_eq!(mesh.node_set("x+").unwrap(), &[4]);
        assert!((total_measure::<Bar2>(&mesh) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn triangle_box_is_positively_oriented() {
        let spec = BoxSpec {
            elements: [3, 2, 0],
            size: [3.0, 1.0, 0.0],
        };
        let mesh = build_box(ElementType::Tri3, &spec).unwrap();
        assert_eq!(mesh.node_count(), 12);
        assert_eq!(mesh.element_count(), 12);
        assert_eq!(mesh.node_set("y-").unwrap(), &[0, 1, 2, 3]);
        assert!((total_measure::<Tri3>(&mesh) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn tet_box_is_positively_oriented() {
        let spec = BoxSpec {
            elements: [2, 1, 2],
            size: [1.0, 2.0, 0.5],
        };
        let mesh = build_box(ElementType::Tet4, &spec).unwrap();
        assert_eq!(mesh.node_count(), 3 * 2 * 3);
        assert_eq!(mesh.element_count(), 4 * 6);
        assert_eq!(mesh.node_set("z+").unwrap().len(), 6);
        assert!((total_measure::<Tet4>(&mesh) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_divisions_rejected() {
        let spec = BoxSpec {
            elements: [0, 1, 1],
            ..BoxSpec::default()
        };
        assert!(matches!(
            build_box(ElementType::Tet4, &spec),
            Err(MeshError::InvalidBox { .. })
        ));
    }
}
