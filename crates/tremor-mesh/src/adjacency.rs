//! Compressed-sparse-row node-to-element adjacency.
//!
//! For node `a`, the incident elements are
//! `targets[offsets[a]..offsets[a + 1]]`, and the matching entry of
//! `codes` records which local node of that element `a` is. Kernels use
//! the code to pick the right basis function without searching the
//! element's connectivity.

use std::ops::Range;

/// Packed orientation code for one adjacency entry.
///
/// Bits 3.. hold the local ordinal of the lower-dimensional entity within
/// the higher-dimensional one ("which down"). Bits 0..3 hold rotation and
/// flip, which are always zero for vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrientationCode(u8);

impl OrientationCode {
    /// Code for a vertex that is local node `which_down` of its element.
    pub const fn vertex(which_down: u8) -> Self {
        Self(which_down << 3)
    }

    /// Local ordinal of the node within the element.
    #[inline]
    pub const fn which_down(self) -> usize {
        (self.0 >> 3) as usize
    }

    /// Raw packed value.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Node-to-element incidence in CSR form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adjacency {
    offsets: Vec<usize>,
    targets: Vec<u32>,
    codes: Vec<OrientationCode>,
}

impl Adjacency {
    /// Invert element-to-node connectivity.
    ///
    /// Each node lists its incident elements in ascending element order.
    /// `connectivity` must hold `nodes_per_element` entries per element with
    /// every entry below `node_count`; the discretization validates this
    /// before calling.
    pub fn node_to_element(connectivity: &[u32], nodes_per_element: usize, node_count: usize) -> Self {
        let mut offsets = vec![0usize; node_count + 1];
        for &node in connectivity {
            offsets[node as usize + 1] += 1;
        }
        for i in 0..node_count {
            offsets[i + 1] += offsets[i];
        }
        let total = offsets[node_count];
        let mut fill = offsets.clone();
        let mut targets = vec![0u32; total];
        let mut codes = vec![OrientationCode::vertex(0); total];
        for (elem, nodes) in connectivity.chunks_exact(nodes_per_element).enumerate() {
            for (local, &node) in nodes.iter().enumerate() {
                let slot = &mut fill[node as usize];
                targets[*slot] = elem as u32;
                codes[*slot] = OrientationCode::vertex(local as u8);
                *slot += 1;
            }
        }
        Self {
            offsets,
            targets,
            codes,
        }
    }

    /// Number of source nodes.
    pub fn node_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Entry range of `node` in [`targets`](Self::targets) and [`codes`](Self::codes).
    #[inline]
    pub fn range(&self, node: usize) -> Range<usize> {
        self.offsets[node]..self.offsets[node + 1]
    }

    /// Incident elements of `node` paired with their orientation codes.
    #[inline]
    pub fn incident(&self, node: usize) -> impl Iterator<Item = (usize, OrientationCode)> + '_ {
        let r = self.range(node);
        self.targets[r.clone()]
            .iter()
            .zip(&self.codes[r])
            .map(|(&e, &c)| (e as usize, c))
    }

    /// Offsets array, `node_count + 1` entries.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Flattened incident-element list.
    pub fn targets(&self) -> &[u32] {
        &self.targets
    }

    /// Orientation codes parallel to [`targets`](Self::targets).
    pub fn codes(&self) -> &[OrientationCode] {
        &self.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn two_triangles_sharing_an_edge() {
        // 3---2
        // | / |
        // 0---1
        let conn = [0, 1, 2, 0, 2, 3];
        let adj = Adjacency::node_to_element(&conn, 3, 4);
        assert_eq!(adj.offsets(), &[0, 2, 3, 5, 6]);
        let n0: Vec<_> = adj.incident(0).map(|(e, c)| (e, c.which_down())).collect();
        assert_eq!(n0, vec![(0, 0), (1, 0)]);
        let n2: Vec<_> = adj.incident(2).map(|(e, c)| (e, c.which_down())).collect();
        assert_eq!(n2, vec![(0, 2), (1, 1)]);
    }

    #[test]
    fn code_packs_which_down_above_rotation_bits() {
        let c = OrientationCode::vertex(3);
        assert_eq!(c.bits(), 3 << 3);
        assert_eq!(c.which_down(), 3);
    }

    proptest! {
        #[test]
        fn codes_point_back_at_the_node(
            conn in prop::collection::vec(0u32..12, 4..64)
                .prop_map(|mut v| { v.truncate(v.len() / 4 * 4); v })
        ) {
            let adj = Adjacency::node_to_element(&conn, 4, 12);
            prop_assert_eq!(adj.targets().len(), conn.len());
            for node in 0..12 {
                for (elem, code) in adj.incident(node) {
                    prop_assert_eq!(conn[elem * 4 + code.which_down()] as usize, node);
                }
            }
        }
    }
}
