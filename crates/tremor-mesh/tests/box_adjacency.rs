use tremor_mesh::{build_box, BoxSpec, ElementType};

#[test]
fn every_element_node_pair_appears_once_in_the_adjacency() {
    for ty in ElementType::ALL {
        let spec = BoxSpec {
            elements: [3, 2, 2],
            size: [1.0, 1.0, 1.0],
        };
        let mesh = build_box(ty, &spec).unwrap();
        let adj = mesh.node_to_element();
        assert_eq!(adj.node_count(), mesh.node_count());
        assert_eq!(adj.targets().len(), mesh.connectivity().len());
        for node in 0..mesh.node_count() {
            for (elem, code) in adj.incident(node) {
                assert_eq!(mesh.element_nodes(elem)[code.which_down()] as usize, node);
            }
        }
    }
}

#[test]
fn interior_tet_node_touches_twenty_four_elements() {
    let spec = BoxSpec {
        elements: [2, 2, 2],
        size: [1.0, 1.0, 1.0],
    };
    let mesh = build_box(ElementType::Tet4, &spec).unwrap();
    // Centre node of a 2x2x2 Kuhn-split box.
    let centre = 1 + 3 + 9;
    assert_eq!(mesh.node_to_element().incident(centre).count(), 24);
}
