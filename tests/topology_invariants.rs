//! Property tests for the shape invariants, built by driving the public
//! mutation API with arbitrary operation sequences.

use phylo_link::prelude::*;
use proptest::prelude::*;

/// Builds a tree from an arbitrary script: each step attaches a leaf
/// either below an existing node or onto an existing edge.
fn build_tree(script: &[(u16, bool, u16)]) -> Tree {
    let mut tree = Tree::with_root(Some(Box::new(CommonNodeData::named("n0"))));
    for (i, &(pick, on_edge, len)) in script.iter().enumerate() {
        let name = format!("n{}", i + 1);
        let node_data: Option<Box<dyn NodeData>> =
            Some(Box::new(CommonNodeData::named(name)));
        let edge_data: Option<Box<dyn EdgeData>> = Some(Box::new(CommonEdgeData::with_length(
            f64::from(len) / 64.0,
        )));
        if on_edge && tree.edge_count() > 0 {
            let edge = tree
                .edge_ids()
                .nth(pick as usize % tree.edge_count())
                .unwrap();
            tree.attach_leaf_on_edge(edge, None, node_data, edge_data)
                .unwrap();
        } else {
            let target = tree
                .node_ids()
                .nth(pick as usize % tree.node_count())
                .unwrap();
            tree.attach_leaf(target, node_data, edge_data).unwrap();
        }
    }
    tree
}

fn script() -> impl Strategy<Value = Vec<(u16, bool, u16)>> {
    prop::collection::vec((any::<u16>(), any::<bool>(), 0u16..4096), 0..24)
}

proptest! {
    #[test]
    fn built_trees_satisfy_all_invariants(script in script()) {
        let tree = build_tree(&script);
        prop_assert!(validate_topology(&tree).is_ok());

        // Outer involution over every link.
        for l in tree.link_ids() {
            let outer = tree.link(l).unwrap().outer();
            prop_assert_eq!(tree.link(outer).unwrap().outer(), l);
        }

        // Ring closure: walking `next` from the primary link returns to it
        // after exactly degree(node) steps (one step for the lone
        // self-link of a single-node tree).
        for n in tree.node_ids() {
            let start = tree.node(n).unwrap().primary_link();
            let steps = tree.degree(n).unwrap().max(1);
            let mut current = start;
            for _ in 0..steps {
                current = tree.link(current).unwrap().next();
            }
            prop_assert_eq!(current, start);
        }

        // The winged count relation.
        if tree.node_count() > 1 {
            prop_assert_eq!(tree.link_count(), 2 * tree.edge_count());
        }
    }

    #[test]
    fn euler_tour_length_matches_edge_count(script in script()) {
        let tree = build_tree(&script);
        let expected = if tree.edge_count() == 0 {
            1
        } else {
            2 * tree.edge_count() + 1
        };
        prop_assert_eq!(tree.euler_tour().unwrap().count(), expected);
    }

    #[test]
    fn traversals_agree_on_the_node_multiset(script in script()) {
        let tree = build_tree(&script);
        let mut pre: Vec<usize> = tree.preorder().unwrap().map(|v| v.node.index()).collect();
        let mut post: Vec<usize> = tree.postorder().unwrap().map(|v| v.node.index()).collect();
        let mut level: Vec<usize> = tree
            .levelorder()
            .unwrap()
            .map(|lv| lv.visit.node.index())
            .collect();
        pre.sort_unstable();
        post.sort_unstable();
        level.sort_unstable();
        prop_assert_eq!(&pre, &post);
        prop_assert_eq!(&pre, &level);
        prop_assert_eq!(pre.len(), tree.node_count());
    }

    #[test]
    fn reroot_preserves_shape_at_every_link(script in script()) {
        let mut tree = build_tree(&script);

        let shape = |t: &Tree| {
            let mut pairs: Vec<(usize, usize)> = t
                .edge_ids()
                .map(|e| {
                    let a = t.primary_node(e).unwrap().index();
                    let b = t.secondary_node(e).unwrap().index();
                    (a.min(b), a.max(b))
                })
                .collect();
            pairs.sort_unstable();
            pairs
        };
        let before = shape(&tree);

        for l in tree.link_ids().collect::<Vec<_>>() {
            tree.reroot_at_link(l).unwrap();
            prop_assert!(validate_topology(&tree).is_ok());
            prop_assert_eq!(shape(&tree), before.clone());
            prop_assert_eq!(tree.root_link().unwrap(), l);
        }
    }

    #[test]
    fn detach_keeps_the_remainder_dense_and_valid(
        script in script(),
        pick in any::<u16>(),
    ) {
        let mut tree = build_tree(&script);
        prop_assume!(tree.edge_count() > 0);

        let nodes_before = tree.node_count();
        let edge = tree.edge_ids().nth(pick as usize % tree.edge_count()).unwrap();
        let removed = tree.detach_subtree(edge).unwrap();

        prop_assert!(removed >= 1);
        prop_assert_eq!(tree.node_count(), nodes_before - removed);
        prop_assert!(validate_topology(&tree).is_ok());
        if tree.node_count() > 1 {
            prop_assert_eq!(tree.link_count(), 2 * tree.edge_count());
        } else {
            prop_assert_eq!(tree.link_count(), 1);
        }
    }

    #[test]
    fn write_then_read_preserves_the_tree(script in script()) {
        let tree = build_tree(&script);
        let writer = NewickWriter::new();
        let reader = NewickReader::new();

        let text = writer.write_str(&tree).unwrap();
        let back = reader.read_str(&text).unwrap();
        prop_assert_eq!(tree.node_count(), back.node_count());
        prop_assert_eq!(tree.edge_count(), back.edge_count());
        prop_assert!(validate_topology(&back).is_ok());

        // Stable under a second round trip, character for character.
        let text2 = writer.write_str(&back).unwrap();
        prop_assert_eq!(text, text2);
    }

    #[test]
    fn clone_tree_is_deep_and_identical(script in script()) {
        let tree = build_tree(&script);
        let copy = tree.clone_tree();
        prop_assert_eq!(tree.node_count(), copy.node_count());
        prop_assert_eq!(tree.edge_count(), copy.edge_count());
        prop_assert_eq!(tree.link_count(), copy.link_count());
        prop_assert!(validate_topology(&copy).is_ok());
        for n in tree.node_ids() {
            let a = tree.node_data_as::<CommonNodeData>(n).unwrap();
            let b = copy.node_data_as::<CommonNodeData>(n).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
