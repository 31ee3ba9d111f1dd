use phylo_link::prelude::*;

fn name_of(tree: &Tree, node: NodeId) -> String {
    tree.node_data_as::<CommonNodeData>(node)
        .unwrap()
        .unwrap()
        .name
        .clone()
}

fn node_named(tree: &Tree, name: &str) -> NodeId {
    tree.node_ids()
        .find(|&n| name_of(tree, n) == name)
        .unwrap_or_else(|| panic!("no node named {name}"))
}

#[test]
fn star_level_order_visits_input_order() {
    // "(A,B,C);" is a 4-node star; level order is root, then A, B, C in
    // input order.
    let tree = NewickReader::new().read_str("(A,B,C);").unwrap();
    assert_eq!(tree.node_count(), 4);
    assert_eq!(tree.edge_count(), 3);

    let visited: Vec<(String, usize)> = tree
        .levelorder()
        .unwrap()
        .map(|lv| (name_of(&tree, lv.visit.node), lv.depth))
        .collect();
    assert_eq!(
        visited,
        [
            (String::new(), 0),
            ("A".to_string(), 1),
            ("B".to_string(), 1),
            ("C".to_string(), 1)
        ]
    );
}

#[test]
fn single_node_tree_all_iterators_yield_once() {
    let tree = NewickReader::new().read_str("A;").unwrap();
    assert_eq!(tree.preorder().unwrap().count(), 1);
    assert_eq!(tree.postorder().unwrap().count(), 1);
    assert_eq!(tree.levelorder().unwrap().count(), 1);
    assert_eq!(tree.euler_tour().unwrap().count(), 1);
}

#[test]
fn empty_tree_all_iterators_fail() {
    let tree = Tree::new();
    assert!(matches!(tree.preorder(), Err(TreeError::EmptyTree)));
    assert!(matches!(tree.postorder(), Err(TreeError::EmptyTree)));
    assert!(matches!(tree.levelorder(), Err(TreeError::EmptyTree)));
    assert!(matches!(tree.euler_tour(), Err(TreeError::EmptyTree)));
}

#[test]
fn preorder_and_postorder_visit_the_same_nodes() {
    let tree = NewickReader::new()
        .read_str("((A,B)ab,(C,(D,E)de)cde,F)root;")
        .unwrap();

    let pre: Vec<String> = tree
        .preorder()
        .unwrap()
        .map(|v| name_of(&tree, v.node))
        .collect();
    let post: Vec<String> = tree
        .postorder()
        .unwrap()
        .map(|v| name_of(&tree, v.node))
        .collect();

    assert_eq!(pre[0], "root");
    assert_eq!(post[post.len() - 1], "root");
    assert_eq!(
        pre,
        ["root", "ab", "A", "B", "cde", "C", "de", "D", "E", "F"]
    );
    assert_eq!(
        post,
        ["A", "B", "ab", "C", "D", "E", "de", "cde", "F", "root"]
    );

    let mut pre_sorted = pre.clone();
    let mut post_sorted = post.clone();
    pre_sorted.sort();
    post_sorted.sort();
    assert_eq!(pre_sorted, post_sorted);
}

#[test]
fn euler_tour_length_is_two_e_plus_one() {
    for (text, edges) in [
        ("(A,B,C);", 3),
        ("((A,B)C,D)E;", 4),
        ("((A,B),(C,D));", 6),
    ] {
        let tree = NewickReader::new().read_str(text).unwrap();
        assert_eq!(tree.edge_count(), edges);
        assert_eq!(tree.euler_tour().unwrap().count(), 2 * edges + 1);
    }
}

#[test]
fn euler_tour_starts_and_ends_at_the_root() {
    let tree = NewickReader::new().read_str("((A,B)C,D)E;").unwrap();
    let visits: Vec<Visit> = tree.euler_tour().unwrap().collect();
    let root = tree.root_node().unwrap();
    assert_eq!(visits.first().unwrap().node, root);
    assert_eq!(visits.last().unwrap().node, root);
    assert_eq!(visits.first().unwrap().edge, None);
}

#[test]
fn rerooting_preserves_euler_tour_length() {
    // The tour length is a topology invariant, indifferent to rooting.
    let mut tree = NewickReader::new().read_str("((A,B)C,(D,E)F)G;").unwrap();
    let before = tree.euler_tour().unwrap().count();

    let a = node_named(&tree, "A");
    tree.reroot_at_node(a).unwrap();
    validate_topology(&tree).unwrap();
    assert_eq!(tree.root_node().unwrap(), a);
    assert_eq!(tree.euler_tour().unwrap().count(), before);

    let f = node_named(&tree, "F");
    tree.reroot_at_node(f).unwrap();
    validate_topology(&tree).unwrap();
    assert_eq!(tree.euler_tour().unwrap().count(), before);
}

#[test]
fn rerooting_preserves_undirected_shape() {
    let mut tree = NewickReader::new().read_str("((A,B)C,(D,E)F)G;").unwrap();

    let shape = |t: &Tree| {
        let mut pairs: Vec<(String, String)> = t
            .edge_ids()
            .map(|e| {
                let a = name_of(t, t.primary_node(e).unwrap());
                let b = name_of(t, t.secondary_node(e).unwrap());
                if a <= b { (a, b) } else { (b, a) }
            })
            .collect();
        pairs.sort();
        pairs
    };

    let before = shape(&tree);
    for name in ["A", "C", "E", "G"] {
        let node = node_named(&tree, name);
        tree.reroot_at_node(node).unwrap();
        validate_topology(&tree).unwrap();
        assert_eq!(shape(&tree), before, "after rerooting at {name}");
    }
}

#[test]
fn traversal_from_a_link_covers_the_whole_tree() {
    let tree = NewickReader::new().read_str("((A,B)C,D)E;").unwrap();
    let a = node_named(&tree, "A");
    let entry = tree.node(a).unwrap().primary_link();

    let pre: Vec<String> = tree
        .preorder_from(entry)
        .unwrap()
        .map(|v| name_of(&tree, v.node))
        .collect();
    assert_eq!(pre.len(), tree.node_count());
    assert_eq!(pre[0], "A");

    assert_eq!(
        tree.euler_tour_from(entry).unwrap().count(),
        2 * tree.edge_count() + 1
    );
}

#[test]
fn bounded_level_order_cuts_below_the_bound() {
    let tree = NewickReader::new().read_str("((A,B)C,(D,(E,F)G)H)I;").unwrap();
    let depths: Vec<usize> = tree
        .levelorder_bounded(1)
        .unwrap()
        .map(|lv| lv.depth)
        .collect();
    assert_eq!(depths, [0, 1, 1]);
    let all: Vec<usize> = tree.levelorder().unwrap().map(|lv| lv.depth).collect();
    assert_eq!(all.len(), tree.node_count());
    assert!(all.windows(2).all(|w| w[0] <= w[1]));
}
