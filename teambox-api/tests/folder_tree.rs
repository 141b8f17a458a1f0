use teambox_api::folders::{parent_key, FolderTree};
use teambox_api::models::FolderRecord;

fn record(key: &str, name: &str) -> FolderRecord {
    FolderRecord {
        key: key.to_string(),
        name: name.to_string(),
    }
}

fn visible_names(tree: &FolderTree) -> Vec<String> {
    tree.visible_nodes()
        .iter()
        .map(|node| node.record.name.clone())
        .collect()
}

#[test]
fn test_parent_key_derivation() {
    assert_eq!(parent_key(""), "");
    assert_eq!(parent_key("a/"), "");
    assert_eq!(parent_key("file.txt"), "");
    assert_eq!(parent_key("a/b/"), "a/");
    assert_eq!(parent_key("a/b/c/"), "a/b/");
    assert_eq!(parent_key("a/b/file.txt"), "a/b/");
}

#[test]
fn test_parent_key_is_prefix_and_present() {
    let keys = ["a/", "a/b/", "a/b/c/", "d/", "d/e/"];

    for key in keys {
        let parent = parent_key(key);
        assert!(key.starts_with(parent), "{} not a prefix of {}", parent, key);
        assert!(
            parent.is_empty() || keys.contains(&parent),
            "parent {} of {} missing from key set",
            parent,
            key
        );
    }
}

#[test]
fn test_root_expanded_counts_direct_children_plus_root() {
    let tree = FolderTree::new(vec![
        record("a/", "a"),
        record("a/b/", "b"),
        record("a/b/c/", "c"),
        record("d/", "d"),
    ]);

    // Only the root is expanded, so the walk yields root plus its two
    // direct children.
    assert_eq!(tree.visible_nodes().len(), 3);
}

#[test]
fn test_expand_collapse_scenario() {
    let mut tree = FolderTree::new(vec![
        record("", "Home"),
        record("a/", "a"),
        record("a/b/", "b"),
        record("c/", "c"),
    ]);

    assert_eq!(visible_names(&tree), ["Home", "a", "c"]);

    tree.expand("a/");
    assert_eq!(visible_names(&tree), ["Home", "a", "b", "c"]);

    tree.collapse("a/");
    assert_eq!(visible_names(&tree), ["Home", "a", "c"]);
}

#[test]
fn test_synthetic_root_when_listing_has_none() {
    let tree = FolderTree::new(vec![record("a/", "a")]);

    let nodes = tree.visible_nodes();
    assert_eq!(nodes[0].record.key, "");
    assert_eq!(nodes[0].record.name, "Home");
}

#[test]
fn test_children_sorted_case_insensitively() {
    let tree = FolderTree::new(vec![
        record("zeta/", "Zeta"),
        record("alpha/", "alpha"),
        record("mid/", "Mid"),
    ]);

    assert_eq!(visible_names(&tree), ["Home", "alpha", "Mid", "Zeta"]);
}

#[test]
fn test_toggle_is_noop_on_leaf() {
    let mut tree = FolderTree::new(vec![record("a/", "a")]);

    tree.toggle("a/");
    assert!(!tree.is_expanded("a/"));
    assert!(!tree.visible_nodes()[1].has_children);
}

#[test]
fn test_collapsing_root_hides_everything_but_root() {
    let mut tree = FolderTree::new(vec![record("a/", "a"), record("b/", "b")]);

    tree.toggle("");
    assert_eq!(visible_names(&tree), ["Home"]);
}

#[test]
fn test_reselecting_same_key_is_noop() {
    let mut tree = FolderTree::new(vec![record("a/", "a")]);

    assert!(tree.select("a/"));
    assert!(!tree.select("a/"));
    assert_eq!(tree.selected(), Some("a/"));

    assert!(tree.select(""));
    assert_eq!(tree.selected(), Some(""));
}

#[test]
fn test_ancestor_is_last_flags() {
    let mut tree = FolderTree::new(vec![
        record("a/", "a"),
        record("a/x/", "x"),
        record("a/y/", "y"),
        record("b/", "b"),
    ]);
    tree.expand("a/");

    let nodes = tree.visible_nodes();
    let by_key = |key: &str| nodes.iter().find(|n| n.record.key == key).unwrap();

    // "a" has a sibling after it, its children carry that flag.
    assert_eq!(by_key("a/").ancestor_is_last, [false]);
    assert_eq!(by_key("a/x/").ancestor_is_last, [false, false]);
    assert_eq!(by_key("a/y/").ancestor_is_last, [false, true]);
    assert_eq!(by_key("b/").ancestor_is_last, [true]);

    assert_eq!(by_key("a/x/").depth, 2);
    assert_eq!(by_key("b/").depth, 1);
}
