use std::collections::{HashMap, HashSet};

use crate::models::FolderRecord;

/// Parent prefix of a slash-delimited storage key: strip one trailing `/`,
/// then truncate after the last remaining `/`. Keys without a `/` belong to
/// the root (empty key). Pure string slicing, malformed keys are not
/// validated.
pub fn parent_key(key: &str) -> &str {
    let trimmed = key.strip_suffix('/').unwrap_or(key);
    match trimmed.rfind('/') {
        Some(index) => &trimmed[..=index],
        None => "",
    }
}

/// One row of the rendered tree, derived on every walk.
///
/// `ancestor_is_last` holds one flag per depth level, the final flag
/// describing the node itself, so a renderer can pick `│`/space continuation
/// glyphs per column and `├`/`└` for the node's own branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub record: FolderRecord,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub ancestor_is_last: Vec<bool>,
}

/// Expandable folder hierarchy rebuilt from a flat, prefix-keyed listing.
///
/// The expanded-set is the only persistent state; the visible node list is
/// recomputed wholesale by [`FolderTree::visible_nodes`] on every call.
#[derive(Debug, Clone)]
pub struct FolderTree {
    root: FolderRecord,
    children: HashMap<String, Vec<FolderRecord>>,
    expanded: HashSet<String>,
    selected: Option<String>,
}

impl FolderTree {
    /// Build the adjacency from a flat listing. A record with the empty key
    /// becomes the root; if none is present a synthetic "Home" root is
    /// assumed. The root starts expanded.
    pub fn new(folders: Vec<FolderRecord>) -> Self {
        let mut root = FolderRecord {
            key: String::new(),
            name: "Home".to_string(),
        };

        let mut children: HashMap<String, Vec<FolderRecord>> = HashMap::new();
        for record in folders {
            if record.key.is_empty() {
                root = record;
                continue;
            }
            children
                .entry(parent_key(&record.key).to_string())
                .or_default()
                .push(record);
        }

        for siblings in children.values_mut() {
            siblings.sort_by_key(|record| record.name.to_lowercase());
        }

        let mut expanded = HashSet::new();
        expanded.insert(String::new());

        Self {
            root,
            children,
            expanded,
            selected: None,
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn has_children(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    pub fn expand(&mut self, key: &str) {
        if self.has_children(key) {
            self.expanded.insert(key.to_string());
        }
    }

    pub fn collapse(&mut self, key: &str) {
        self.expanded.remove(key);
    }

    /// Flip the expanded state of one folder. Leaves have no expand
    /// affordance, toggling them does nothing.
    pub fn toggle(&mut self, key: &str) {
        if !self.has_children(key) {
            return;
        }
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_string());
        }
    }

    /// Choose a folder. Re-selecting the already-selected key is a no-op and
    /// reports `false`.
    pub fn select(&mut self, key: &str) -> bool {
        if self.selected.as_deref() == Some(key) {
            return false;
        }
        self.selected = Some(key.to_string());
        true
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Pre-order walk of the adjacency restricted to nodes whose full
    /// ancestor chain is expanded.
    pub fn visible_nodes(&self) -> Vec<TreeNode> {
        let mut nodes = vec![TreeNode {
            record: self.root.clone(),
            depth: 0,
            has_children: self.has_children(""),
            expanded: self.is_expanded(""),
            ancestor_is_last: Vec::new(),
        }];

        if self.is_expanded("") {
            self.walk("", 1, &[], &mut nodes);
        }

        nodes
    }

    fn walk(&self, key: &str, depth: usize, flags: &[bool], nodes: &mut Vec<TreeNode>) {
        let Some(siblings) = self.children.get(key) else {
            return;
        };

        for (index, record) in siblings.iter().enumerate() {
            let is_last = index + 1 == siblings.len();
            let mut ancestor_is_last = flags.to_vec();
            ancestor_is_last.push(is_last);

            let has_children = self.has_children(&record.key);
            let expanded = self.is_expanded(&record.key);

            nodes.push(TreeNode {
                record: record.clone(),
                depth,
                has_children,
                expanded,
                ancestor_is_last: ancestor_is_last.clone(),
            });

            if has_children && expanded {
                self.walk(&record.key, depth + 1, &ancestor_is_last, nodes);
            }
        }
    }
}
