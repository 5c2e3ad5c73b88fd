//! Text rendering of menu trees via `termtree`.

use termtree::Tree;

use crate::domain::TreeNode;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(node_line(self)).with_leaves(leaves)
    }
}

/// `label -> link`, with `(hidden)` for nodes failing their access check.
fn node_line(node: &TreeNode) -> String {
    let mut line = node.label.clone();
    if let Some(link) = &node.link {
        line.push_str(&format!(" -> {}", link));
    }
    if node.visible == Some(false) {
        line.push_str(" (hidden)");
    }
    line
}

/// Render a forest under a single title line.
pub fn render_forest(title: &str, nodes: &[TreeNode]) -> String {
    let leaves: Vec<_> = nodes.iter().map(TreeDisplay::to_tree_string).collect();
    Tree::new(title.to_string()).with_leaves(leaves).to_string()
}
