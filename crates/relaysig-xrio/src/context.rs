use std::collections::BTreeMap;

use crate::tree::{XmlDocument, XmlNode};

/// An element together with the position of its parent in [`ExtractContext::nodes`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlatNode<'d> {
    pub node: &'d XmlNode,
    pub parent: Option<usize>,
}

/// Read-only view of a document shared by every extraction stage.
#[derive(Debug)]
pub(crate) struct ExtractContext<'d> {
    pub root: &'d XmlNode,
    /// Every element in document order.
    pub nodes: Vec<FlatNode<'d>>,
    pub namespaces: &'d BTreeMap<String, String>,
}

impl<'d> ExtractContext<'d> {
    pub fn new(document: &'d XmlDocument) -> Self {
        Self {
            root: &document.root,
            nodes: flatten(&document.root),
            namespaces: &document.namespaces,
        }
    }

    pub fn parent_of(&self, position: usize) -> Option<&'d XmlNode> {
        let parent = self.nodes.get(position)?.parent?;
        self.nodes.get(parent).map(|flat| flat.node)
    }
}

/// Pre-order list of `root` and its descendants with parent positions.
fn flatten(root: &XmlNode) -> Vec<FlatNode<'_>> {
    let mut nodes = Vec::new();
    let mut pending = vec![(root, None)];
    while let Some((node, parent)) = pending.pop() {
        let position = nodes.len();
        nodes.push(FlatNode { node, parent });
        pending.extend(node.children.iter().rev().map(|child| (child, Some(position))));
    }
    nodes
}
