//! A live, mutable document tree for the browser-side applier.
//!
//! `LiveDocument` wraps a parsed HTML5 tree and records child-list mutations
//! the way a `MutationObserver` would: once an observer is registered, every
//! insertion appends a [`MutationRecord`] to a queue that the observer drains
//! one batch at a time. Changing a text node's value is a character-data
//! mutation and is not recorded.

use ego_tree::{NodeId, NodeRef, Tree};
use log::trace;
use scraper::{ElementRef, Html, Node};

use crate::errors::RetextError;

/// One child-list mutation of a single parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// The parent whose children changed.
    pub target: NodeId,
    /// Nodes inserted under `target`, in insertion order.
    pub added_nodes: Vec<NodeId>,
}

/// A parsed document that can be mutated in place.
#[derive(Debug)]
pub struct LiveDocument {
    html: Html,
    observed: bool,
    pending: Vec<MutationRecord>,
}

impl LiveDocument {
    /// Parses a complete HTML document.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            observed: false,
            pending: Vec::new(),
        }
    }

    /// The `<body>` element, which is the visible root.
    pub fn body(&self) -> Option<NodeId> {
        self.find_element("body")
    }

    /// The first element with tag `name`, in document order.
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|node| node.value().as_element().is_some_and(|e| e.name() == name))
            .map(|node| node.id())
    }

    /// The first element carrying `id="..."`, in document order.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|node| node.value().as_element().is_some_and(|e| e.id() == Some(id)))
            .map(|node| node.id())
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    /// The value of a text node, or `None` if `id` is not a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.html.tree.get(id)?.value() {
            Node::Text(text) => Some(&*text.text),
            _ => None,
        }
    }

    /// Concatenated text of every text node under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.html
            .tree
            .get(id)
            .map(|node| {
                node.descendants()
                    .filter_map(|n| n.value().as_text().map(|t| &*t.text))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Overwrites a text node's value. Returns `false` if `id` is not a text node.
    pub fn set_text(&mut self, id: NodeId, value: &str) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        match node.value() {
            Node::Text(text) => {
                text.text = value.into();
                true
            }
            _ => false,
        }
    }

    /// Parses `fragment` and appends its top-level nodes under `parent`.
    pub fn append_html(&mut self, parent: NodeId, fragment: &str) -> Result<Vec<NodeId>, RetextError> {
        self.ensure_exists(parent)?;
        let parsed = Html::parse_fragment(fragment);
        let Some(root) = parsed.tree.root().children().find_map(ElementRef::wrap) else {
            return Ok(Vec::new());
        };

        let mut added = Vec::new();
        for child in root.children() {
            let id = graft(&mut self.html.tree, parent, child)
                .ok_or_else(|| RetextError::MissingNode(format!("{:?}", parent)))?;
            added.push(id);
        }
        self.record(parent, added.clone());
        Ok(added)
    }

    /// Appends a new text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, value: &str) -> Result<NodeId, RetextError> {
        let mut node = self
            .html
            .tree
            .get_mut(parent)
            .ok_or_else(|| RetextError::MissingNode(format!("{:?}", parent)))?;
        let id = node
            .append(Node::Text(scraper::node::Text { text: value.into() }))
            .id();
        self.record(parent, vec![id]);
        Ok(id)
    }

    /// Detaches `node` and re-inserts it as the last child of `new_parent`.
    pub fn move_node(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), RetextError> {
        self.ensure_exists(node)?;
        let parent_ref = self
            .html
            .tree
            .get(new_parent)
            .ok_or_else(|| RetextError::MissingNode(format!("{:?}", new_parent)))?;
        if new_parent == node || parent_ref.ancestors().any(|a| a.id() == node) {
            return Err(RetextError::CyclicMove(format!("{:?}", node)));
        }
        if let Some(mut parent) = self.html.tree.get_mut(new_parent) {
            parent.append_id(node);
        }
        self.record(new_parent, vec![node]);
        Ok(())
    }

    /// Registers interest in child-list mutations. Until this is called no
    /// records are queued.
    pub fn observe(&mut self) {
        self.observed = true;
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    /// Drains every record queued since the last call, in mutation order.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending)
    }

    /// Serializes the whole document.
    pub fn html(&self) -> String {
        self.html.html()
    }

    fn record(&mut self, target: NodeId, added_nodes: Vec<NodeId>) {
        if !self.observed || added_nodes.is_empty() {
            return;
        }
        trace!("Queued mutation: {} node(s) added under {:?}.", added_nodes.len(), target);
        self.pending.push(MutationRecord { target, added_nodes });
    }

    fn ensure_exists(&self, id: NodeId) -> Result<(), RetextError> {
        self.html
            .tree
            .get(id)
            .map(|_| ())
            .ok_or_else(|| RetextError::MissingNode(format!("{:?}", id)))
    }
}

/// Copies `source` and its subtree under `parent`, returning the new node's id.
fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) -> Option<NodeId> {
    let id = tree.get_mut(parent)?.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child)?;
    }
    Some(id)
}
