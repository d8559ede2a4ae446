//! The browser-side applier: keeps a live document's text in sync with the
//! rule list, including content inserted after the initial pass.
//!
//! The applier runs on a single-threaded event loop. `start` performs the
//! initial pass over `<body>` and registers for child-list mutations;
//! `pump` delivers one batch of queued mutations. Only newly inserted nodes
//! are ever walked after startup.

use ego_tree::NodeId;
use log::{debug, warn};
use scraper::Node;
use std::borrow::Cow;
use std::collections::HashSet;

use crate::client::dom::{LiveDocument, MutationRecord};
use crate::client::payload::ClientPayload;
use crate::engines::html_text::inside_non_text_element;
use crate::errors::{CompileError, RetextError};
use crate::rules::apply_chain;
use crate::rules::compiler::{compile_client_rule, CompiledRule};

/// Elements whose subtrees are never rewritten in a live document.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// How a text node was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    /// Found by walking a subtree; respects the processed marker.
    Walk,
    /// Inserted on its own; always considered.
    Direct,
}

#[derive(Debug, Default)]
pub struct ClientSideApplier {
    rules: Vec<CompiledRule>,
    skipped: Vec<CompileError>,
    /// Elements whose text has already been substituted.
    processed: HashSet<NodeId>,
    observing: bool,
}

impl ClientSideApplier {
    /// Compiles every rule in the payload, dropping (and logging) any that fail.
    pub fn from_payload(payload: &ClientPayload) -> Self {
        let mut rules = Vec::with_capacity(payload.rules.len());
        let mut skipped = Vec::new();
        for (index, rule) in payload.rules.iter().enumerate() {
            match compile_client_rule(index, &rule.find, &rule.flags, &rule.replace) {
                Ok(compiled) => rules.push(compiled),
                Err(e) => {
                    warn!("Invalid client rule skipped: {}", e);
                    skipped.push(e);
                }
            }
        }
        debug!(
            "Client applier compiled {} rule(s), skipped {}.",
            rules.len(),
            skipped.len()
        );
        Self {
            rules,
            skipped,
            ..Default::default()
        }
    }

    /// Parses the embedded JSON payload. Blank or `null` input gives an inert applier.
    pub fn from_json(json: &str) -> Result<Self, RetextError> {
        Ok(Self::from_payload(&ClientPayload::from_json(json)?))
    }

    /// True when no rule compiled; such an applier never touches the document.
    pub fn is_inert(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Rules that failed to compile, with the reason.
    pub fn skipped(&self) -> &[CompileError] {
        &self.skipped
    }

    /// Runs the initial pass over the document and starts observing it.
    ///
    /// Returns the number of text nodes rewritten. An inert applier does
    /// nothing and registers no observer.
    pub fn start(&mut self, doc: &mut LiveDocument) -> usize {
        if self.is_inert() {
            debug!("No client rules; applier stays inert.");
            return 0;
        }
        let changed = match doc.body() {
            Some(body) => self.walk(doc, body),
            None => {
                warn!("Document has no <body>; skipping the initial pass.");
                0
            }
        };
        doc.observe();
        self.observing = true;
        debug!("Initial pass rewrote {} text node(s).", changed);
        changed
    }

    /// Delivers one batch of queued mutations, if observing.
    pub fn pump(&mut self, doc: &mut LiveDocument) -> usize {
        if !self.observing {
            return 0;
        }
        let records = doc.take_records();
        if records.is_empty() {
            return 0;
        }
        self.on_mutations(doc, &records)
    }

    /// Processes a batch of mutation records in the order given.
    ///
    /// Inserted elements get a full walk of their new subtree; inserted text
    /// nodes are processed directly. Nothing else is rescanned.
    pub fn on_mutations(&mut self, doc: &mut LiveDocument, records: &[MutationRecord]) -> usize {
        let mut changed = 0;
        for record in records {
            for &added in &record.added_nodes {
                let is_text = matches!(doc.node(added).map(|n| n.value()), Some(Node::Text(_)));
                let is_element = matches!(doc.node(added).map(|n| n.value()), Some(Node::Element(_)));
                if is_text {
                    if let Some(parent) = self.process_text_node(doc, added, Visit::Direct) {
                        self.processed.extend(parent);
                        changed += 1;
                    }
                } else if is_element {
                    changed += self.walk(doc, added);
                }
            }
        }
        if changed > 0 {
            debug!("Mutation batch rewrote {} text node(s).", changed);
        }
        changed
    }

    fn walk(&mut self, doc: &mut LiveDocument, root: NodeId) -> usize {
        let text_nodes: Vec<NodeId> = match doc.node(root) {
            Some(node) => node
                .descendants()
                .filter(|n| n.value().is_text())
                .map(|n| n.id())
                .collect(),
            None => return 0,
        };

        // Marks land after the whole subtree is visited, so a sibling text
        // node under the same element is still substituted in this walk.
        let mut marks = Vec::new();
        let mut changed = 0;
        for id in text_nodes {
            if let Some(parent) = self.process_text_node(doc, id, Visit::Walk) {
                marks.extend(parent);
                changed += 1;
            }
        }
        self.processed.extend(marks);
        changed
    }

    /// Substitutes one text node in place.
    ///
    /// Returns `None` when nothing changed, otherwise the parent element to
    /// mark as processed (if the text has one).
    fn process_text_node(&self, doc: &mut LiveDocument, id: NodeId, visit: Visit) -> Option<Option<NodeId>> {
        let node = doc.node(id)?;
        let text = doc.text(id)?;
        if text.trim().is_empty() || inside_non_text_element(node, SKIPPED_ELEMENTS) {
            return None;
        }

        let parent_element = node
            .parent()
            .filter(|p| p.value().is_element())
            .map(|p| p.id());
        if visit == Visit::Walk && parent_element.is_some_and(|p| self.processed.contains(&p)) {
            return None;
        }

        // Compute the full result first, then write it once, so freshly
        // written text is never rescanned in the same visit.
        let replaced = match apply_chain(text, &self.rules) {
            Cow::Owned(s) => s,
            Cow::Borrowed(_) => return None,
        };
        doc.set_text(id, &replaced);
        Some(parent_element)
    }
}
