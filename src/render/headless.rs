//! Headless backend: an in-memory node arena.
//!
//! [`Headless`] implements [`Backend`] without any platform. Nodes live in a
//! `SlotMap`; parent/child relationships are stored in secondary maps so that
//! reparenting and subtree removal stay cheap. Tests and demos inspect the
//! resulting tree directly or through [`snapshot`](super::snapshot).

use std::any::Any;
use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::backend::{Backend, CellLayout, NodeHandle, NodeOwner, NodeSpec};
use crate::container::{CellAlignment, ContainerSizing};
use crate::data::SortOrder;
use crate::identity::WidgetId;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeHandle] = &[];

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// One node of the headless tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub role: &'static str,
    pub owner: NodeOwner,
    pub label: Option<String>,
    pub active: bool,
    pub visible: bool,
    pub selected: bool,
    pub sort: Option<SortOrder>,
    pub cell: Option<CellLayout>,
    pub alignment: Option<CellAlignment>,
    pub sizing: Option<ContainerSizing>,
}

impl Element {
    fn from_spec(spec: &NodeSpec) -> Self {
        Self {
            role: spec.role,
            owner: spec.owner,
            label: spec.label.clone(),
            active: spec.active,
            visible: true,
            selected: false,
            sort: None,
            cell: spec.cell,
            alignment: spec.alignment,
            sizing: spec.sizing,
        }
    }

    /// The widget this node is the root of, if any.
    pub fn widget(&self) -> Option<WidgetId> {
        match self.owner {
            NodeOwner::Widget(id) => Some(id),
            NodeOwner::Part => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Headless
// ---------------------------------------------------------------------------

/// In-memory rendering backend.
#[derive(Debug, Default)]
pub struct Headless {
    nodes: SlotMap<NodeHandle, Element>,
    children: SecondaryMap<NodeHandle, Vec<NodeHandle>>,
    parent: SecondaryMap<NodeHandle, NodeHandle>,
    root: Option<NodeHandle>,
    created: usize,
    replaced: usize,
}

impl Headless {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of nodes ever created.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Total number of `replace` calls that swapped a node.
    pub fn replaced_count(&self) -> usize {
        self.replaced
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no live nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a node is live.
    pub fn contains(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(node)
    }

    /// Immutable access to a node.
    pub fn get(&self, node: NodeHandle) -> Option<&Element> {
        self.nodes.get(node)
    }

    /// The mounted root, if any.
    pub fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    /// Parent of a node.
    pub fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.parent.get(node).copied()
    }

    /// Children of a node. Empty if the node has none or does not exist.
    pub fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.children
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Live root node of the given widget, if materialized.
    pub fn find_widget(&self, id: WidgetId) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(_, el)| el.owner == NodeOwner::Widget(id))
            .map(|(handle, _)| handle)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeHandle) -> Vec<NodeHandle> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Whether `node` and every ancestor are visible.
    pub fn is_rendered_visible(&self, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            match self.nodes.get(n) {
                Some(el) if el.visible => current = self.parent(n),
                _ => return false,
            }
        }
        true
    }

    fn detach(&mut self, node: NodeHandle) {
        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != node);
            }
        }
    }

    fn attach(&mut self, node: NodeHandle, parent: NodeHandle) {
        self.detach(node);
        self.parent.insert(node, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(node);
        }
    }

    fn remove_one(&mut self, node: NodeHandle) -> Vec<NodeHandle> {
        self.parent.remove(node);
        if self.root == Some(node) {
            self.root = None;
        }
        self.nodes.remove(node);
        self.children.remove(node).unwrap_or_default()
    }

    /// Destroy `node` and its auxiliary parts; widget roots below are orphaned.
    fn discard(&mut self, node: NodeHandle) {
        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            for child in self.remove_one(current) {
                let owned_by_widget = matches!(
                    self.nodes.get(child).map(|el| el.owner),
                    Some(NodeOwner::Widget(_))
                );
                if owned_by_widget {
                    self.parent.remove(child);
                } else {
                    queue.push_back(child);
                }
            }
        }
    }
}

impl Backend for Headless {
    fn create(&mut self, spec: NodeSpec) -> NodeHandle {
        let id = self.nodes.insert(Element::from_spec(&spec));
        self.children.insert(id, Vec::new());
        for child in spec.children {
            if self.nodes.contains_key(child) {
                self.attach(child, id);
            }
        }
        self.created += 1;
        id
    }

    fn replace(&mut self, old: NodeHandle, new: NodeHandle) {
        if old == new || !self.nodes.contains_key(old) || !self.nodes.contains_key(new) {
            return;
        }
        self.detach(new);
        if let Some(p) = self.parent.remove(old) {
            self.parent.insert(new, p);
            if let Some(siblings) = self.children.get_mut(p) {
                for slot in siblings.iter_mut() {
                    if *slot == old {
                        *slot = new;
                    }
                }
            }
        }
        if self.root == Some(old) {
            self.root = Some(new);
        }
        self.discard(old);
        self.replaced += 1;
    }

    fn release(&mut self, node: NodeHandle) {
        if !self.nodes.contains_key(node) {
            return;
        }
        self.detach(node);
        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            queue.extend(self.remove_one(current));
        }
    }

    fn mount(&mut self, node: NodeHandle) {
        if self.nodes.contains_key(node) {
            self.detach(node);
            self.root = Some(node);
        }
    }

    fn set_visible(&mut self, node: NodeHandle, visible: bool) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.visible = visible;
        }
    }

    fn set_active(&mut self, node: NodeHandle, active: bool) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.active = active;
        }
    }

    fn set_selected(&mut self, node: NodeHandle, selected: bool) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.selected = selected;
        }
    }

    fn set_sort_indicator(&mut self, node: NodeHandle, order: Option<SortOrder>) {
        if let Some(el) = self.nodes.get_mut(node) {
            el.sort = order;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
