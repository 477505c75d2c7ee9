//! Arena-based layout tree.
//!
//! The tree models only what the geometry probe needs from a page: block
//! nodes with a parent link, an `offset_top` relative to that parent, and a
//! height. A node is *attached* when its parent chain reaches the document
//! root; detached subtrees can be built up and attached later.
//!
//! ## Key Features
//!
//! - **Generational Indices**: `NodeId` contains index + generation so a
//!   stale id never resolves to a node that reused its slot.
//!
//! - **Free List**: removed slots are reused by later insertions.
//!
//! - **Block Stacking**: `stack_children` lays children out top to bottom,
//!   which is how most page sections end up positioned.

/// Unique identifier for a node in the tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Convert to a u64 for external use (e.g. renderer container handles).
    /// Combines generation (high bits) with index (low bits).
    pub fn as_u64(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Distance from the parent's top edge.
    offset_top: f32,
    height: f32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Block layout tree rooted at the document.
#[derive(Debug)]
pub struct LayoutTree {
    slots: Vec<Slot>,
    free_indices: Vec<u32>,
    root: NodeId,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// Create a tree containing only the document root.
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free_indices: Vec::new(),
            root: NodeId::new(0, 0),
        };
        tree.root = tree.create_node(0.0);
        tree
    }

    /// The document root. Always attached.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node with the given height.
    pub fn create_node(&mut self, height: f32) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            offset_top: 0.0,
            height,
        };

        if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId::new(index, 0)
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Appending a node under itself or one of its
    /// descendants is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            return;
        }

        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Unlink a node from its parent. The node and its subtree stay alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Remove a node and its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }

        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                self.free_indices.push(current.index);
            }
        }
    }

    /// Whether `ancestor` appears on the parent chain of `id` (or is `id`).
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.parent(node_id);
        }
        false
    }

    /// Whether the node's parent chain reaches the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor(self.root, id)
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Get the children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn offset_top(&self, id: NodeId) -> Option<f32> {
        self.node(id).map(|n| n.offset_top)
    }

    pub fn set_offset_top(&mut self, id: NodeId, offset_top: f32) {
        if let Some(node) = self.node_mut(id) {
            node.offset_top = offset_top;
        }
    }

    pub fn height(&self, id: NodeId) -> Option<f32> {
        self.node(id).map(|n| n.height)
    }

    pub fn set_height(&mut self, id: NodeId, height: f32) {
        if let Some(node) = self.node_mut(id) {
            node.height = height;
        }
    }

    /// Position children of `parent` one below the other, starting at 0.
    /// Returns the total stacked height.
    pub fn stack_children(&mut self, parent: NodeId) -> f32 {
        let children = self.children(parent).to_vec();
        let mut y = 0.0;
        for child in children {
            self.set_offset_top(child, y);
            y += self.height(child).unwrap_or(0.0);
        }
        y
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
