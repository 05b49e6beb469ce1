/// The index of a [`Node`] slot inside a [`NodePool`]. Never exposed outside
/// of this crate; callers only ever see a [`crate::LeafHandle`] or a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("node pool exceeded u32::MAX nodes"))
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An intrusive, arena-allocated search tree node. Never user-visible: the
/// inbound move, game state, prior belief, and the sibling/child links that
/// make up the tree.
pub(crate) struct Node<S, M> {
    /// The move that reached this node. The root stores the `phony_move`
    /// passed to [`crate::Search::new`]/[`crate::Search::reset`].
    pub move_in: M,
    /// The state of the game at this node.
    pub game_state: S,
    /// The evaluator's prior belief for this node, as given by its parent's
    /// expansion.
    pub prior_probability: f32,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    /// Doubles as the freelist link for unused slots.
    pub next_sibling: Option<NodeId>,
    pub n_visits: u32,
    pub total_av: f64,
}

impl<S, M> Node<S, M> {
    /// A node is expanded once it has received its first backpropagated
    /// visit (via [`crate::Search::expand_leaf`] or a terminal revisit).
    pub fn expanded(&self) -> bool {
        self.n_visits > 0
    }

    /// A node is terminal if it is expanded but was given no children.
    pub fn terminal(&self) -> bool {
        self.expanded() && self.first_child.is_none()
    }
}

/// A typed arena of [`Node`] slots, indexed by [`NodeId`], with a freelist
/// threaded through the (otherwise unused, for free slots) `next_sibling`
/// field. Grounded on `mcts-player`'s `AreaAllocator`/`NodeId`, generalized
/// from its grow-only design to one with an explicit freelist so a `Search`
/// can survive many played moves without unbounded growth. Freed slots are
/// only ever reused within the pool that freed them.
pub(crate) struct NodePool<S, M> {
    slots: Vec<Node<S, M>>,
    free_head: Option<NodeId>,
    free_count: usize,
}

impl<S, M> NodePool<S, M> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            free_count: 0,
        }
    }

    /// The number of live (non-freed) nodes in the pool.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free_count
    }

    /// Ensures that `additional` more nodes can be allocated without the
    /// backing `Vec` needing to grow mid-expansion. Called before any nodes
    /// are constructed so that a failure here never leaves a partially
    /// linked child list behind.
    pub fn reserve(&mut self, additional: usize) -> crate::SearchResult<()> {
        let short_of_freelist = additional.saturating_sub(self.free_count);
        if short_of_freelist > 0 {
            self.slots.try_reserve(short_of_freelist).map_err(|_| {
                anyhow::Error::new(crate::MctsError::AllocationFailure {
                    reason: "node pool growth failed",
                })
            })?;
        }
        Ok(())
    }

    /// Allocates a slot for `node`, reusing a freed slot if one is
    /// available. Infallible in practice once the caller has called
    /// [`Self::reserve`] for the number of nodes it is about to allocate.
    pub fn alloc(&mut self, node: Node<S, M>) -> NodeId {
        if let Some(id) = self.free_head {
            self.free_head = self.slots[id.index()].next_sibling;
            self.free_count -= 1;
            self.slots[id.index()] = node;
            id
        } else {
            let id = NodeId::from_index(self.slots.len());
            self.slots.push(node);
            id
        }
    }

    pub fn get(&self, id: NodeId) -> &Node<S, M> {
        &self.slots[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S, M> {
        &mut self.slots[id.index()]
    }

    /// Returns a single node's slot to the freelist. Does not touch its
    /// (by now former) children; callers must free a subtree bottom-up or
    /// via [`Self::free_subtree`].
    pub fn free(&mut self, id: NodeId) {
        let slot = &mut self.slots[id.index()];
        slot.first_child = None;
        slot.parent = None;
        slot.next_sibling = self.free_head;
        self.free_head = Some(id);
        self.free_count += 1;
    }

    /// Frees `root` and every node reachable from it. Uses an explicit stack
    /// rather than recursion, per the design's preference for looping over
    /// the freelist chain instead of recursing through the tree.
    pub fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let mut next_child = self.slots[id.index()].first_child;
            while let Some(child_id) = next_child {
                next_child = self.slots[child_id.index()].next_sibling;
                stack.push(child_id);
            }
            self.free(id);
        }
    }
}
