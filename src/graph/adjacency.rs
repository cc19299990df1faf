//! adjacency.rs
//! Engine-owned parent/child lists, mutated in place by contraction.

use crate::store::NodeId;
use smallvec::SmallVec;

pub type NodeList = SmallVec<[NodeId; 4]>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjacency {
    parents: Vec<NodeList>,
    children: Vec<NodeList>,
    live: Vec<bool>,
}

impl Adjacency {
    pub fn with_nodes(count: usize) -> Self {
        Self {
            parents: vec![NodeList::new(); count],
            children: vec![NodeList::new(); count],
            live: vec![true; count],
        }
    }

    pub fn count(&self) -> usize { self.live.len() }

    pub fn contains(&self, id: NodeId) -> bool { id.index() < self.live.len() }

    #[inline(always)]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.live.get(id.index()).copied().unwrap_or(false)
    }

    #[inline(always)]
    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.parents.get(id.index()).map(|l| l.as_slice()).unwrap_or(&[])
    }

    #[inline(always)]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id.index()).map(|l| l.as_slice()).unwrap_or(&[])
    }

    pub fn set_parents(&mut self, id: NodeId, parents: &[NodeId]) {
        self.parents[id.index()] = parents.iter().copied().collect();
    }

    pub fn set_children(&mut self, id: NodeId, children: &[NodeId]) {
        self.children[id.index()] = children.iter().copied().collect();
    }

    /// Adds `parent -> child` on both sides, skipping sides that already hold it.
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        push_unique(&mut self.children[parent.index()], child);
        push_unique(&mut self.parents[child.index()], parent);
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.children[parent.index()].retain(|c| *c != child);
    }

    pub fn remove_parent(&mut self, child: NodeId, parent: NodeId) {
        self.parents[child.index()].retain(|p| *p != parent);
    }

    /// Drops `id` from the live node set and forgets its children.
    pub fn retire(&mut self, id: NodeId) {
        self.live[id.index()] = false;
        self.children[id.index()].clear();
    }

    pub fn live_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.live.iter().enumerate().filter(|(_, l)| **l).map(|(i, _)| NodeId::new(i))
    }
}

fn push_unique(list: &mut NodeList, id: NodeId) {
    if !list.contains(&id) {
        list.push(id);
    }
}
