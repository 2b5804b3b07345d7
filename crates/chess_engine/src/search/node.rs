//! Shared search tree node
//!
//! Every worker walks the same tree. Ownership flows from the root down
//! through `Arc` children; the parent link is a `Weak` so the tree frees
//! itself when the root handle drops. Statistics are plain atomics, and the
//! child list is written exactly once through a `OnceLock`, which is the only
//! point where two workers ever wait on each other.
//!
//! ## Value Polarity
//!
//! `value / visits` at a node is the win probability of the player who moved
//! *into* that node (the parent's side to move). A parent therefore picks the
//! child with the highest mean for itself, and leaf values alternate between
//! `v` and `1 - v` on the way back to the root.

use crate::board::Position;
use crate::constants::UNVISITED_SCORE;
use crate::error::ChessEngineResult;
use crate::moves::Move;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

/// `f64` accumulator stored as bits in an `AtomicU64`
#[derive(Debug, Default)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    #[inline]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Lock-free add using compare-and-swap
    pub fn fetch_add(&self, delta: f64) -> f64 {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + delta).to_bits();
            match self
                .bits
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(previous) => return f64::from_bits(previous),
                Err(actual) => current = actual,
            }
        }
    }
}

#[derive(Debug)]
pub struct Node {
    position: Position,
    /// Move that produced this node; `Move::NULL` at the root
    mv: Move,
    parent: Weak<Node>,
    children: OnceLock<ChessEngineResult<Vec<Arc<Node>>>>,
    visits: AtomicU32,
    value: AtomicF64,
    in_flight: AtomicU32,
}

impl Node {
    pub fn root(position: Position) -> Arc<Node> {
        Arc::new(Node::new(position, Move::NULL, Weak::new()))
    }

    fn new(position: Position, mv: Move, parent: Weak<Node>) -> Node {
        Node {
            position,
            mv,
            parent,
            children: OnceLock::new(),
            visits: AtomicU32::new(0),
            value: AtomicF64::default(),
            in_flight: AtomicU32::new(0),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn mv(&self) -> Move {
        self.mv
    }

    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.upgrade()
    }

    pub fn visits(&self) -> u32 {
        self.visits.load(Ordering::Acquire)
    }

    /// Accumulated value from the perspective of the player who moved here
    pub fn value(&self) -> f64 {
        self.value.load()
    }

    pub fn mean(&self) -> f64 {
        match self.visits() {
            0 => 0.0,
            n => self.value() / f64::from(n),
        }
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_expanded(&self) -> bool {
        self.children.get().is_some()
    }

    /// Children, or an empty slice before expansion
    pub fn children(&self) -> &[Arc<Node>] {
        match self.children.get() {
            Some(Ok(children)) => children,
            _ => &[],
        }
    }

    /// Generate the children once; later callers get the stored list
    ///
    /// Pseudo-moves that leave the king attacked are dropped here. An
    /// expansion that hits a contract violation is stored as that error and
    /// reported to every later caller.
    pub fn expand(self: &Arc<Self>) -> ChessEngineResult<&[Arc<Node>]> {
        let result = self.children.get_or_init(|| {
            let parent = Arc::downgrade(self);
            let children = self.position.legal_children()?;
            Ok(children
                .into_iter()
                .map(|(mv, position)| Arc::new(Node::new(position, mv, parent.clone())))
                .collect())
        });
        match result {
            Ok(children) => Ok(children),
            Err(err) => Err(err.clone()),
        }
    }

    pub(crate) fn add_in_flight(&self) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn release_in_flight(&self) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Selection priority seen from the parent
    ///
    /// Unvisited children sort above every visited one; among themselves the
    /// one with the fewest workers already heading there wins. Visited
    /// children are ranked by UCB1, with in-flight workers counted as losses
    /// when `virtual_loss` is set.
    pub fn priority(&self, parent_visits: u32, exploration: f64, virtual_loss: bool) -> (bool, f64) {
        let visits = self.visits();
        let pending = if virtual_loss { self.in_flight() } else { 0 };
        if visits == 0 {
            return (true, UNVISITED_SCORE - f64::from(pending));
        }
        let n = f64::from(visits + pending);
        let explore = (f64::from(parent_visits.max(1)).ln() / n).sqrt();
        (false, self.value() / n + exploration * explore)
    }

    /// Child with the highest selection priority; ties go to the first
    pub fn select_child(&self, exploration: f64, virtual_loss: bool) -> Option<&Arc<Node>> {
        let parent_visits = self.visits();
        let mut best: Option<(&Arc<Node>, (bool, f64))> = None;
        for child in self.children() {
            let priority = child.priority(parent_visits, exploration, virtual_loss);
            match best {
                Some((_, top)) if priority <= top => {}
                _ => best = Some((child, priority)),
            }
        }
        best.map(|(child, _)| child)
    }

    /// Record a leaf value from here up to the root
    ///
    /// `value` is the win probability of this node's side to move. Each node
    /// on the way also drops one in-flight marker.
    pub fn backpropagate(self: &Arc<Self>, value: f64) {
        self.propagate(value, true);
    }

    /// Like [`Node::backpropagate`] but leaves in-flight markers alone, for
    /// values recorded below a path that releases its own markers once
    pub(crate) fn record(self: &Arc<Self>, value: f64) {
        self.propagate(value, false);
    }

    fn propagate(self: &Arc<Self>, value: f64, release: bool) {
        let mut reward = 1.0 - value;
        let mut current = Some(Arc::clone(self));
        while let Some(node) = current {
            node.value.fetch_add(reward);
            node.visits.fetch_add(1, Ordering::AcqRel);
            if release {
                node.release_in_flight();
            }
            reward = 1.0 - reward;
            current = node.parent();
        }
    }

    /// Nodes in this subtree, this one included
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children().iter().map(|child| child.as_ref()));
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_f64_accumulates() {
        let acc = AtomicF64::new(0.25);
        assert_eq!(acc.fetch_add(0.5), 0.25);
        assert_eq!(acc.load(), 0.75);
    }

    #[test]
    fn test_expand_once() {
        let root = Node::root(Position::startpos());
        assert!(!root.is_expanded());
        let first = root.expand().unwrap().as_ptr();
        let second = root.expand().unwrap().as_ptr();
        assert_eq!(first, second, "expansion must be reused");
        assert_eq!(root.children().len(), 20);
        assert!(root.children().iter().all(|c| Arc::ptr_eq(&c.parent().unwrap(), &root)));
    }

    #[test]
    fn test_unvisited_child_beats_visited_sibling() {
        let root = Node::root(Position::startpos());
        root.expand().unwrap();
        root.backpropagate(0.5);
        // a perfect child: every visit a win for the mover
        let favourite = Arc::clone(&root.children()[0]);
        for _ in 0..50 {
            favourite.backpropagate(0.0);
        }
        let picked = root.select_child(10.0, true).unwrap();
        assert_eq!(picked.visits(), 0, "an unvisited child must be picked first");
        assert!(!Arc::ptr_eq(picked, &favourite));
    }

    #[test]
    fn test_in_flight_spreads_unvisited_picks() {
        let root = Node::root(Position::startpos());
        root.expand().unwrap();
        let first = Arc::clone(root.select_child(0.8, true).unwrap());
        first.add_in_flight();
        let second = root.select_child(0.8, true).unwrap();
        assert!(!Arc::ptr_eq(&first, second), "busy child should be deprioritized");
        first.release_in_flight();
        first.release_in_flight();
        assert_eq!(first.in_flight(), 0, "release never underflows");
    }

    #[test]
    fn test_record_keeps_in_flight_markers() {
        let root = Node::root(Position::startpos());
        root.expand().unwrap();
        root.add_in_flight();
        for child in root.children() {
            child.record(0.5);
        }
        assert_eq!(root.visits(), 20);
        assert_eq!(root.in_flight(), 1, "only the owning path releases its marker");
    }

    #[test]
    fn test_backpropagate_alternates_polarity() {
        let root = Node::root(Position::startpos());
        root.expand().unwrap();
        let child = Arc::clone(&root.children()[0]);
        child.expand().unwrap();
        let grandchild = Arc::clone(&child.children()[0]);

        // white to move at the grandchild wins with 0.9
        grandchild.backpropagate(0.9);
        assert!((grandchild.mean() - 0.1).abs() < 1e-12, "black moved into the grandchild");
        assert!((child.mean() - 0.9).abs() < 1e-12, "white moved into the child");
        assert!((root.mean() - 0.1).abs() < 1e-12);
        assert_eq!(root.visits(), 1);
        assert_eq!(root.subtree_size(), 1 + 20 + 20);
    }

    #[test]
    fn test_ucb_prefers_better_mean_at_equal_visits() {
        let root = Node::root(Position::startpos());
        root.expand().unwrap();
        for (i, child) in root.children().iter().enumerate() {
            // child 3 wins for white, the rest lose
            child.backpropagate(if i == 3 { 0.0 } else { 1.0 });
        }
        let picked = root.select_child(0.8, false).unwrap();
        assert!(Arc::ptr_eq(picked, &root.children()[3]));
    }
}
