//! Reference decision diagram engine.
//!
//! A small hash-consed BDD manager with complement edges. The counters never depend on it directly:
//! they consume it through [`DiagramView`][crate::view::DiagramView] and
//! [`DiagramBuilder`][crate::view::DiagramBuilder], so any other engine can be plugged in instead.
//!
//! Variables are 0-indexed and ordered by their index: a node always tests a smaller variable
//! than any node below it.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::node::Node;
use crate::reference::{NodeId, Ref};

pub struct Bdd {
    nodes: RefCell<Vec<Node>>,
    unique: RefCell<HashMap<Node, NodeId>>,
    cache: RefCell<HashMap<(Ref, Ref, Ref), Ref>>,
    num_vars: Cell<u32>,
}

impl Bdd {
    pub const ONE: Ref = Ref::positive(NodeId::TERMINAL);
    pub const ZERO: Ref = Ref::negative(NodeId::TERMINAL);

    /// Creates a manager with room for `2^storage_bits` nodes before the arena reallocates.
    pub fn new(storage_bits: usize) -> Self {
        assert!(
            storage_bits <= 31,
            "Storage bits should be in the range 0..=31"
        );

        let capacity = 1 << storage_bits;
        let cache_bits = storage_bits.min(16);

        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(Node::terminal());

        Self {
            nodes: RefCell::new(nodes),
            unique: RefCell::new(HashMap::with_capacity(capacity)),
            cache: RefCell::new(HashMap::with_capacity(1 << cache_bits)),
            num_vars: Cell::new(0),
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(16)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdd")
            .field("nodes", &self.nodes.borrow().len())
            .field("cache", &self.cache.borrow().len())
            .field("num_vars", &self.num_vars.get())
            .finish()
    }
}

impl Bdd {
    pub fn zero(&self) -> Ref {
        Self::ZERO
    }
    pub fn one(&self) -> Ref {
        Self::ONE
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == Self::ZERO
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == Self::ONE
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.id() == NodeId::TERMINAL
    }

    /// Number of variables the manager has seen: one more than the largest variable index in use.
    pub fn num_vars(&self) -> u32 {
        self.num_vars.get()
    }

    /// Total number of allocated nodes, including the terminal.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn variable(&self, id: NodeId) -> u32 {
        self.nodes.borrow()[id.index()].variable
    }
    pub fn low(&self, id: NodeId) -> Ref {
        self.nodes.borrow()[id.index()].low
    }
    pub fn high(&self, id: NodeId) -> Ref {
        self.nodes.borrow()[id.index()].high
    }

    /// Low child of `node`, with the complement of `node` pushed down.
    pub fn low_node(&self, node: Ref) -> Ref {
        self.low(node.id()).negate_if(node.is_negated())
    }
    /// High child of `node`, with the complement of `node` pushed down.
    pub fn high_node(&self, node: Ref) -> Ref {
        self.high(node.id()).negate_if(node.is_negated())
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        assert_ne!(
            v,
            Node::TERMINAL_VARIABLE,
            "Variable index is reserved for the terminal"
        );

        // Handle canonicity
        if high.is_negated() {
            debug!("mk: restoring canonicity");
            return -self.mk_node(v, -low, -high);
        }

        // Handle duplicates
        if low == high {
            debug!("mk: duplicates {} == {}", low, high);
            return low;
        }

        let node = Node {
            variable: v,
            low,
            high,
        };
        if let Some(&id) = self.unique.borrow().get(&node) {
            return Ref::positive(id);
        }

        let id = {
            let mut nodes = self.nodes.borrow_mut();
            let id = NodeId::new(nodes.len() as u32);
            nodes.push(node);
            id
        };
        self.unique.borrow_mut().insert(node, id);
        if v >= self.num_vars.get() {
            self.num_vars.set(v + 1);
        }
        Ref::positive(id)
    }

    pub fn mk_var(&self, v: u32) -> Ref {
        self.mk_node(v, Self::ZERO, Self::ONE)
    }

    /// Cofactors of `node` with respect to `v`, assuming `v` is not below the top variable of `node`.
    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        if self.is_terminal(node) || v < self.variable(node.id()) {
            return (node, node);
        }
        assert_eq!(v, self.variable(node.id()));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_count::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.mk_var(0);
    /// let y = bdd.mk_var(1);
    /// let z = bdd.mk_var(2);
    /// let f = bdd.apply_ite(x, y, z);
    /// let x_and_y = bdd.apply_and(x, y);
    /// let not_x_and_z = bdd.apply_and(-x, z);
    /// assert_eq!(f, bdd.apply_or(x_and_y, not_x_and_z));
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,G,~F) => ite(F,G,1)
        let g = if g == f {
            Self::ONE
        } else if g == -f {
            Self::ZERO
        } else {
            g
        };
        let h = if h == f {
            Self::ZERO
        } else if h == -f {
            Self::ONE
        } else {
            h
        };

        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // ite(~F,G,H) => ite(F,H,G)
        let (f, g, h) = if f.is_negated() { (-f, h, g) } else { (f, g, h) };
        // ite(F,~G,H) => ~ite(F,G,~H)
        let negate = g.is_negated();
        let (g, h) = if negate { (-g, -h) } else { (g, h) };

        let key = (f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return res.negate_if(negate);
        }

        // Terminals report `TERMINAL_VARIABLE`, which never wins the minimum.
        let m = self
            .variable(f.id())
            .min(self.variable(g.id()))
            .min(self.variable(h.id()));

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(m, e, t);
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        res.negate_if(negate)
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, Self::ZERO)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, Self::ONE, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        nodes
            .into_iter()
            .fold(Self::ONE, |acc, node| self.apply_and(acc, node))
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        nodes
            .into_iter()
            .fold(Self::ZERO, |acc, node| self.apply_or(acc, node))
    }

    /// Evaluates `f` under a full assignment, indexed by variable.
    ///
    /// # Panics
    ///
    /// Panics if `f` tests a variable outside of `assignment`.
    pub fn eval(&self, f: Ref, assignment: &[bool]) -> bool {
        let mut current = f;
        while !self.is_terminal(current) {
            let v = self.variable(current.id()) as usize;
            current = if assignment[v] {
                self.high_node(current)
            } else {
                self.low_node(current)
            };
        }
        self.is_one(current)
    }

    /// Ids of all nodes reachable from `nodes`, the terminal included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        visited.insert(NodeId::TERMINAL);
        let mut queue = VecDeque::from_iter(nodes.into_iter().map(|node| node.id()));

        while let Some(id) = queue.pop_front() {
            if visited.insert(id) {
                queue.push_back(self.low(id).id());
                queue.push_back(self.high(id).id());
            }
        }

        visited
    }

    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(0);

        assert_eq!(bdd.variable(x.id()), 0);
        assert_eq!(bdd.high_node(x), bdd.one());
        assert_eq!(bdd.low_node(x), bdd.zero());
        assert_eq!(bdd.num_vars(), 1);
    }

    #[test]
    fn test_not_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(3);
        let not_x = -x;

        assert_eq!(bdd.variable(not_x.id()), 3);
        assert_eq!(bdd.high_node(not_x), bdd.zero());
        assert_eq!(bdd.low_node(not_x), bdd.one());
        assert_eq!(bdd.num_vars(), 4);
    }

    #[test]
    fn test_terminal() {
        let bdd = Bdd::default();

        assert!(bdd.is_terminal(bdd.zero()));
        assert!(bdd.is_zero(bdd.zero()));
        assert!(!bdd.is_one(bdd.zero()));

        assert!(bdd.is_terminal(bdd.one()));
        assert!(!bdd.is_zero(bdd.one()));
        assert!(bdd.is_one(bdd.one()));

        assert_eq!(bdd.zero(), -bdd.one());
        assert_eq!(bdd.num_nodes(), 1);
    }

    #[test]
    fn test_mk_node_reduces() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        assert_eq!(bdd.mk_node(0, x, x), x);
        assert_eq!(bdd.mk_var(1), x);

        // Complemented high edge is pushed to the reference.
        let n = bdd.mk_node(0, bdd.one(), bdd.zero());
        assert!(n.is_negated());
        assert_eq!(n, -bdd.mk_var(0));
    }

    #[test]
    fn test_de_morgan() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(0);
        let y = bdd.mk_var(1);

        assert_eq!(-bdd.apply_and(x, y), bdd.apply_or(-x, -y));
        assert_eq!(-bdd.apply_or(x, y), bdd.apply_and(-x, -y));
    }

    #[test]
    fn test_xor() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(0);
        let y = bdd.mk_var(1);
        let f = bdd.apply_and(x, y);

        assert_eq!(bdd.apply_xor(f, f), bdd.zero());
        assert_eq!(bdd.apply_xor(f, -f), bdd.one());
        assert_eq!(bdd.apply_xor(x, y), bdd.apply_xor(y, x));
    }

    #[test]
    fn test_apply_ite() {
        let bdd = Bdd::default();

        let g = bdd.mk_var(1);
        let h = bdd.mk_var(2);
        assert_eq!(bdd.apply_ite(bdd.one(), g, h), g);
        assert_eq!(bdd.apply_ite(bdd.zero(), g, h), h);

        let f = bdd.mk_node(0, bdd.one(), h);
        assert_eq!(bdd.apply_ite(f, f, h), bdd.apply_or(f, h));
        assert_eq!(bdd.apply_ite(f, g, f), bdd.apply_and(f, g));
        assert_eq!(bdd.apply_ite(f, -g, bdd.one()), -bdd.apply_and(f, g));

        let f = bdd.mk_var(4);
        assert_eq!(bdd.apply_ite(f, g, g), g);
        assert_eq!(bdd.apply_ite(f, bdd.one(), bdd.zero()), f);
        assert_eq!(bdd.apply_ite(f, bdd.zero(), bdd.one()), -f);
    }

    #[test]
    fn test_many() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(0);
        let y = bdd.mk_var(1);
        let z = bdd.mk_var(2);

        let f = bdd.apply_and_many([x, y, z]);
        assert_eq!(f, bdd.apply_and(bdd.apply_and(x, y), z));
        assert_eq!(bdd.apply_and_many([]), bdd.one());

        let g = bdd.apply_or_many([x, y, z]);
        assert_eq!(g, bdd.apply_or(bdd.apply_or(x, y), z));
        assert_eq!(bdd.apply_or_many([]), bdd.zero());
    }

    #[test]
    fn test_eval() {
        let bdd = Bdd::default();

        let x0 = bdd.mk_var(0);
        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);

        // (x0 ∧ x1) ∨ x2
        let f = bdd.apply_or(bdd.apply_and(x0, x1), x2);

        assert!(bdd.eval(f, &[true, true, false]));
        assert!(bdd.eval(f, &[false, false, true]));
        assert!(!bdd.eval(f, &[true, false, false]));
        assert!(bdd.eval(-f, &[true, false, false]));
        assert!(bdd.eval(bdd.one(), &[]));
        assert!(!bdd.eval(bdd.zero(), &[]));
    }

    #[test]
    fn test_size() {
        let bdd = Bdd::default();

        let x0 = bdd.mk_var(0);
        let x1 = bdd.mk_var(1);
        let f = bdd.apply_and(x0, x1);

        assert_eq!(bdd.size(bdd.one()), 1);
        assert_eq!(bdd.size(x0), 2);
        assert_eq!(bdd.size(f), 3);
        assert_eq!(bdd.size(-f), 3);
    }
}
