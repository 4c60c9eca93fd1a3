//! Unconditioned model counting.
//!
//! The count of a node covers only the variables from its own index downwards. Variables that a
//! reduced diagram skips between a node and its child are free, so each child's count is scaled
//! by `2^gap` at the parent. The variables above the root are accounted for once, at the top.

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::bdd::Bdd;
use crate::conditioned::ConditionedModelCounter;
use crate::config::{CounterConfig, Traversal};
use crate::error::CountError;
use crate::observation::ObservationSet;
use crate::reference::Ref;
use crate::table::CountTable;
use crate::utils::{gap, pow2};
use crate::view::DiagramView;

/// Position of `node` in the variable order. Both terminals sit at `num_vars`, below every variable.
pub fn index_of<D: DiagramView>(view: &D, num_vars: u32, node: D::Node) -> u64 {
    if view.is_terminal(node) {
        u64::from(num_vars)
    } else {
        u64::from(view.variable(node))
    }
}

/// Scales `count` by the free variables strictly between `index` and `child_index`.
pub(crate) fn scale(count: BigUint, index: u64, child_index: u64) -> Result<BigUint, CountError> {
    let free = gap(index, child_index).ok_or(CountError::OrderViolation {
        parent: index,
        child: child_index,
    })?;
    if count.is_zero() {
        return Ok(count);
    }
    Ok(count * pow2(free))
}

#[derive(Debug, Copy, Clone)]
enum Visit {
    Enter,
    Exit,
}

/// Counts satisfying assignments of a diagram over `num_vars` variables.
///
/// Every node visited gets its count recorded in the [`CountTable`], so nodes shared by several
/// parents are counted once, and later [conditioned](ModelCounter::count_observed) queries can
/// reuse the table.
///
/// ```
/// use bdd_count::bdd::Bdd;
/// use bdd_count::sat::ModelCounter;
/// use num_bigint::BigUint;
///
/// let bdd = Bdd::default();
/// let x0 = bdd.mk_var(0);
/// let x1 = bdd.mk_var(1);
/// let x2 = bdd.mk_var(2);
/// let f = bdd.apply_or(bdd.apply_and(x0, x1), x2);
///
/// let mut counter = ModelCounter::new(&bdd, 3);
/// assert_eq!(counter.count(f).unwrap(), BigUint::from(5u32));
/// ```
pub struct ModelCounter<'a, D: DiagramView> {
    view: &'a D,
    num_vars: u32,
    table: CountTable<D::Node>,
    config: CounterConfig,
}

impl<'a, D: DiagramView> ModelCounter<'a, D> {
    pub fn new(view: &'a D, num_vars: u32) -> Self {
        Self::with_config(view, num_vars, CounterConfig::default())
    }

    pub fn with_config(view: &'a D, num_vars: u32, config: CounterConfig) -> Self {
        Self {
            view,
            num_vars,
            table: CountTable::with_limit(config.table_bits(), config.table_limit()),
            config,
        }
    }

    pub fn view(&self) -> &'a D {
        self.view
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn table(&self) -> &CountTable<D::Node> {
        &self.table
    }

    pub fn index_of(&self, node: D::Node) -> u64 {
        index_of(self.view, self.num_vars, node)
    }

    /// Number of assignments to all `num_vars` variables that satisfy `root`.
    pub fn count(&mut self, root: D::Node) -> Result<BigUint, CountError> {
        debug!("count(root = {})", root);

        let count = match self.config.traversal() {
            Traversal::Recursive => self.count_at(root)?,
            Traversal::Iterative => self.count_iterative(root)?,
        };

        // Everything above the root is free.
        let index = self.index_of(root);
        let count = if count.is_zero() {
            count
        } else {
            count * pow2(index)
        };
        debug!("computed: count(root = {}) -> {}", root, count);
        Ok(count)
    }

    /// Number of satisfying assignments that agree with `observations`.
    ///
    /// Reuses the table filled by [`count`](Self::count), which must have been called on `root`
    /// (or on a diagram containing it) beforehand.
    pub fn count_observed(
        &self,
        root: D::Node,
        observations: &ObservationSet,
    ) -> Result<BigUint, CountError> {
        self.conditioned().count(root, observations)
    }

    /// A conditioned counter sharing this counter's table.
    pub fn conditioned(&self) -> ConditionedModelCounter<'_, D> {
        ConditionedModelCounter::new(self.view, self.num_vars, &self.table)
            .with_traversal(self.config.traversal())
    }

    fn terminal_count(&self, node: D::Node) -> Option<BigUint> {
        if self.view.is_zero(node) {
            Some(BigUint::zero())
        } else if self.view.is_one(node) {
            Some(BigUint::one())
        } else {
            None
        }
    }

    fn count_at(&mut self, node: D::Node) -> Result<BigUint, CountError> {
        if let Some(count) = self.terminal_count(node) {
            return Ok(count);
        }

        if let Some(count) = self.table.get(&node) {
            debug!("cache: count({}) -> {}", node, count);
            return Ok(count.clone());
        }

        let index = self.index_of(node);
        let high = self.view.high_node(node);
        let low = self.view.low_node(node);

        let count_high = self.count_at(high)?;
        let count_low = self.count_at(low)?;

        let count = scale(count_high, index, self.index_of(high))?
            + scale(count_low, index, self.index_of(low))?;

        self.table.insert(node, count.clone())?;
        Ok(count)
    }

    /// Count of a node whose children are already resolved.
    fn resolved(&self, node: D::Node) -> Result<BigUint, CountError> {
        if let Some(count) = self.terminal_count(node) {
            return Ok(count);
        }
        self.table
            .get(&node)
            .cloned()
            .ok_or_else(|| CountError::MissingTableEntry {
                node: node.to_string(),
            })
    }

    fn count_iterative(&mut self, root: D::Node) -> Result<BigUint, CountError> {
        let mut stack = vec![(root, Visit::Enter)];

        while let Some((node, visit)) = stack.pop() {
            if self.view.is_terminal(node) || self.table.contains(&node) {
                continue;
            }
            let high = self.view.high_node(node);
            let low = self.view.low_node(node);
            match visit {
                Visit::Enter => {
                    stack.push((node, Visit::Exit));
                    stack.push((low, Visit::Enter));
                    stack.push((high, Visit::Enter));
                }
                Visit::Exit => {
                    let index = self.index_of(node);
                    let count = scale(self.resolved(high)?, index, self.index_of(high))?
                        + scale(self.resolved(low)?, index, self.index_of(low))?;
                    self.table.insert(node, count)?;
                }
            }
        }

        self.resolved(root)
    }
}

impl Bdd {
    /// Number of assignments to `num_vars` variables that satisfy `node`.
    ///
    /// Uses a fresh table; keep a [`ModelCounter`] around instead to answer several queries.
    pub fn sat_count(&self, node: Ref, num_vars: u32) -> Result<BigUint, CountError> {
        ModelCounter::new(self, num_vars).count(node)
    }
}
