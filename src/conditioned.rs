//! Model counting under observations.
//!
//! Observed variables are fixed rather than free: an observed node only follows the branch
//! matching its observation, and observed variables skipped between a node and its child do not
//! double the child's count. Once a path has passed the last observation, the rest of it is
//! unconstrained and the count is read from the table filled by
//! [`ModelCounter::count`][crate::sat::ModelCounter::count].
//!
//! The count of a node depends on the observations at or below its index only. Which
//! observations those are is fixed by the node's variable, so a per-query memo keyed by node
//! is enough to count shared nodes once. For the same reason each variable index is located only
//! once per query, starting from the closest index already located below it.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::config::Traversal;
use crate::error::CountError;
use crate::observation::{Location, Locator, ObservationSet};
use crate::sat::index_of;
use crate::table::CountTable;
use crate::utils::{gap, pow2};
use crate::view::DiagramView;

/// Children that can contribute under the observations, paired with their locations.
type Branches<N> = [Option<(N, Location)>; 2];

enum Frame<N> {
    Enter(N, Location),
    Exit(N, Location, Branches<N>),
}

/// State of one conditioned query.
struct Query<'o, N> {
    observations: &'o ObservationSet,
    locator: Locator<'o>,
    /// Location of every variable index seen so far.
    locations: BTreeMap<u64, Location>,
    memo: HashMap<N, BigUint>,
}

impl<'o, N> Query<'o, N> {
    fn new(observations: &'o ObservationSet) -> Self {
        Self {
            observations,
            locator: observations.locator(),
            locations: BTreeMap::new(),
            memo: HashMap::new(),
        }
    }

    fn locate(&mut self, hint: usize, target: u64) -> Location {
        if let Some(&loc) = self.locations.get(&target) {
            return loc;
        }
        let hint = match self.locations.range(..target).next_back() {
            Some((_, below)) => hint.max(below.covered()),
            None => hint,
        };
        let loc = self.locator.locate(hint, target);
        self.locations.insert(target, loc);
        loc
    }

    /// No observation at or after `loc`.
    fn is_past_end(&self, loc: Location) -> bool {
        loc.position >= self.observations.len()
    }
}

/// Counts the satisfying assignments that agree with a set of observations.
///
/// Reads the table of a [`ModelCounter`][crate::sat::ModelCounter] that has already counted the
/// diagram, and never writes to it.
pub struct ConditionedModelCounter<'a, D: DiagramView> {
    view: &'a D,
    num_vars: u32,
    table: &'a CountTable<D::Node>,
    traversal: Traversal,
    last_steps: Cell<usize>,
}

impl<'a, D: DiagramView> ConditionedModelCounter<'a, D> {
    pub fn new(view: &'a D, num_vars: u32, table: &'a CountTable<D::Node>) -> Self {
        Self {
            view,
            num_vars,
            table,
            traversal: Traversal::default(),
            last_steps: Cell::new(0),
        }
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Number of observation entries the locator scanned past during the last query.
    pub fn locator_steps(&self) -> usize {
        self.last_steps.get()
    }

    fn index_of(&self, node: D::Node) -> u64 {
        index_of(self.view, self.num_vars, node)
    }

    /// Number of assignments to all `num_vars` variables that satisfy `root` and agree with
    /// `observations`.
    pub fn count(
        &self,
        root: D::Node,
        observations: &ObservationSet,
    ) -> Result<BigUint, CountError> {
        debug!(
            "count(root = {}, observations = {:?})",
            root,
            observations.indices()
        );

        if let Some(&last) = observations.indices().last() {
            if last >= self.num_vars {
                return Err(CountError::InvalidObservations(format!(
                    "index {} is out of range for {} variables",
                    last, self.num_vars
                )));
            }
        }

        let mut query = Query::new(observations);
        let index = self.index_of(root);
        let loc = query.locate(0, index);

        let count = match self.traversal {
            Traversal::Recursive => self.count_at(&mut query, root, loc)?,
            Traversal::Iterative => self.count_iterative(&mut query, root, loc)?,
        };

        // Variables above the root are free unless observed.
        let count = if count.is_zero() {
            count
        } else {
            count * pow2(index - loc.position as u64)
        };

        self.last_steps.set(query.locator.steps());
        debug!(
            "computed: count(root = {}) -> {} ({} locator steps, {} memoized)",
            root,
            count,
            query.locator.steps(),
            query.memo.len()
        );
        Ok(count)
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

    fn table_count(&self, node: D::Node) -> Result<BigUint, CountError> {
        match self.table.get(&node) {
            Some(count) => Ok(count.clone()),
            None => {
                debug!("no table entry for {}", node);
                Err(CountError::MissingTableEntry {
                    node: node.to_string(),
                })
            }
        }
    }

    fn branches(
        &self,
        query: &mut Query<'_, D::Node>,
        node: D::Node,
        loc: Location,
    ) -> Branches<D::Node> {
        let (take_high, take_low) = if loc.found {
            let value = query.observations.value(loc.position);
            (value, !value)
        } else {
            (true, true)
        };
        let mut branch = |take: bool, child: D::Node| {
            take.then(|| (child, query.locate(loc.covered(), self.index_of(child))))
        };
        [
            branch(take_high, self.view.high_node(node)),
            branch(take_low, self.view.low_node(node)),
        ]
    }

    /// Scales a child's count by the unobserved variables strictly between parent and child.
    fn weight(
        &self,
        count: BigUint,
        index: u64,
        loc: Location,
        child: D::Node,
        child_loc: Location,
    ) -> Result<BigUint, CountError> {
        let child_index = self.index_of(child);
        let free = child_loc
            .position
            .checked_sub(loc.covered())
            .and_then(|observed| gap(index, child_index)?.checked_sub(observed as u64))
            .ok_or(CountError::OrderViolation {
                parent: index,
                child: child_index,
            })?;
        if count.is_zero() {
            return Ok(count);
        }
        Ok(count * pow2(free))
    }

    fn count_at(
        &self,
        query: &mut Query<'_, D::Node>,
        node: D::Node,
        loc: Location,
    ) -> Result<BigUint, CountError> {
        if let Some(count) = self.terminal_count(node) {
            return Ok(count);
        }
        if query.is_past_end(loc) {
            return self.table_count(node);
        }
        if let Some(count) = query.memo.get(&node) {
            return Ok(count.clone());
        }

        let index = self.index_of(node);
        let mut count = BigUint::zero();
        for (child, child_loc) in self.branches(query, node, loc).into_iter().flatten() {
            let child_count = self.count_at(query, child, child_loc)?;
            count += self.weight(child_count, index, loc, child, child_loc)?;
        }

        query.memo.insert(node, count.clone());
        Ok(count)
    }

    /// Count of a node that has already been entered.
    fn resolved(
        &self,
        query: &Query<'_, D::Node>,
        node: D::Node,
    ) -> Result<BigUint, CountError> {
        if let Some(count) = self.terminal_count(node) {
            return Ok(count);
        }
        query
            .memo
            .get(&node)
            .cloned()
            .ok_or_else(|| CountError::MissingTableEntry {
                node: node.to_string(),
            })
    }

    fn count_iterative(
        &self,
        query: &mut Query<'_, D::Node>,
        root: D::Node,
        root_loc: Location,
    ) -> Result<BigUint, CountError> {
        let mut stack = vec![Frame::Enter(root, root_loc)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(node, loc) => {
                    if self.view.is_terminal(node) || query.memo.contains_key(&node) {
                        continue;
                    }
                    if query.is_past_end(loc) {
                        let count = self.table_count(node)?;
                        query.memo.insert(node, count);
                        continue;
                    }
                    let branches = self.branches(query, node, loc);
                    stack.push(Frame::Exit(node, loc, branches));
                    for (child, child_loc) in branches.into_iter().flatten() {
                        stack.push(Frame::Enter(child, child_loc));
                    }
                }
                Frame::Exit(node, loc, branches) => {
                    if query.memo.contains_key(&node) {
                        continue;
                    }
                    let index = self.index_of(node);
                    let mut count = BigUint::zero();
                    for (child, child_loc) in branches.into_iter().flatten() {
                        let child_count = self.resolved(query, child)?;
                        count += self.weight(child_count, index, loc, child, child_loc)?;
                    }
                    query.memo.insert(node, count);
                }
            }
        }

        self.resolved(query, root)
    }
}
