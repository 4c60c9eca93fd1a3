//! # bdd-count: Model Counting over Reduced Ordered BDDs
//!
//! **`bdd-count`** counts the satisfying assignments (*models*) of a Boolean function given as a
//! reduced ordered binary decision diagram, optionally conditioned on a partial assignment
//! (*observations*) supplied at query time.
//!
//! ## How Counting Works
//!
//! A reduced diagram skips every variable whose value does not matter on a given path. Each skipped
//! variable can take either value, so a child's count is weighted by `2^k` for the `k` variables
//! skipped between a node and that child. Counts are arbitrary-precision integers
//! ([`BigUint`][num_bigint::BigUint]): a diagram over `n` variables may have up to `2^n` models.
//!
//! - **Unconditioned counting** ([`ModelCounter`][crate::sat::ModelCounter]) memoizes the count of
//!   every internal node in a [`CountTable`][crate::table::CountTable], so shared subgraphs are
//!   counted once.
//! - **Conditioned counting** ([`ConditionedModelCounter`][crate::conditioned::ConditionedModelCounter])
//!   follows only the observed branch of observed variables, does not weight observed variables as
//!   free, and reuses the unconditioned table once a path has passed the last observation.
//!
//! Both can walk the diagram recursively or with an explicit work stack, see
//! [`Traversal`][crate::config::Traversal].
//!
//! ## Basic Usage
//!
//! ```rust
//! use bdd_count::bdd::Bdd;
//! use bdd_count::observation::ObservationSet;
//! use bdd_count::sat::ModelCounter;
//! use num_bigint::BigUint;
//!
//! let bdd = Bdd::default();
//! let x0 = bdd.mk_var(0);
//! let x1 = bdd.mk_var(1);
//! let x2 = bdd.mk_var(2);
//!
//! // f = (x0 AND x1) OR x2
//! let f = bdd.apply_or(bdd.apply_and(x0, x1), x2);
//!
//! // The unconditioned count fills the table used by conditioned queries.
//! let mut counter = ModelCounter::new(&bdd, 3);
//! assert_eq!(counter.count(f).unwrap(), BigUint::from(5u32));
//!
//! // Fix x2 = true.
//! let obs = ObservationSet::new(vec![2], vec![true], 3).unwrap();
//! assert_eq!(counter.count_observed(f, &obs).unwrap(), BigUint::from(4u32));
//! ```
//!
//! ## Core Components
//!
//! - **[`view`]**: The [`DiagramView`][crate::view::DiagramView] contract the counters consume.
//! - **[`sat`]** and **[`conditioned`]**: The two counters.
//! - **[`observation`]**: Observation sets and the hinted [`Locator`][crate::observation::Locator].
//! - **[`cube`]**: Diagrams built from explicit assignments.
//! - **[`bdd`]**: A small reference engine with complement edges.

pub mod bdd;
pub mod conditioned;
pub mod config;
pub mod cube;
pub mod error;
pub mod node;
pub mod observation;
pub mod reference;
pub mod sat;
pub mod table;
pub mod utils;
pub mod view;
