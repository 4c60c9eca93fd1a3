//! Observations: a partial assignment to an ordered subset of the variables.
//!
//! [`Locator`] answers "is this variable observed, and if not, where would it go?" during a
//! top-down traversal. Variable indices only grow along a path, so each call resumes the scan where
//! the call for the parent stopped, and a whole path costs at most one pass over the observations.

use std::cell::Cell;

use log::trace;

use crate::error::CountError;

/// Observed variable indices, strictly increasing, with the value each one is fixed to.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ObservationSet {
    indices: Vec<u32>,
    values: Vec<bool>,
}

impl ObservationSet {
    /// Validates and wraps parallel index/value sequences for a diagram over `num_vars` variables.
    ///
    /// ```
    /// use bdd_count::observation::ObservationSet;
    ///
    /// let obs = ObservationSet::new(vec![0, 2, 4], vec![true, false, true], 7).unwrap();
    /// assert_eq!(obs.len(), 3);
    /// assert!(ObservationSet::new(vec![2, 0], vec![true, true], 7).is_err());
    /// ```
    pub fn new(indices: Vec<u32>, values: Vec<bool>, num_vars: u32) -> Result<Self, CountError> {
        if indices.len() != values.len() {
            return Err(CountError::InvalidObservations(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if let Some(w) = indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CountError::InvalidObservations(format!(
                "indices must be strictly increasing, found {} followed by {}",
                w[0], w[1]
            )));
        }
        if let Some(&last) = indices.last() {
            if last >= num_vars {
                return Err(CountError::InvalidObservations(format!(
                    "index {} is out of range for {} variables",
                    last, num_vars
                )));
            }
        }
        Ok(Self { indices, values })
    }

    /// Builds an observation set from `(index, value)` pairs, which must already be sorted by index.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (u32, bool)>,
        num_vars: u32,
    ) -> Result<Self, CountError> {
        let (indices, values) = pairs.into_iter().unzip();
        Self::new(indices, values, num_vars)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Value of the observation at `position` (not at variable index `position`).
    pub fn value(&self, position: usize) -> bool {
        self.values[position]
    }

    /// Whether a full assignment agrees with every observation.
    ///
    /// An assignment too short to cover an observed index does not match.
    pub fn matches(&self, assignment: &[bool]) -> bool {
        self.indices
            .iter()
            .zip(&self.values)
            .all(|(&i, b)| assignment.get(i as usize) == Some(b))
    }

    pub fn locator(&self) -> Locator<'_> {
        Locator::new(&self.indices)
    }
}

/// Result of a [`Locator::locate`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Location {
    /// The target index is one of the observations.
    pub found: bool,
    /// Position of the target if `found`, its insertion point otherwise.
    /// Equals the number of observations strictly before the target.
    pub position: usize,
}

impl Location {
    /// Number of observed variables at or before the located index.
    pub fn covered(&self) -> usize {
        self.position + self.found as usize
    }
}

/// Hinted forward scan over sorted observation indices.
#[derive(Debug)]
pub struct Locator<'a> {
    indices: &'a [u32],
    steps: Cell<usize>,
}

impl<'a> Locator<'a> {
    pub fn new(indices: &'a [u32]) -> Self {
        Self {
            indices,
            steps: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of entries scanned past so far.
    pub fn steps(&self) -> usize {
        self.steps.get()
    }

    /// Finds `target` (or its insertion point), scanning forward from `hint`.
    ///
    /// Pass as `hint` the position returned for the parent on the same path. A hint that
    /// overshoots the answer is detected and answered by binary search instead.
    pub fn locate(&self, hint: usize, target: u64) -> Location {
        let len = self.indices.len();

        // Past the last observation: nothing to scan.
        if self.indices.last().map_or(true, |&last| u64::from(last) < target) {
            return Location {
                found: false,
                position: len,
            };
        }

        let hint = hint.min(len);
        let position = if hint > 0 && u64::from(self.indices[hint - 1]) >= target {
            trace!("locate: hint {} overshoots {}", hint, target);
            self.indices.partition_point(|&i| u64::from(i) < target)
        } else {
            let skipped = self.indices[hint..]
                .iter()
                .take_while(|&&i| u64::from(i) < target)
                .count();
            self.steps.set(self.steps.get() + skipped);
            hint + skipped
        };

        let found = position < len && u64::from(self.indices[position]) == target;
        trace!(
            "locate(hint = {}, target = {}) -> found = {}, position = {}",
            hint,
            target,
            found,
            position
        );
        Location { found, position }
    }
}
