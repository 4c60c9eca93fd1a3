use std::fmt::{Display, Formatter};

/// Error type for counting operations.
///
/// A counting request that fails never leaves a partial value in the
/// [`CountTable`][crate::table::CountTable].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountError {
    /// The count table could not grow: either its configured entry budget is spent,
    /// or the allocator refused the request (`limit` is `None` in that case).
    ResourceExhausted { limit: Option<usize> },
    /// A table lookup that must succeed did not. The unconditioned count was not run
    /// on this diagram first, or the table belongs to a different diagram.
    MissingTableEntry { node: String },
    /// Observation indices are unsorted, duplicated, out of range,
    /// or do not match the assignment in length.
    InvalidObservations(String),
    /// A full assignment has the wrong number of values.
    InvalidAssignment(String),
    /// A child does not test a strictly later variable than its parent,
    /// or a node tests a variable outside of `0..num_vars`.
    OrderViolation { parent: u64, child: u64 },
}

impl Display for CountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CountError::ResourceExhausted { limit: Some(limit) } => {
                write!(f, "count table is full ({} entries)", limit)
            }
            CountError::ResourceExhausted { limit: None } => {
                write!(f, "count table could not be allocated")
            }
            CountError::MissingTableEntry { node } => write!(
                f,
                "no table entry for node {}: run the unconditioned count on this diagram first",
                node
            ),
            CountError::InvalidObservations(msg) => write!(f, "invalid observations: {}", msg),
            CountError::InvalidAssignment(msg) => write!(f, "invalid assignment: {}", msg),
            CountError::OrderViolation { parent, child } => write!(
                f,
                "variable order violated: index {} is followed by index {}",
                parent, child
            ),
        }
    }
}

impl std::error::Error for CountError {}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_display() {
        let e = CountError::ResourceExhausted { limit: Some(8) };
        assert_eq!(e.to_string(), "count table is full (8 entries)");

        let e = CountError::OrderViolation {
            parent: 3,
            child: 2,
        };
        assert_eq!(
            e.to_string(),
            "variable order violated: index 3 is followed by index 2"
        );

        let e = CountError::InvalidObservations("unsorted".to_string());
        assert_eq!(e.to_string(), "invalid observations: unsorted");
    }
}
