/// How the counters walk the diagram.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Traversal {
    /// Plain recursion. Stack depth grows with the longest root-to-terminal path.
    #[default]
    Recursive,
    /// Explicit work stack. Same results, constant native stack depth.
    Iterative,
}

/// Counter configuration.
///
/// ```
/// use bdd_count::config::{CounterConfig, Traversal};
///
/// let config = CounterConfig::default()
///     .with_traversal(Traversal::Iterative)
///     .with_table_limit(1 << 20);
/// assert_eq!(config.traversal(), Traversal::Iterative);
/// assert_eq!(config.table_limit(), Some(1 << 20));
/// assert_eq!(config.table_bits(), 10);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CounterConfig {
    traversal: Traversal,
    /// Maximum number of count table entries (`None` for unbounded).
    table_limit: Option<usize>,
    /// Initial count table capacity, in bits.
    table_bits: usize,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            traversal: Traversal::Recursive,
            table_limit: None,
            table_bits: 10,
        }
    }
}

impl CounterConfig {
    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    pub fn table_limit(&self) -> Option<usize> {
        self.table_limit
    }

    pub fn table_bits(&self) -> usize {
        self.table_bits
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_table_limit(mut self, limit: usize) -> Self {
        self.table_limit = Some(limit);
        self
    }

    pub fn with_table_bits(mut self, bits: usize) -> Self {
        assert!(bits <= 31, "Table bits should be in the range 0..=31");
        self.table_bits = bits;
        self
    }
}
