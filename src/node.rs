use crate::reference::Ref;

/// Arena record of a decision node.
///
/// The `high` edge of a stored node is never complemented, which keeps the representation canonical.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    /// Variable stored in the terminal record. Sorts after every real variable.
    pub const TERMINAL_VARIABLE: u32 = u32::MAX;

    pub const fn terminal() -> Self {
        let one = Ref::positive(crate::reference::NodeId::TERMINAL);
        Self {
            variable: Self::TERMINAL_VARIABLE,
            low: one,
            high: one,
        }
    }
}
