use crate::db_types::OrderId;

/// The outcome of a conditional insert. Finding the key already present is an expected result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOrderResult {
    Inserted(OrderId),
    AlreadyExists(OrderId),
}

impl InsertOrderResult {
    pub fn was_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}
