use std::fmt;

/// Possible errors returned by methods on a store
#[derive(Debug, PartialEq, Eq)]
pub enum PfxStoreError {
    /// An `insert` carried a record that is already present on its node:
    /// the same prefix, minimum length, origin, maximum length and source.
    /// The store is unchanged and no notification was emitted.
    DuplicateRecord,
    /// A `remove` named a record that is not in the store. Removal is thus
    /// explicitly not idempotent at the API: the caller is told about the
    /// miss rather than getting a silent no-op.
    RecordNotFound,
}

impl std::error::Error for PfxStoreError {}

impl fmt::Display for PfxStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PfxStoreError::DuplicateRecord => {
                write!(f, "Error: The record is already in the store.")
            }
            PfxStoreError::RecordNotFound => {
                write!(f, "Error: The record cannot be found.")
            }
        }
    }
}
