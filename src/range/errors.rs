use thiserror::Error;

/// Reasons a range store mutation was refused. A refused mutation leaves
/// the store untouched.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum RangeError {
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Range not found: {0}")]
    RangeNotFound(String),

    #[error("Action button not found: {0}")]
    ActionNotFound(String),

    #[error("Can't delete the last range of a folder")]
    LastRange,

    #[error("Can't delete the last action button")]
    LastActionButton,

    #[error("Name must not be blank")]
    BlankName,

    #[error("Weight must be between 0 and 100, got {0}")]
    InvalidWeight(u8),

    #[error("Weighted actions must reference fold or an existing simple action, got {0}")]
    InvalidWeightedReference(String),

    #[error("Field {field} doesn't apply to {kind} action buttons")]
    FieldNotApplicable {
        field: &'static str,
        kind: &'static str,
    },
}
