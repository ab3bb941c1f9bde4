use smol_str::{SmolStr};

use super::{Value};

/// Everything that can go wrong when building or transforming an
/// [`Assembly`](super::Assembly).
///
/// None of these are transient. An operation that returns an error has not
/// modified any of its inputs.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// The coordinates named for a multi-coordinate operation do not all
    /// vary along one common dimension.
    #[error("coordinates for grouping must share a dimension: {coords:?} span {dims:?}")]
    GroupingDimensionMismatch { coords: Vec<SmolStr>, dims: Vec<SmolStr> },

    /// A label selection asked for a value that the coordinate does not
    /// contain.
    #[error("value {value} not found in coordinate `{coord}`")]
    KeyNotFound { coord: SmolStr, value: Value },

    /// An internal consistency check failed.
    #[error("structural assumption violated: {0}")]
    StructuralAssumption(String),

    #[error("no coordinate named `{0}`")]
    UnknownCoordinate(SmolStr),

    #[error("no dimension named `{0}`")]
    UnknownDimension(SmolStr),

    #[error("`{name}` has length {actual} but {expected} was expected")]
    LengthMismatch { name: SmolStr, expected: usize, actual: usize },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T, E = AssemblyError> = std::result::Result<T, E>;

impl AssemblyError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        AssemblyError::StructuralAssumption(message.into())
    }
}
