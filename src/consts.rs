//! Fixed names used by multi-coordinate operations.

/// The temporary coordinate, and dimension, holding composite group keys
/// while a multi-coordinate groupby runs.
pub const MULTI_GROUP_NAME: &str = "multi_group";
