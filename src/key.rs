use std::fmt::{self, Display};
use std::ops::{Deref};

use super::{Value};

/// The values of several coordinates at one position along a dimension,
/// treated as a single value.
///
/// Equality and hashing are element-wise. Ordering is lexicographic, so the
/// first differing constituent decides.
///
/// ```
/// use assemblies::{MultiCoordKey, values};
/// let a = MultiCoordKey::new(values(["alpha", "beta"]));
/// let b = MultiCoordKey::new(values(["beta", "alpha"]));
/// assert!(a < b);
/// assert_eq!(a, MultiCoordKey::new(values(["alpha", "beta"])));
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MultiCoordKey(Box<[Value]>);

impl MultiCoordKey {
    pub fn new(values: impl Into<Box<[Value]>>) -> Self { MultiCoordKey(values.into()) }
}

impl Deref for MultiCoordKey {
    type Target = [Value];
    fn deref(&self) -> &Self::Target { &self.0 }
}

impl Display for MultiCoordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

/// Zips columns of equal length into one [`MultiCoordKey`] per position.
///
/// Returns `None` if the columns differ in length.
pub fn zip_keys(columns: &[Vec<Value>]) -> Option<Vec<MultiCoordKey>> {
    let len = columns.first().map_or(0, Vec::len);
    if columns.iter().any(|c| c.len() != len) { return None; }
    Some((0..len).map(|i| {
        MultiCoordKey::new(columns.iter().map(|c| c[i].clone()).collect::<Vec<_>>())
    }).collect())
}

/// The inverse of [`zip_keys()`]: splits keys of width `width` back into
/// one column per constituent.
///
/// Returns `None` if any key has the wrong width.
pub fn unzip_keys<'a>(keys: impl IntoIterator<Item=&'a MultiCoordKey>, width: usize) -> Option<Vec<Vec<Value>>> {
    let mut columns = vec![Vec::new(); width];
    for key in keys {
        if key.len() != width { return None; }
        for (column, v) in columns.iter_mut().zip(key.iter()) { column.push(v.clone()); }
    }
    Some(columns)
}

// ----------------------------------------------------------------------------
