use ndarray::{Array1, ArrayD, Axis, IxDyn};
use smallvec::{SmallVec};
use smol_str::{SmolStr};

use super::{AssemblyError, Result, Value};

/// A named vector of metadata attached to zero or more dimensions of a
/// [`LabeledArray`].
///
/// The shape of [`Coordinate::values()`] follows [`Coordinate::dims()`]. A
/// coordinate with no dimensions holds exactly one value; it is a
/// "non-indexing" coordinate, typically the remnant of selecting one value
/// along a dimension.
///
/// [`LabeledArray`]: super::LabeledArray
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    dims: SmallVec<[SmolStr; 2]>,
    values: ArrayD<Value>,
}

impl Coordinate {
    /// Constructs a `Coordinate` spanning `dims`, which must have one entry
    /// per axis of `values`.
    pub fn new<D: Into<SmolStr>>(
        dims: impl IntoIterator<Item=D>,
        values: ArrayD<Value>,
    ) -> Result<Self> {
        let dims: SmallVec<[SmolStr; 2]> = dims.into_iter().map(Into::into).collect();
        if dims.len() != values.ndim() {
            return Err(AssemblyError::structural(format!(
                "coordinate over {:?} has {} axes", dims, values.ndim(),
            )));
        }
        Ok(Self {dims, values})
    }

    /// Constructs a one-dimensional `Coordinate` along `dim`.
    ///
    /// ```
    /// use assemblies::{Coordinate, values};
    /// let c = Coordinate::along("presentation", values(["n0", "n1", "n1"]));
    /// assert_eq!(c.dims()[0], "presentation");
    /// assert_eq!(c.len(), 3);
    /// ```
    pub fn along(dim: impl Into<SmolStr>, values: Vec<Value>) -> Self {
        let mut dims = SmallVec::new();
        dims.push(dim.into());
        Self {dims, values: Array1::from(values).into_dyn()}
    }

    /// Constructs a `Coordinate` with no dimensions.
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self {dims: SmallVec::new(), values: ArrayD::from_elem(IxDyn(&[]), value.into())}
    }

    pub fn dims(&self) -> &[SmolStr] { &self.dims }

    pub fn values(&self) -> &ArrayD<Value> { &self.values }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Whether this coordinate has no dimensions.
    pub fn is_scalar(&self) -> bool { self.dims.is_empty() }

    /// Whether this coordinate varies along `dim` and nothing else.
    pub fn only_along(&self, dim: &str) -> bool { self.dims.len() == 1 && self.dims[0] == dim }

    /// The values in row-major order.
    pub fn to_vec(&self) -> Vec<Value> { self.values.iter().cloned().collect() }

    /// The single value of a scalar coordinate.
    pub fn scalar_value(&self) -> Option<&Value> {
        if self.is_scalar() { self.values.iter().next() } else { None }
    }

    fn axis(&self, dim: &str) -> Option<Axis> {
        self.dims.iter().position(|d| d == dim).map(Axis)
    }

    /// Keeps only `positions` along `dim`. Coordinates not spanning `dim` are
    /// returned unchanged.
    pub fn select(&self, dim: &str, positions: &[usize]) -> Self {
        match self.axis(dim) {
            Some(axis) => Self {dims: self.dims.clone(), values: self.values.select(axis, positions)},
            None => self.clone(),
        }
    }

    /// Removes `dim`, which must have length 1, from this coordinate.
    pub(crate) fn squeeze(&self, dim: &str) -> Self {
        match self.axis(dim) {
            Some(axis) => {
                let mut dims = self.dims.clone();
                dims.remove(axis.index());
                Self {dims, values: self.values.index_axis(axis, 0).to_owned()}
            },
            None => self.clone(),
        }
    }

    /// Returns `self` with dimension `old` renamed to `new`.
    pub(crate) fn rename_dim(&self, old: &str, new: &SmolStr) -> Self {
        let dims = self.dims.iter().map(|d| if d == old { new.clone() } else { d.clone() }).collect();
        Self {dims, values: self.values.clone()}
    }

    /// Prepends a dimension of length 1.
    pub(crate) fn insert_dim(&self, dim: SmolStr) -> Self {
        let mut dims = self.dims.clone();
        dims.insert(0, dim);
        Self {dims, values: self.values.clone().insert_axis(Axis(0))}
    }
}
