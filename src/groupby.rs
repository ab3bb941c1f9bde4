use std::borrow::{Cow};
use std::collections::{BTreeMap};

use indexmap::{IndexMap};
use ndarray::{ArrayView1, ArrayViewD, Axis};
use smol_str::{SmolStr};

use super::{AssemblyError, Result, LabeledArray, ReduceOver, Coordinate, Value, Reducer, Mean, Sum};

/// The positions along one dimension, partitioned by the values of one
/// coordinate.
///
/// Groups are visited in sorted key order. Every operation combines the
/// per-group results into a new dimension named after the group coordinate,
/// placed where the grouped dimension was, with the group keys as its
/// dimension coordinate.
///
/// ```
/// use ndarray::{arr2};
/// use assemblies::{LabeledArray, Coordinate, ReduceOver, values};
/// let a = LabeledArray::new(["a", "b"], arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).into_dyn(), [
///     ("parity", Coordinate::along("a", values(["odd", "even", "odd"]))),
/// ]).unwrap();
/// let m = a.groupby("parity").unwrap().mean(&ReduceOver::All).unwrap();
/// assert_eq!(m.dims(), ["parity"]);
/// assert_eq!(m.data().as_slice().unwrap(), [3.5, 3.5]);
/// assert_eq!(m.coord("parity").unwrap().to_vec(), values(["even", "odd"]));
/// ```
#[derive(Debug, Clone)]
pub struct GroupBy<'a> {
    array: Cow<'a, LabeledArray>,
    name: SmolStr,
    dim: SmolStr,
    groups: Vec<(Value, Vec<usize>)>,
}

impl LabeledArray {
    /// Groups positions along [`dim_of(name)`](Self::dim_of()) by the labels
    /// of `name`.
    pub fn groupby(&self, name: &str) -> Result<GroupBy<'_>> { GroupBy::new(Cow::Borrowed(self), name) }

    /// Like [`groupby()`](Self::groupby()) but takes ownership of `self`.
    pub(crate) fn into_groupby<'a>(self, name: &str) -> Result<GroupBy<'a>> { GroupBy::new(Cow::Owned(self), name) }
}

impl<'a> GroupBy<'a> {
    fn new(array: Cow<'a, LabeledArray>, name: &str) -> Result<Self> {
        let dim = array.dim_of(name)?;
        let mut groups: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
        for (i, label) in array.labels(name)?.into_iter().enumerate() {
            groups.entry(label).or_default().push(i);
        }
        Ok(Self {name: name.into(), dim, groups: groups.into_iter().collect(), array})
    }

    /// The group coordinate.
    pub fn name(&self) -> &SmolStr { &self.name }

    /// The grouped dimension.
    pub fn dim(&self) -> &SmolStr { &self.dim }

    /// Each group key with its positions along [`dim()`](Self::dim()).
    pub fn groups(&self) -> &[(Value, Vec<usize>)] { &self.groups }

    /// Calls `f` on each group and combines the results.
    ///
    /// Each result must lack the grouped dimension, and all results must
    /// have the same dimensions and shape. Coordinates equal in every result
    /// are kept as they are; others gain the new dimension.
    pub fn apply(&self, mut f: impl FnMut(&Value, LabeledArray) -> Result<LabeledArray>) -> Result<LabeledArray> {
        let mut results = Vec::with_capacity(self.groups.len());
        for (key, positions) in &self.groups {
            let result = f(key, self.array.isel(&self.dim, positions)?)?;
            if result.has_dim(&self.dim) {
                return Err(AssemblyError::structural(format!(
                    "group {} still has dimension `{}`", key, self.dim,
                )));
            }
            results.push(result);
        }
        let first = results.first().ok_or_else(|| AssemblyError::structural(format!("`{}` has no groups", self.name)))?;
        if let Some(other) = results.iter().find(|r| r.dims() != first.dims() || r.shape() != first.shape()) {
            return Err(AssemblyError::structural(format!(
                "groups disagree on shape: {:?} {:?} and {:?} {:?}", first.dims(), first.shape(), other.dims(), other.shape(),
            )));
        }
        // The new dimension goes where the grouped one was, among surviving dimensions.
        let axis = self.array.axis(&self.dim)?;
        let pos = self.array.dims()[..axis].iter().filter(|d| first.has_dim(d)).count();
        let mut dims = first.dims().to_vec();
        dims.insert(pos, self.name.clone());
        let views: Vec<ArrayViewD<f64>> = results.iter().map(|r| r.data().view()).collect();
        let data = ndarray::stack(Axis(pos), &views)?;

        let mut coords = IndexMap::new();
        let mut indexes = first.indexes().clone();
        for (name, coord) in first.coords() {
            if *name == self.name { continue; }
            let same: Vec<&Coordinate> = results.iter().filter_map(|r| r.coords().get(name)).collect();
            if same.len() != results.len() {
                tracing::trace!("dropping `{}`, which only some groups have", name);
                for levels in indexes.values_mut() { levels.retain(|l| l != name); }
                continue;
            }
            if same.iter().all(|c| *c == coord) {
                coords.insert(name.clone(), coord.clone());
                continue;
            }
            if same.iter().any(|c| c.dims() != coord.dims()) {
                return Err(AssemblyError::structural(format!("groups disagree on the dimensions of `{}`", name)));
            }
            let values: Vec<_> = same.iter().map(|c| c.values().view()).collect();
            let mut coord_dims = vec![self.name.clone()];
            coord_dims.extend(coord.dims().iter().cloned());
            coords.insert(name.clone(), Coordinate::new(coord_dims, ndarray::stack(Axis(0), &values)?)?);
            for levels in indexes.values_mut() { levels.retain(|l| l != name); }
        }
        let keys = self.groups.iter().map(|(key, _)| key.clone()).collect();
        coords.insert(self.name.clone(), Coordinate::along(self.name.clone(), keys));
        indexes.insert(self.name.clone(), vec![self.name.clone()]);
        LabeledArray::from_parts(dims, data, coords, indexes)
    }

    /// Reduces each group over the grouped dimension and those in `over`.
    pub fn reduce_with(&self, over: &ReduceOver, f: impl Fn(ArrayView1<f64>) -> f64) -> Result<LabeledArray> {
        let over = over.with(&self.dim);
        self.apply(|_, group| group.reduce_with(&over, &f))
    }

    pub fn reduce<R: Reducer>(&self, over: &ReduceOver) -> Result<LabeledArray> { self.reduce_with(over, R::reduce) }

    pub fn mean(&self, over: &ReduceOver) -> Result<LabeledArray> { self.reduce::<Mean>(over) }

    pub fn sum(&self, over: &ReduceOver) -> Result<LabeledArray> { self.reduce::<Sum>(over) }
}

// ----------------------------------------------------------------------------
