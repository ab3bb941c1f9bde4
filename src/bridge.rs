//! Grouping by several coordinates of one dimension at once.
//!
//! The values of the grouping coordinates at each position are combined
//! into one [`MultiCoordKey`], stored in a temporary coordinate that is
//! grouped like any other. Every result then has its keys split back into
//! the grouping coordinates.

use ndarray::{ArrayView1};
use smol_str::{SmolStr};

use super::{
    AssemblyError, Result, Assembly, LabeledArray, GroupBy, ReduceOver, Coordinate, Value,
    MultiCoordKey, zip_keys, unzip_keys, Reducer, Mean, Sum,
};
use super::consts::{MULTI_GROUP_NAME};

/// The result of [`Assembly::multi_groupby()`].
#[derive(Debug, Clone)]
pub struct GroupbyBridge<'a> {
    assembly: &'a Assembly,
    groupby: GroupBy<'a>,
    split: Option<Split>,
}

/// How to undo the composite key.
#[derive(Debug, Clone)]
struct Split {
    dim: SmolStr,
    names: Vec<SmolStr>,
}

impl Assembly {
    /// Groups by the joint values of `names`, which must all vary along the
    /// same single dimension.
    ///
    /// With one name this is a plain [`LabeledArray::groupby()`]. With more,
    /// each result has one position per distinct combination of values, in
    /// sorted order, along the grouped dimension, with `names` as its index.
    ///
    /// ```
    /// use ndarray::{arr2};
    /// use assemblies::{Assembly, AssemblyKind, LabeledArray, Coordinate, ReduceOver, values};
    /// let a = Assembly::new(AssemblyKind::Data, LabeledArray::new(["a", "b"], arr2(&[
    ///     [1.0, 2.0], [3.0, 4.0], [5.0, 6.0], [7.0, 8.0],
    /// ]).into_dyn(), [
    ///     ("up", Coordinate::along("a", values(["x", "x", "y", "y"]))),
    ///     ("down", Coordinate::along("a", values([1, 1, 1, 2]))),
    /// ]).unwrap());
    /// let m = a.multi_groupby(&["up", "down"]).unwrap().mean(&ReduceOver::Dims(vec![])).unwrap();
    /// assert_eq!(m.shape(), [3, 2]);
    /// assert_eq!(m.coord("down").unwrap().to_vec(), values([1, 1, 2]));
    /// ```
    pub fn multi_groupby<N: AsRef<str>>(&self, names: &[N]) -> Result<GroupbyBridge<'_>> {
        let names: Vec<SmolStr> = names.iter().map(|n| SmolStr::new(n.as_ref())).collect();
        if names.len() < 2 {
            let name = names.first().ok_or_else(|| AssemblyError::structural("nothing to group by"))?;
            return Ok(GroupbyBridge {assembly: self, groupby: self.array().groupby(name)?, split: None});
        }
        let dim = self.dim_of_group_coords(&names)?;
        if self.has_coord(MULTI_GROUP_NAME) || self.has_dim(MULTI_GROUP_NAME) {
            return Err(AssemblyError::structural(format!("`{}` is reserved", MULTI_GROUP_NAME)));
        }
        let columns = names.iter().map(|n| self.labels(n)).collect::<Result<Vec<_>>>()?;
        let keys = zip_keys(&columns).ok_or_else(|| AssemblyError::structural("ragged group coordinates"))?;
        tracing::debug!("grouping `{}` by composite keys of {:?}", dim, names);
        let joined = self.array()
            .with_coord(MULTI_GROUP_NAME, Coordinate::along(dim.clone(), keys.into_iter().map(Value::Key).collect()))?
            .set_index(&dim, &[MULTI_GROUP_NAME], true)?;
        let groupby = joined.into_groupby(MULTI_GROUP_NAME)?;
        Ok(GroupbyBridge {assembly: self, groupby, split: Some(Split {dim, names})})
    }

    /// The one dimension spanned by all of `names`.
    fn dim_of_group_coords(&self, names: &[SmolStr]) -> Result<SmolStr> {
        let mut dims: Vec<SmolStr> = Vec::new();
        for name in names {
            let spanned = match self.coords().get(name) {
                Some(coord) => coord.dims().to_vec(),
                None if self.has_dim(name) => vec![name.clone()],
                None => return Err(AssemblyError::UnknownCoordinate(name.clone())),
            };
            for d in spanned { if !dims.contains(&d) { dims.push(d); } }
        }
        if dims.len() != 1 { return Err(AssemblyError::GroupingDimensionMismatch {coords: names.to_vec(), dims}); }
        Ok(dims.swap_remove(0))
    }
}

impl<'a> GroupbyBridge<'a> {
    /// The group keys with their positions. With several names, the keys are
    /// [`MultiCoordKey`]s.
    pub fn groups(&self) -> &[(Value, Vec<usize>)] { self.groupby.groups() }

    pub fn apply(&self, f: impl FnMut(&Value, LabeledArray) -> Result<LabeledArray>) -> Result<Assembly> {
        self.finish(self.groupby.apply(f)?)
    }

    pub fn reduce_with(&self, over: &ReduceOver, f: impl Fn(ArrayView1<f64>) -> f64) -> Result<Assembly> {
        self.finish(self.groupby.reduce_with(over, f)?)
    }

    pub fn reduce<R: Reducer>(&self, over: &ReduceOver) -> Result<Assembly> { self.reduce_with(over, R::reduce) }

    pub fn mean(&self, over: &ReduceOver) -> Result<Assembly> { self.reduce::<Mean>(over) }

    pub fn sum(&self, over: &ReduceOver) -> Result<Assembly> { self.reduce::<Sum>(over) }

    /// Splits the composite keys of a grouped result back into the grouping
    /// coordinates, and renames the group dimension back.
    fn finish(&self, result: LabeledArray) -> Result<Assembly> {
        let Some(split) = &self.split else { return Ok(self.assembly.derive(result)); };
        let keys = result.coord(MULTI_GROUP_NAME)?.to_vec();
        let keys = keys.iter().map(|v| {
            v.as_key().ok_or_else(|| AssemblyError::structural(format!("group key {} is not composite", v)))
        }).collect::<Result<Vec<&MultiCoordKey>>>()?;
        let columns = unzip_keys(keys, split.names.len())
            .ok_or_else(|| AssemblyError::structural("group keys have the wrong width"))?;
        let mut out = result.drop_coord(MULTI_GROUP_NAME)?;
        for (name, column) in split.names.iter().zip(columns) {
            out = out.with_coord(name.clone(), Coordinate::along(MULTI_GROUP_NAME, column))?;
        }
        let out = out
            .set_index(MULTI_GROUP_NAME, &split.names, false)?
            .rename_dim(MULTI_GROUP_NAME, split.dim.clone())?;
        Ok(self.assembly.derive_gathered(out))
    }
}

// ----------------------------------------------------------------------------
