use std::fmt::{self, Display};

use indexmap::{IndexMap};
use ndarray::{Array1, ArrayD, ArrayView1, Axis, IxDyn};
use smol_str::{SmolStr};

use super::{AssemblyError, Result, Coordinate, Value, Reducer, Mean, Sum, zip_keys};

/// An N-dimensional array of `f64` with named dimensions, coordinates and
/// per-dimension composite indexes.
///
/// An index is an ordered list of "levels", each of which is a coordinate
/// that varies only along the index's dimension. A coordinate whose name is
/// the name of its (only) dimension is that dimension's index automatically.
///
/// Every method returns a new `LabeledArray`; none mutate `self`.
///
/// ```
/// use ndarray::{arr2};
/// use assemblies::{LabeledArray, Coordinate, values};
/// let a = LabeledArray::new(["a", "b"], arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn(), [
///     ("a", Coordinate::along("a", values(["x", "y"]))),
///     ("tag", Coordinate::along("b", values([true, false]))),
/// ]).unwrap();
/// assert_eq!(a.shape(), [2, 2]);
/// assert_eq!(a.index_levels("a").unwrap(), ["a"]);
/// assert!(a.index_levels("b").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LabeledArray {
    dims: Vec<SmolStr>,
    data: ArrayD<f64>,
    coords: IndexMap<SmolStr, Coordinate>,
    indexes: IndexMap<SmolStr, Vec<SmolStr>>,
}

/// Which dimensions a reduction removes.
#[derive(Debug, Clone, PartialEq)]
pub enum ReduceOver {
    All,
    Dims(Vec<SmolStr>),
}

impl ReduceOver {
    pub fn dim(dim: impl Into<SmolStr>) -> Self { ReduceOver::Dims(vec![dim.into()]) }

    pub fn dims<D: Into<SmolStr>>(dims: impl IntoIterator<Item=D>) -> Self {
        ReduceOver::Dims(dims.into_iter().map(Into::into).collect())
    }

    /// Adds `dim` if it is not already included.
    pub(crate) fn with(&self, dim: &SmolStr) -> Self {
        match self {
            ReduceOver::All => ReduceOver::All,
            ReduceOver::Dims(dims) => {
                let mut dims = dims.clone();
                if !dims.contains(dim) { dims.push(dim.clone()); }
                ReduceOver::Dims(dims)
            },
        }
    }

    /// The reduced dimensions of `array`, in `array`'s order.
    fn resolve(&self, array: &LabeledArray) -> Result<Vec<SmolStr>> {
        match self {
            ReduceOver::All => Ok(array.dims.clone()),
            ReduceOver::Dims(dims) => {
                for d in dims { array.axis(d)?; }
                Ok(array.dims.iter().filter(|d| dims.contains(d)).cloned().collect())
            },
        }
    }
}

impl LabeledArray {
    /// Constructs a `LabeledArray`, checking that every coordinate fits.
    ///
    /// Coordinates named after their only dimension become that dimension's
    /// index. No other indexes are created; see [`gather_indexes()`].
    ///
    /// [`gather_indexes()`]: super::gather_indexes
    pub fn new<D: Into<SmolStr>, N: Into<SmolStr>>(
        dims: impl IntoIterator<Item=D>,
        data: ArrayD<f64>,
        coords: impl IntoIterator<Item=(N, Coordinate)>,
    ) -> Result<Self> {
        let dims: Vec<SmolStr> = dims.into_iter().map(Into::into).collect();
        let coords: IndexMap<SmolStr, Coordinate> = coords.into_iter().map(|(n, c)| (n.into(), c)).collect();
        let indexes = dims.iter()
            .filter(|d| coords.get(*d).map_or(false, |c| c.only_along(d)))
            .map(|d| (d.clone(), vec![d.clone()]))
            .collect();
        Self::from_parts(dims, data, coords, indexes)
    }

    /// Constructs a `LabeledArray` with explicit indexes.
    pub(crate) fn from_parts(
        dims: Vec<SmolStr>,
        data: ArrayD<f64>,
        coords: IndexMap<SmolStr, Coordinate>,
        mut indexes: IndexMap<SmolStr, Vec<SmolStr>>,
    ) -> Result<Self> {
        if dims.len() != data.ndim() {
            return Err(AssemblyError::structural(format!(
                "{} dimension names for {} axes", dims.len(), data.ndim(),
            )));
        }
        for (i, d) in dims.iter().enumerate() {
            if dims[..i].contains(d) {
                return Err(AssemblyError::structural(format!("duplicate dimension `{}`", d)));
            }
        }
        for (name, coord) in &coords {
            for (i, d) in coord.dims().iter().enumerate() {
                let axis = dims.iter().position(|x| x == d)
                    .ok_or_else(|| AssemblyError::UnknownDimension(d.clone()))?;
                if coord.dims()[..i].contains(d) {
                    return Err(AssemblyError::structural(format!("`{}` repeats dimension `{}`", name, d)));
                }
                let (expected, actual) = (data.shape()[axis], coord.values().shape()[i]);
                if expected != actual {
                    return Err(AssemblyError::LengthMismatch {name: name.clone(), expected, actual});
                }
            }
        }
        indexes.retain(|_, levels| !levels.is_empty());
        let mut seen: Vec<&SmolStr> = Vec::new();
        for (dim, levels) in &indexes {
            if !dims.contains(dim) { return Err(AssemblyError::UnknownDimension(dim.clone())); }
            for level in levels {
                let coord = coords.get(level).ok_or_else(|| AssemblyError::UnknownCoordinate(level.clone()))?;
                if !coord.only_along(dim) || seen.contains(&level) {
                    return Err(AssemblyError::structural(format!(
                        "`{}` cannot be a level of the index of `{}`", level, dim,
                    )));
                }
                seen.push(level);
            }
        }
        indexes.sort_by(|a, _, b, _| {
            let pos = |d: &SmolStr| dims.iter().position(|x| x == d);
            pos(a).cmp(&pos(b))
        });
        Ok(Self {dims, data, coords, indexes})
    }

    /// Appends `levels` to the index of `dim`. They must be coordinates that
    /// vary only along `dim` and belong to no index.
    pub(crate) fn push_levels(&mut self, dim: &SmolStr, levels: impl IntoIterator<Item=SmolStr>) {
        self.indexes.entry(dim.clone()).or_default().extend(levels);
        let dims = &self.dims;
        self.indexes.sort_by(|a, _, b, _| {
            let pos = |d: &SmolStr| dims.iter().position(|x| x == d);
            pos(a).cmp(&pos(b))
        });
    }

    pub(crate) fn into_parts(self) -> (Vec<SmolStr>, ArrayD<f64>, IndexMap<SmolStr, Coordinate>, IndexMap<SmolStr, Vec<SmolStr>>) {
        (self.dims, self.data, self.coords, self.indexes)
    }

    pub fn dims(&self) -> &[SmolStr] { &self.dims }

    pub fn shape(&self) -> &[usize] { self.data.shape() }

    pub fn data(&self) -> &ArrayD<f64> { &self.data }

    pub fn coords(&self) -> &IndexMap<SmolStr, Coordinate> { &self.coords }

    /// The levels of every index, keyed by dimension, in dimension order.
    pub fn indexes(&self) -> &IndexMap<SmolStr, Vec<SmolStr>> { &self.indexes }

    pub fn has_dim(&self, dim: &str) -> bool { self.dims.iter().any(|d| d == dim) }

    pub fn axis(&self, dim: &str) -> Result<usize> {
        self.dims.iter().position(|d| d == dim).ok_or_else(|| AssemblyError::UnknownDimension(dim.into()))
    }

    pub fn dim_len(&self, dim: &str) -> Result<usize> { Ok(self.data.shape()[self.axis(dim)?]) }

    pub fn has_coord(&self, name: &str) -> bool { self.coords.contains_key(name) }

    pub fn coord(&self, name: &str) -> Result<&Coordinate> {
        self.coords.get(name).ok_or_else(|| AssemblyError::UnknownCoordinate(name.into()))
    }

    pub fn index_levels(&self, dim: &str) -> Option<&[SmolStr]> {
        self.indexes.get(dim).map(Vec::as_slice)
    }

    /// The dimension whose index has `level` as a level.
    pub fn index_dim_of(&self, level: &str) -> Option<&SmolStr> {
        self.indexes.iter().find(|(_, levels)| levels.iter().any(|l| l == level)).map(|(d, _)| d)
    }

    pub fn is_index_level(&self, name: &str) -> bool { self.index_dim_of(name).is_some() }

    /// Whether `dim` has an index that is not just its dimension coordinate.
    pub fn is_multi_index(&self, dim: &str) -> bool {
        match self.index_levels(dim) {
            Some(levels) => !(levels.len() == 1 && levels[0] == dim),
            None => false,
        }
    }

    /// The single dimension that `name` varies along. `name` may be a
    /// coordinate or an indexed dimension.
    pub fn dim_of(&self, name: &str) -> Result<SmolStr> {
        if let Some(coord) = self.coords.get(name) {
            return match coord.dims() {
                [dim] => Ok(dim.clone()),
                dims => Err(AssemblyError::structural(format!(
                    "`{}` varies along {:?}, not exactly one dimension", name, dims,
                ))),
            };
        }
        if self.has_dim(name) { return Ok(name.into()); }
        Err(AssemblyError::UnknownCoordinate(name.into()))
    }

    /// The labels of `name` along [`dim_of(name)`](Self::dim_of()).
    ///
    /// For a coordinate these are its values. For a dimension with a
    /// multi-level index they are [`MultiCoordKey`]s of its levels, and for a
    /// dimension without an index they are its positions.
    ///
    /// [`MultiCoordKey`]: super::MultiCoordKey
    pub fn labels(&self, name: &str) -> Result<Vec<Value>> {
        if let Some(coord) = self.coords.get(name) {
            self.dim_of(name)?;
            return Ok(coord.to_vec());
        }
        let len = self.dim_len(name)?;
        match self.index_levels(name) {
            Some([level]) => Ok(self.coord(level)?.to_vec()),
            Some(levels) => {
                let columns = levels.iter().map(|l| Ok(self.coord(l)?.to_vec())).collect::<Result<Vec<_>>>()?;
                let keys = zip_keys(&columns).ok_or_else(|| AssemblyError::structural("ragged index"))?;
                Ok(keys.into_iter().map(Value::Key).collect())
            },
            None => Ok((0..len).map(Value::from).collect()),
        }
    }

    // ------------------------------------------------------------------------

    /// Adds or replaces coordinate `name`.
    ///
    /// If `name` was an index level and `coord` no longer varies along only
    /// that index's dimension, it stops being a level.
    pub fn with_coord(&self, name: impl Into<SmolStr>, coord: Coordinate) -> Result<Self> {
        let name = name.into();
        let mut indexes = self.indexes.clone();
        for (dim, levels) in indexes.iter_mut() {
            if !coord.only_along(dim) { levels.retain(|l| *l != name); }
        }
        let mut coords = self.coords.clone();
        coords.insert(name, coord);
        Self::from_parts(self.dims.clone(), self.data.clone(), coords, indexes)
    }

    /// Removes coordinate `name`, and removes it from any index.
    pub fn drop_coord(&self, name: &str) -> Result<Self> {
        let mut out = self.clone();
        out.coords.shift_remove(name).ok_or_else(|| AssemblyError::UnknownCoordinate(name.into()))?;
        for levels in out.indexes.values_mut() { levels.retain(|l| l != name); }
        out.indexes.retain(|_, levels| !levels.is_empty());
        Ok(out)
    }

    /// Composes `levels` into the index of `dim`.
    ///
    /// - append - If `true`, `levels` are added after the existing levels.
    /// Otherwise they replace them, and the old levels become plain
    /// coordinates.
    pub fn set_index<N: AsRef<str>>(&self, dim: &str, levels: &[N], append: bool) -> Result<Self> {
        self.axis(dim)?;
        let mut indexes = self.indexes.clone();
        let mut new_levels: Vec<SmolStr> = match (append, indexes.get(dim)) {
            (true, Some(old)) => old.clone(),
            _ => Vec::new(),
        };
        for level in levels {
            let level = level.as_ref();
            if !self.coord(level)?.only_along(dim) {
                return Err(AssemblyError::structural(format!(
                    "`{}` does not vary only along `{}`", level, dim,
                )));
            }
            if !new_levels.iter().any(|l| l == level) { new_levels.push(level.into()); }
        }
        for (other, old) in indexes.iter_mut() {
            if other != dim { old.retain(|l| !new_levels.contains(l)); }
        }
        indexes.insert(dim.into(), new_levels);
        Self::from_parts(self.dims.clone(), self.data.clone(), self.coords.clone(), indexes)
    }

    /// Decomposes indexes into plain coordinates.
    ///
    /// Each name may be an indexed dimension, whose whole index is removed,
    /// or a level, which is removed from its index. The coordinates remain.
    pub fn reset_index<N: AsRef<str>>(&self, names: &[N]) -> Result<Self> {
        let mut out = self.clone();
        for name in names {
            let name = name.as_ref();
            if out.indexes.shift_remove(name).is_some() { continue; }
            let dim = out.index_dim_of(name).cloned()
                .ok_or_else(|| AssemblyError::structural(format!("`{}` is not an index", name)))?;
            if let Some(levels) = out.indexes.get_mut(&dim) { levels.retain(|l| l != name); }
            out.indexes.retain(|_, levels| !levels.is_empty());
        }
        Ok(out)
    }

    /// Keeps only `positions` (in that order) along `dim`.
    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self> {
        let axis = self.axis(dim)?;
        let len = self.data.shape()[axis];
        if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
            return Err(AssemblyError::structural(format!(
                "position {} out of range for `{}` of length {}", bad, dim, len,
            )));
        }
        let data = self.data.select(Axis(axis), positions);
        let coords = self.coords.iter().map(|(n, c)| (n.clone(), c.select(dim, positions))).collect();
        Self::from_parts(self.dims.clone(), data, coords, self.indexes.clone())
    }

    /// Removes `dim`, which must have length 1. Coordinates along it lose
    /// that dimension, and its index is discarded.
    pub fn squeeze(&self, dim: &str) -> Result<Self> {
        let axis = self.axis(dim)?;
        let actual = self.data.shape()[axis];
        if actual != 1 {
            return Err(AssemblyError::LengthMismatch {name: dim.into(), expected: 1, actual});
        }
        let mut dims = self.dims.clone();
        dims.remove(axis);
        let data = self.data.index_axis(Axis(axis), 0).to_owned();
        let coords = self.coords.iter().map(|(n, c)| (n.clone(), c.squeeze(dim))).collect();
        let mut indexes = self.indexes.clone();
        indexes.shift_remove(dim);
        Self::from_parts(dims, data, coords, indexes)
    }

    /// Inserts a new first dimension `dim` of length 1.
    ///
    /// If there is a scalar coordinate called `dim`, it becomes the
    /// dimension coordinate of the new dimension.
    pub fn expand_dims(&self, dim: impl Into<SmolStr>) -> Result<Self> {
        let dim = dim.into();
        if self.has_dim(&dim) {
            return Err(AssemblyError::structural(format!("dimension `{}` already exists", dim)));
        }
        let mut dims = self.dims.clone();
        dims.insert(0, dim.clone());
        let data = self.data.clone().insert_axis(Axis(0));
        let mut coords = self.coords.clone();
        let mut indexes = self.indexes.clone();
        if let Some(c) = coords.get_mut(&dim) {
            if c.is_scalar() {
                *c = c.insert_dim(dim.clone());
                indexes.insert(dim.clone(), vec![dim.clone()]);
            }
        }
        Self::from_parts(dims, data, coords, indexes)
    }

    /// Combines `stacked` into a single dimension `new_dim`, placed where the
    /// first of them was. Positions along `new_dim` enumerate `stacked` in
    /// row-major order.
    ///
    /// Coordinates that vary only along stacked dimensions are spread along
    /// `new_dim`, and the index of `new_dim` is the concatenation of the
    /// stacked dimensions' index levels.
    pub fn stack<N: AsRef<str>>(&self, new_dim: impl Into<SmolStr>, stacked: &[N]) -> Result<Self> {
        let new_dim = new_dim.into();
        let stacked: Vec<SmolStr> = stacked.iter().map(|s| SmolStr::new(s.as_ref())).collect();
        let axes = stacked.iter().map(|d| self.axis(d)).collect::<Result<Vec<_>>>()?;
        if stacked.is_empty() {
            return Err(AssemblyError::structural("nothing to stack"));
        }
        if self.has_dim(&new_dim) && !stacked.contains(&new_dim) {
            return Err(AssemblyError::structural(format!("dimension `{}` already exists", new_dim)));
        }
        let sizes: Vec<usize> = axes.iter().map(|&a| self.data.shape()[a]).collect();
        let total: usize = sizes.iter().product();
        // Dimension order, with the stacked group in place of its first member.
        let first = *axes.iter().min().unwrap_or(&0);
        let mut order = Vec::new();
        let mut dims = Vec::new();
        let mut shape = Vec::new();
        for (axis, d) in self.dims.iter().enumerate() {
            if axis == first {
                order.extend(axes.iter().copied());
                dims.push(new_dim.clone());
                shape.push(total);
            } else if !axes.contains(&axis) {
                order.push(axis);
                dims.push(d.clone());
                shape.push(self.data.shape()[axis]);
            }
        }
        let data = self.data.view().permuted_axes(&order[..])
            .as_standard_layout().into_owned()
            .into_shape(IxDyn(&shape))?;
        // Row-major components of each stacked position.
        let components: Vec<Vec<usize>> = (0..total).map(|mut p| {
            let mut c = vec![0; sizes.len()];
            for i in (0..sizes.len()).rev() {
                c[i] = p % sizes[i];
                p /= sizes[i];
            }
            c
        }).collect();
        let mut coords = IndexMap::new();
        for (name, coord) in &self.coords {
            if !coord.dims().iter().any(|d| stacked.contains(d)) {
                coords.insert(name.clone(), coord.clone());
                continue;
            }
            let which = coord.dims().iter().map(|d| {
                stacked.iter().position(|s| s == d).ok_or_else(|| AssemblyError::structural(format!(
                    "cannot stack `{}`, which also varies along `{}`", name, d,
                )))
            }).collect::<Result<Vec<_>>>()?;
            let spread: Vec<Value> = components.iter().map(|c| {
                let index: Vec<usize> = which.iter().map(|&w| c[w]).collect();
                coord.values()[IxDyn(&index)].clone()
            }).collect();
            coords.insert(name.clone(), Coordinate::along(new_dim.clone(), spread));
        }
        let mut indexes = IndexMap::new();
        let mut levels = Vec::new();
        for (dim, old) in &self.indexes {
            if stacked.contains(dim) { continue; }
            indexes.insert(dim.clone(), old.clone());
        }
        for d in &stacked {
            if let Some(old) = self.indexes.get(d) { levels.extend(old.iter().cloned()); }
        }
        indexes.insert(new_dim, levels);
        Self::from_parts(dims, data, coords, indexes)
    }

    /// Renames dimension `old` to `new`. A dimension coordinate called `old`
    /// is renamed too.
    pub fn rename_dim(&self, old: &str, new: impl Into<SmolStr>) -> Result<Self> {
        let new = new.into();
        let axis = self.axis(old)?;
        if new != old && self.has_dim(&new) {
            return Err(AssemblyError::structural(format!("dimension `{}` already exists", new)));
        }
        let mut dims = self.dims.clone();
        dims[axis] = new.clone();
        let rename_coord = self.coords.get(old).map_or(false, |c| c.only_along(old)) && !self.coords.contains_key(&new);
        let rename = |n: &SmolStr| if rename_coord && n == old { new.clone() } else { n.clone() };
        let coords = self.coords.iter().map(|(n, c)| (rename(n), c.rename_dim(old, &new))).collect();
        let indexes = self.indexes.iter().map(|(d, levels)| {
            let d = if d == old { new.clone() } else { d.clone() };
            (d, levels.iter().map(rename).collect())
        }).collect();
        Self::from_parts(dims, self.data.clone(), coords, indexes)
    }

    /// Reorders the dimensions. `order` must be a permutation of
    /// [`dims()`](Self::dims()).
    pub fn transpose<N: AsRef<str>>(&self, order: &[N]) -> Result<Self> {
        let axes = order.iter().map(|d| self.axis(d.as_ref())).collect::<Result<Vec<_>>>()?;
        if axes.len() != self.dims.len() || (0..axes.len()).any(|a| !axes.contains(&a)) {
            return Err(AssemblyError::structural(format!("{:?} does not permute {:?}", axes, self.dims)));
        }
        let dims = axes.iter().map(|&a| self.dims[a].clone()).collect();
        let data = self.data.view().permuted_axes(&axes[..]).as_standard_layout().into_owned();
        Self::from_parts(dims, data, self.coords.clone(), self.indexes.clone())
    }

    // ------------------------------------------------------------------------

    /// Applies `f` to every lane spanning the dimensions in `over`, removing
    /// those dimensions along with every coordinate that varies along them.
    pub fn reduce_with(&self, over: &ReduceOver, f: impl Fn(ArrayView1<f64>) -> f64) -> Result<Self> {
        let reduced = over.resolve(self)?;
        if reduced.is_empty() { return Ok(self.clone()); }
        let (mut kept, mut gone) = (Vec::new(), Vec::new());
        for (axis, d) in self.dims.iter().enumerate() {
            if reduced.contains(d) { gone.push(axis) } else { kept.push(axis) }
        }
        let kept_shape: Vec<usize> = kept.iter().map(|&a| self.data.shape()[a]).collect();
        let lane: usize = gone.iter().map(|&a| self.data.shape()[a]).product();
        let order: Vec<usize> = kept.iter().chain(gone.iter()).copied().collect();
        let lanes = self.data.view().permuted_axes(&order[..])
            .as_standard_layout().into_owned()
            .into_shape((kept_shape.iter().product::<usize>(), lane))?;
        let data: Array1<f64> = lanes.map_axis(Axis(1), f);
        let data = data.into_shape(IxDyn(&kept_shape))?;
        let dims = kept.iter().map(|&a| self.dims[a].clone()).collect();
        let coords = self.coords.iter()
            .filter(|(_, c)| !c.dims().iter().any(|d| reduced.contains(d)))
            .map(|(n, c)| (n.clone(), c.clone()))
            .collect();
        let mut indexes = self.indexes.clone();
        indexes.retain(|d, _| !reduced.contains(d));
        Self::from_parts(dims, data, coords, indexes)
    }

    /// Like [`reduce_with()`](Self::reduce_with()), with `R` choosing the
    /// function.
    pub fn reduce<R: Reducer>(&self, over: &ReduceOver) -> Result<Self> { self.reduce_with(over, R::reduce) }

    pub fn mean(&self, over: &ReduceOver) -> Result<Self> { self.reduce::<Mean>(over) }

    pub fn sum(&self, over: &ReduceOver) -> Result<Self> { self.reduce::<Sum>(over) }

    // ------------------------------------------------------------------------

    /// Compares dimensions, data and coordinate values. `NaN` equals `NaN`.
    /// Index composition is ignored.
    pub fn equals(&self, other: &Self) -> bool {
        self.dims == other.dims
            && self.data.shape() == other.data.shape()
            && self.data.iter().zip(other.data.iter()).all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
            && self.coords.len() == other.coords.len()
            && self.coords.iter().all(|(n, c)| other.coords.get(n) == Some(c))
    }

    /// Like [`equals()`](Self::equals()), but also compares indexes.
    pub fn identical(&self, other: &Self) -> bool {
        self.equals(other) && self.indexes == other.indexes
    }
}

impl Display for LabeledArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<String> = self.dims.iter().zip(self.data.shape()).map(|(d, n)| format!("{}: {}", d, n)).collect();
        writeln!(f, "<LabeledArray ({})>", sizes.join(", "))?;
        writeln!(f, "{}", self.data)?;
        writeln!(f, "Coordinates:")?;
        for (name, coord) in &self.coords {
            let marker = if self.is_index_level(name) { '*' } else { ' ' };
            let shown: Vec<String> = coord.values().iter().take(6).map(|v| v.to_string()).collect();
            let more = if coord.len() > 6 { " ..." } else { "" };
            writeln!(f, "  {} {} ({}) {}{}", marker, name, coord.dims().join(", "), shown.join(" "), more)?;
        }
        for (dim, levels) in &self.indexes {
            if self.is_multi_index(dim) { writeln!(f, "  * {} ({})", dim, levels.join(", "))?; }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2};

    use super::*;
    use crate::{values};

    fn updown() -> LabeledArray {
        LabeledArray::new(["a", "b"], arr2(&[
            [1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0],
            [10.0, 11.0, 12.0], [13.0, 14.0, 15.0], [16.0, 17.0, 18.0],
        ]).into_dyn(), [
            ("up", Coordinate::along("a", values(["alpha", "alpha", "beta", "beta", "beta", "beta"]))),
            ("down", Coordinate::along("a", values([1, 1, 1, 1, 2, 2]))),
            ("sideways", Coordinate::along("b", values(["x", "y", "z"]))),
        ]).unwrap()
    }

    #[test]
    fn construction_checks() {
        let data = arr1(&[1.0, 2.0]).into_dyn();
        let bad = LabeledArray::new(["a"], data.clone(), [("x", Coordinate::along("a", values([1])))]);
        assert!(matches!(bad, Err(AssemblyError::LengthMismatch {..})));
        let bad = LabeledArray::new(["a"], data.clone(), [("x", Coordinate::along("c", values([1, 2])))]);
        assert!(matches!(bad, Err(AssemblyError::UnknownDimension(_))));
        let bad = LabeledArray::new(["a", "a"], arr2(&[[1.0]]).into_dyn(), Vec::<(&str, Coordinate)>::new());
        assert!(matches!(bad, Err(AssemblyError::StructuralAssumption(_))));
        let good = LabeledArray::new(["a"], data, [("c", Coordinate::scalar("remnant"))]).unwrap();
        assert!(good.coord("c").unwrap().is_scalar());
    }

    #[test]
    fn set_and_reset_index() {
        let a = updown().set_index("a", &["up", "down"], true).unwrap();
        assert_eq!(a.index_levels("a").unwrap(), ["up", "down"]);
        assert!(a.is_multi_index("a"));
        assert_eq!(a.labels("a").unwrap()[4].to_string(), "('beta', 2)");
        let r = a.reset_index(&["down"]).unwrap();
        assert_eq!(r.index_levels("a").unwrap(), ["up"]);
        let r = a.reset_index(&["a"]).unwrap();
        assert!(r.index_levels("a").is_none());
        assert!(r.has_coord("up") && r.has_coord("down"));
        assert!(a.set_index("b", &["up"], true).is_err());
        assert!(a.reset_index(&["sideways"]).is_err());
    }

    #[test]
    fn reduce_drops_coords() {
        let m = updown().mean(&ReduceOver::dim("a")).unwrap();
        assert_eq!(m.dims(), ["b"]);
        assert_eq!(m.data().as_slice().unwrap(), [8.5, 9.5, 10.5]);
        assert!(!m.has_coord("up"));
        assert!(m.has_coord("sideways"));
        let s = updown().sum(&ReduceOver::All).unwrap();
        assert_eq!(s.shape(), [] as [usize; 0]);
        assert_eq!(s.data().iter().next(), Some(&171.0));
    }

    #[test]
    fn isel_and_squeeze() {
        let a = updown().isel("a", &[4, 5]).unwrap();
        assert_eq!(a.coord("down").unwrap().to_vec(), values([2, 2]));
        let one = a.isel("a", &[0]).unwrap().squeeze("a").unwrap();
        assert_eq!(one.dims(), ["b"]);
        assert_eq!(one.coord("up").unwrap().scalar_value(), Some(&Value::from("beta")));
        assert!(updown().isel("a", &[6]).is_err());
        assert!(updown().squeeze("a").is_err());
    }

    #[test]
    fn stack_dims() {
        let a = updown().set_index("b", &["sideways"], false).unwrap();
        let s = a.stack("ab", &["a", "b"]).unwrap();
        assert_eq!(s.dims(), ["ab"]);
        assert_eq!(s.shape(), [18]);
        assert_eq!(s.data().as_slice().unwrap()[..4], [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.coord("sideways").unwrap().to_vec()[..4], values(["x", "y", "z", "x"])[..]);
        assert_eq!(s.coord("up").unwrap().to_vec()[2..4], values(["alpha", "alpha"])[..]);
        assert_eq!(s.index_levels("ab").unwrap(), ["sideways"]);
    }

    #[test]
    fn expand_rename_transpose() {
        let a = updown().with_coord("c", Coordinate::scalar("remnant")).unwrap();
        let e = a.expand_dims("c").unwrap();
        assert_eq!(e.dims(), ["c", "a", "b"]);
        assert_eq!(e.index_levels("c").unwrap(), ["c"]);
        let r = e.rename_dim("c", "d").unwrap();
        assert_eq!(r.dims(), ["d", "a", "b"]);
        assert!(r.has_coord("d") && !r.has_coord("c"));
        let t = updown().transpose(&["b", "a"]).unwrap();
        assert_eq!(t.shape(), [3, 6]);
        assert_eq!(t.data()[IxDyn(&[0, 1])], 4.0);
        assert!(updown().transpose(&["b"]).is_err());
    }

    #[test]
    fn display_lists_coords() {
        let shown = updown().set_index("a", &["up", "down"], true).unwrap().to_string();
        assert!(shown.contains("up (a)"));
        assert!(shown.contains("* a (up, down)"));
        assert!(shown.contains("sideways"));
    }
}
