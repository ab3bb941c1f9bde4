use std::collections::{BTreeMap};

use indexmap::{IndexMap};
use itertools::{Itertools};
use ndarray::{ArrayD, ArrayViewD, Dimension, ErrorKind, IxDyn, ShapeError};
use smol_str::{SmolStr};

use super::{AssemblyError, Result, Assembly, LabeledArray, Value, zip_keys};

/// The part of an array, or of a coordinate, that one combination of group
/// values selects. A single element is always a `Scalar`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<T> {
    Scalar(T),
    Array(ArrayD<T>),
}

impl<T: Clone> Cell<T> {
    /// Collapses a single-element array to a `Scalar`.
    pub fn simplify(array: ArrayD<T>) -> Self {
        if array.len() == 1 {
            if let Some(value) = array.iter().next() { return Cell::Scalar(value.clone()); }
        }
        Cell::Array(array)
    }

    pub fn as_scalar(&self) -> Option<&T> {
        match self {
            Cell::Scalar(value) => Some(value),
            Cell::Array(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Cell::Scalar(_) => 1,
            Cell::Array(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// A `Scalar` becomes a zero-dimensional array.
    pub fn into_array(self) -> ArrayD<T> {
        match self {
            Cell::Scalar(value) => ArrayD::from_elem(IxDyn(&[]), value),
            Cell::Array(array) => array,
        }
    }

    /// Applies `f` to every element.
    pub fn map(self, mut f: impl FnMut(T) -> T) -> Self {
        match self {
            Cell::Scalar(value) => Cell::Scalar(f(value)),
            Cell::Array(array) => Cell::Array(array.mapv_into(f)),
        }
    }
}

impl Cell<f64> {
    /// The arithmetic mean. An empty cell gives `NaN`.
    pub fn mean(&self) -> f64 {
        match self {
            Cell::Scalar(value) => *value,
            Cell::Array(array) => array.mean().unwrap_or(f64::NAN),
        }
    }
}

impl From<f64> for Cell<f64> {
    fn from(value: f64) -> Self { Cell::Scalar(value) }
}

// ----------------------------------------------------------------------------

impl Assembly {
    /// Replaces every cell of the data, one combination of group values at
    /// a time.
    ///
    /// Each name in `groups` is a coordinate or an indexed dimension that
    /// varies along one dimension. Names on the same dimension group it by
    /// their joint values; a dimension that no name groups is passed whole.
    /// For every combination of groups, `apply` receives the cell and the
    /// matching part of every coordinate, and returns either a scalar, which
    /// fills the cell, or an array of the cell's shape. Every position keeps
    /// its place, so the result has the dimensions, shape and coordinates of
    /// `self`.
    ///
    /// ```
    /// use ndarray::{arr2};
    /// use assemblies::{Assembly, AssemblyKind, LabeledArray, Coordinate, values};
    /// let a = Assembly::new(AssemblyKind::Data, LabeledArray::new(["a", "b"], arr2(&[
    ///     [1.0, 2.0], [3.0, 5.0],
    /// ]).into_dyn(), [
    ///     ("b", Coordinate::along("b", values(["x", "y"]))),
    /// ]).unwrap());
    /// let centred = a.multi_dim_apply(&["b"], |x, _| {
    ///     let mean = x.mean();
    ///     x.map(|v| v - mean)
    /// }).unwrap();
    /// assert_eq!(centred.data().as_slice().unwrap(), [-1.0, -1.5, 1.0, 1.5]);
    /// ```
    pub fn multi_dim_apply<N: AsRef<str>>(
        &self,
        groups: &[N],
        mut apply: impl FnMut(Cell<f64>, &IndexMap<SmolStr, Cell<Value>>) -> Cell<f64>,
    ) -> Result<Assembly> {
        if groups.is_empty() { return Err(AssemblyError::structural("nothing to group by")); }
        let mut names: Vec<Vec<SmolStr>> = vec![Vec::new(); self.dims().len()];
        for name in groups {
            let name = name.as_ref();
            let axis = self.axis(&self.dim_of(name)?)?;
            names[axis].push(name.into());
        }
        let partitions = self.dims().iter().zip(&names)
            .map(|(dim, names)| self.partition(dim, names))
            .collect::<Result<Vec<_>>>()?;
        let coord_axes = self.coords().values()
            .map(|c| c.dims().iter().map(|d| self.axis(d)).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;

        let mut result = ArrayD::<f64>::zeros(IxDyn(self.shape()));
        for combination in partitions.iter().map(|p| 0..p.len()).multi_cartesian_product() {
            let positions: Vec<&[usize]> = combination.iter().zip(&partitions).map(|(&i, p)| p[i].as_slice()).collect();
            let shape: Vec<usize> = positions.iter().map(|p| p.len()).collect();
            tracing::trace!("applying to combination {:?}, cell shape {:?}", combination, shape);
            let cell = narrow(self.data().view(), &positions);
            let mut cell_coords = IndexMap::with_capacity(self.coords().len());
            for ((name, coord), axes) in self.coords().iter().zip(&coord_axes) {
                let along: Vec<&[usize]> = axes.iter().map(|&axis| positions[axis]).collect();
                let values = narrow(coord.values().view(), &along);
                cell_coords.insert(name.clone(), Cell::simplify(values));
            }
            let mut put = |index: &[usize], value: f64| {
                let target: Vec<usize> = index.iter().zip(&positions).map(|(&i, p)| p[i]).collect();
                result[IxDyn(&target)] = value;
            };
            match apply(Cell::simplify(cell), &cell_coords) {
                Cell::Scalar(value) => {
                    for index in ndarray::indices(IxDyn(&shape)) { put(index.slice(), value); }
                },
                Cell::Array(values) => {
                    if values.shape() != shape.as_slice() {
                        return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
                    }
                    for (index, &value) in values.indexed_iter() { put(index.slice(), value); }
                },
            }
        }
        let (dims, _, coords, indexes) = self.array().clone().into_parts();
        let array = LabeledArray::from_parts(dims, result, coords, indexes)?;
        Ok(self.derive_gathered(array))
    }

    /// The positions along `dim` for each joint value of `names`, in sorted
    /// order. With no names, all positions form one group.
    fn partition(&self, dim: &str, names: &[SmolStr]) -> Result<Vec<Vec<usize>>> {
        let labels = match names {
            [] => return Ok(vec![(0..self.dim_len(dim)?).collect()]),
            [name] => self.labels(name)?,
            names => {
                let columns = names.iter().map(|n| self.labels(n)).collect::<Result<Vec<_>>>()?;
                let keys = zip_keys(&columns).ok_or_else(|| AssemblyError::structural("ragged group coordinates"))?;
                keys.into_iter().map(Value::Key).collect()
            },
        };
        let mut groups: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
        for (i, label) in labels.into_iter().enumerate() { groups.entry(label).or_default().push(i); }
        Ok(groups.into_values().collect())
    }
}

/// Copies the elements of `view` at `positions`, one list per axis, reading
/// nothing outside the cell.
fn narrow<A: Clone>(view: ArrayViewD<'_, A>, positions: &[&[usize]]) -> ArrayD<A> {
    let shape: Vec<usize> = positions.iter().map(|p| p.len()).collect();
    ArrayD::from_shape_fn(IxDyn(&shape), |index| {
        let source: Vec<usize> = index.slice().iter().zip(positions).map(|(&i, p)| p[i]).collect();
        view[IxDyn(&source)].clone()
    })
}

// ----------------------------------------------------------------------------
