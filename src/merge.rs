//! Combining several arrays into one by an outer join of their labels.

use std::collections::{BTreeSet};

use indexmap::{IndexMap};
use ndarray::{ArrayD, Dimension, IxDyn};
use smol_str::{SmolStr};

use super::{AssemblyError, Result, LabeledArray, Coordinate, Value, MultiCoordKey, zip_keys, unzip_keys};

/// How one dimension of the merged array is labelled.
struct Joined {
    levels: Option<Vec<SmolStr>>,
    labels: Vec<Value>,
    /// For each input, the merged position of each of its positions.
    targets: Vec<Vec<usize>>,
    aligned: bool,
}

/// The labels of `dim` given by its index levels, or its positions if it has
/// no index.
fn index_labels(array: &LabeledArray, dim: &str) -> Result<Vec<Value>> {
    match array.index_levels(dim) {
        None => Ok((0..array.dim_len(dim)?).map(Value::from).collect()),
        Some([level]) => Ok(array.coord(level)?.to_vec()),
        Some(levels) => {
            let columns = levels.iter().map(|l| Ok(array.coord(l)?.to_vec())).collect::<Result<Vec<_>>>()?;
            let keys = zip_keys(&columns).ok_or_else(|| AssemblyError::structural("ragged index"))?;
            Ok(keys.into_iter().map(Value::Key).collect())
        },
    }
}

fn join(arrays: &[LabeledArray], dim: &SmolStr) -> Result<Joined> {
    let levels = arrays[0].index_levels(dim).map(<[_]>::to_vec);
    if arrays.iter().any(|a| a.index_levels(dim).map(<[_]>::to_vec) != levels) {
        return Err(AssemblyError::structural(format!("inputs disagree on the index of `{}`", dim)));
    }
    let all = arrays.iter().map(|a| index_labels(a, dim)).collect::<Result<Vec<_>>>()?;
    if all.iter().all(|l| *l == all[0]) {
        let targets = all.iter().map(|l| (0..l.len()).collect()).collect();
        return Ok(Joined {levels, labels: all[0].clone(), targets, aligned: false});
    }
    if levels.is_none() {
        return Err(AssemblyError::structural(format!("cannot align `{}`, which has no index", dim)));
    }
    for labels in &all {
        if labels.iter().collect::<BTreeSet<_>>().len() != labels.len() {
            return Err(AssemblyError::structural(format!("cannot align `{}`, which has duplicate labels", dim)));
        }
    }
    let union: Vec<Value> = all.iter().flatten().cloned().collect::<BTreeSet<_>>().into_iter().collect();
    let targets = all.iter().map(|labels| {
        labels.iter().map(|l| union.binary_search(l).map_err(|_| AssemblyError::structural("label vanished from union")))
            .collect::<Result<Vec<_>>>()
    }).collect::<Result<Vec<_>>>()?;
    tracing::debug!("aligned `{}` to {} labels", dim, union.len());
    Ok(Joined {levels, labels: union, targets, aligned: true})
}

impl LabeledArray {
    /// Merges `arrays` by an outer join of the labels of every dimension.
    ///
    /// The inputs must have the same dimensions and the same index levels.
    /// A dimension whose labels differ between inputs takes the sorted union
    /// of them, and must be indexed with no duplicate labels. Cells no input
    /// covers are `NaN`. Two inputs may not give different non-`NaN` values
    /// for one cell. Coordinates other than index levels must agree wherever
    /// they occur, and must not vary along a dimension that was aligned.
    ///
    /// ```
    /// use ndarray::{arr1};
    /// use assemblies::{LabeledArray, Coordinate, values};
    /// let a = LabeledArray::new(["a"], arr1(&[1.0, 2.0]).into_dyn(), [("a", Coordinate::along("a", values(["x", "y"])))]).unwrap();
    /// let b = LabeledArray::new(["a"], arr1(&[3.0]).into_dyn(), [("a", Coordinate::along("a", values(["w"])))]).unwrap();
    /// let m = LabeledArray::merge(&[&a, &b]).unwrap();
    /// assert_eq!(m.coord("a").unwrap().to_vec(), values(["w", "x", "y"]));
    /// assert_eq!(m.data().as_slice().unwrap(), [3.0, 1.0, 2.0]);
    /// ```
    pub fn merge(arrays: &[&LabeledArray]) -> Result<Self> {
        let first = arrays.first().ok_or_else(|| AssemblyError::structural("nothing to merge"))?;
        let dims = first.dims().to_vec();
        let arrays = arrays.iter().map(|a| {
            if a.dims().len() != dims.len() || !dims.iter().all(|d| a.has_dim(d)) {
                return Err(AssemblyError::structural(format!("cannot merge {:?} with {:?}", a.dims(), dims)));
            }
            a.transpose(&dims)
        }).collect::<Result<Vec<_>>>()?;
        let joined = dims.iter().map(|d| join(&arrays, d)).collect::<Result<Vec<_>>>()?;

        let shape: Vec<usize> = joined.iter().map(|j| j.labels.len()).collect();
        let mut data = ArrayD::from_elem(IxDyn(&shape), f64::NAN);
        for (n, array) in arrays.iter().enumerate() {
            for (index, &value) in array.data().indexed_iter() {
                if value.is_nan() { continue; }
                let target: Vec<usize> = index.slice().iter().zip(&joined).map(|(&i, j)| j.targets[n][i]).collect();
                let cell = &mut data[IxDyn(&target)];
                if !cell.is_nan() && *cell != value {
                    return Err(AssemblyError::structural(format!(
                        "conflicting values {} and {} at {:?}", cell, value, target,
                    )));
                }
                *cell = value;
            }
        }

        let mut coords = IndexMap::new();
        let mut indexes = IndexMap::new();
        for (dim, j) in dims.iter().zip(&joined) {
            let Some(levels) = &j.levels else { continue };
            if let [level] = levels.as_slice() {
                coords.insert(level.clone(), Coordinate::along(dim.clone(), j.labels.clone()));
            } else {
                let keys = j.labels.iter().map(|v| {
                    v.as_key().ok_or_else(|| AssemblyError::structural(format!("label {} of `{}` is not composite", v, dim)))
                }).collect::<Result<Vec<&MultiCoordKey>>>()?;
                let columns = unzip_keys(keys, levels.len())
                    .ok_or_else(|| AssemblyError::structural(format!("labels of `{}` have the wrong width", dim)))?;
                for (level, column) in levels.iter().zip(columns) {
                    coords.insert(level.clone(), Coordinate::along(dim.clone(), column));
                }
            }
            indexes.insert(dim.clone(), levels.clone());
        }
        let aligned: Vec<&SmolStr> = dims.iter().zip(&joined).filter(|(_, j)| j.aligned).map(|(d, _)| d).collect();
        for array in &arrays {
            for (name, coord) in array.coords() {
                if array.is_index_level(name) { continue; }
                if coord.dims().iter().any(|d| aligned.contains(&d)) {
                    return Err(AssemblyError::structural(format!("cannot align `{}` along {:?}", name, coord.dims())));
                }
                match coords.get(name) {
                    Some(existing) if existing != coord => {
                        return Err(AssemblyError::structural(format!("inputs disagree on `{}`", name)));
                    },
                    Some(_) => {},
                    None => { coords.insert(name.clone(), coord.clone()); },
                }
            }
        }
        LabeledArray::from_parts(dims, data, coords, indexes)
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2};

    use super::*;
    use crate::{gather_indexes, values};

    fn block(rows: &[&str], data: ndarray::Array2<f64>) -> LabeledArray {
        gather_indexes(&LabeledArray::new(["a", "b"], data.into_dyn(), [
            ("up", Coordinate::along("a", values(rows.iter().copied()))),
            ("down", Coordinate::along("a", values(rows.iter().map(|r| r.len() as i64)))),
            ("sideways", Coordinate::along("b", values(["x", "y"]))),
            ("c", Coordinate::scalar("remnant")),
        ]).unwrap())
    }

    #[test]
    fn outer_join() {
        let a = block(&["beta", "alpha"], arr2(&[[1.0, 2.0], [3.0, 4.0]]));
        let b = block(&["gamma"], arr2(&[[5.0, f64::NAN]]));
        let m = LabeledArray::merge(&[&a, &b]).unwrap();
        assert_eq!(m.dims(), ["a", "b"]);
        assert_eq!(m.coord("up").unwrap().to_vec(), values(["alpha", "beta", "gamma"]));
        assert_eq!(m.coord("down").unwrap().to_vec(), values([5i64, 4, 5]));
        assert_eq!(m.index_levels("a").unwrap(), ["up", "down"]);
        assert_eq!(m.coord("sideways").unwrap().to_vec(), values(["x", "y"]));
        assert_eq!(m.coord("c").unwrap().scalar_value(), Some(&Value::from("remnant")));
        let flat: Vec<f64> = m.data().iter().copied().collect();
        assert_eq!(flat[..5], [3.0, 4.0, 1.0, 2.0, 5.0]);
        assert!(flat[5].is_nan());
    }

    #[test]
    fn equal_labels_keep_order() {
        let a = block(&["beta", "alpha"], arr2(&[[1.0, f64::NAN], [3.0, 4.0]]));
        let b = block(&["beta", "alpha"], arr2(&[[f64::NAN, 2.0], [3.0, f64::NAN]]));
        let m = LabeledArray::merge(&[&a, &b.transpose(&["b", "a"]).unwrap()]).unwrap();
        assert_eq!(m.coord("up").unwrap().to_vec(), values(["beta", "alpha"]));
        assert_eq!(m.data(), &arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn());
        assert!(LabeledArray::merge(&[&a]).unwrap().identical(&a));
    }

    #[test]
    fn rejects() {
        let a = block(&["beta", "alpha"], arr2(&[[1.0, 2.0], [3.0, 4.0]]));
        let b = block(&["alpha"], arr2(&[[3.0, 9.0]]));
        assert!(matches!(LabeledArray::merge(&[&a, &b]), Err(AssemblyError::StructuralAssumption(_))));
        let other = b.with_coord("c", Coordinate::scalar("elsewhere")).unwrap();
        let b = block(&["gamma"], arr2(&[[1.0, 2.0]]));
        assert!(LabeledArray::merge(&[&b, &other.isel("a", &[]).unwrap()]).is_err());
        let flat = LabeledArray::new(["a"], arr1(&[1.0]).into_dyn(), Vec::<(&str, Coordinate)>::new()).unwrap();
        let longer = LabeledArray::new(["a"], arr1(&[1.0, 2.0]).into_dyn(), Vec::<(&str, Coordinate)>::new()).unwrap();
        assert!(LabeledArray::merge(&[&flat, &longer]).is_err());
        assert!(LabeledArray::merge(&[&flat, &a]).is_err());
        assert!(LabeledArray::merge(&[]).is_err());
    }
}
