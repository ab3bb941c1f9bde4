//! Reconstruction and inspection of index structure.
//!
//! Flat storage formats cannot hold composite indexes, so an array is saved
//! with every index decomposed into plain coordinates. [`gather_indexes()`]
//! puts the structure back: after it runs, every coordinate that varies along
//! exactly one dimension is a level of that dimension's index.

use smol_str::{SmolStr};

use super::{LabeledArray, Coordinate};

/// The coordinates that vary only along `dim`, in insertion order.
///
/// - exclude_indexes - If `true`, coordinates that are already index levels
/// are left out.
pub fn coords_for_dim<'a>(array: &'a LabeledArray, dim: &str, exclude_indexes: bool) -> Vec<&'a SmolStr> {
    array.coords().iter()
        .filter(|(name, coord)| coord.only_along(dim) && !(exclude_indexes && array.is_index_level(name)))
        .map(|(name, _)| name)
        .collect()
}

/// Composes, for each dimension, every coordinate that varies only along it
/// into its index, after any existing levels.
///
/// Coordinates that are already index levels, and coordinates spanning
/// several dimensions or none, are left alone. Gathering is idempotent.
///
/// ```
/// use ndarray::{arr2};
/// use assemblies::{gather_indexes, LabeledArray, Coordinate, values};
/// let a = LabeledArray::new(["a", "b"], arr2(&[[1.0], [2.0]]).into_dyn(), [
///     ("up", Coordinate::along("a", values(["alpha", "beta"]))),
///     ("down", Coordinate::along("a", values([1, 2]))),
/// ]).unwrap();
/// let g = gather_indexes(&a);
/// assert_eq!(g.index_levels("a").unwrap(), ["up", "down"]);
/// assert!(g.identical(&gather_indexes(&g)));
/// ```
pub fn gather_indexes(array: &LabeledArray) -> LabeledArray {
    let mut gathered = array.clone();
    for dim in array.dims() {
        let levels: Vec<SmolStr> = coords_for_dim(array, dim, true).into_iter().cloned().collect();
        if levels.is_empty() { continue; }
        tracing::debug!("gathering {:?} into the index of `{}`", levels, dim);
        gathered.push_levels(dim, levels);
    }
    gathered
}

/// Every coordinate with its name: index levels first, in dimension and
/// level order, then the remaining coordinates in insertion order.
pub fn walk_coords(array: &LabeledArray) -> impl Iterator<Item=(&SmolStr, &Coordinate)> {
    let levels = array.indexes().values().flatten()
        .filter_map(move |level| array.coords().get_key_value(level));
    let rest = array.coords().iter().filter(move |(name, _)| !array.is_index_level(name));
    levels.chain(rest)
}

/// Whether a coordinate over `dims` is an element of `dim`, i.e. varies along
/// it and nothing else.
pub fn array_is_element<D: AsRef<str>>(dims: &[D], dim: &str) -> bool {
    matches!(dims, [only] if only.as_ref() == dim)
}

/// The levels of every multi-level index, in dimension order.
pub fn get_levels(array: &LabeledArray) -> Vec<SmolStr> {
    array.indexes().iter()
        .filter(|(dim, _)| array.is_multi_index(dim))
        .flat_map(|(_, levels)| levels.iter().cloned())
        .collect()
}

/// Which kinds of name [`get_metadata()`] reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MetadataFilter {
    /// Coordinates that are not index levels.
    pub coords: bool,
    /// Dimensions indexed only by their dimension coordinate.
    pub indexes: bool,
    /// Dimensions with a multi-level index.
    pub multi_indexes: bool,
    /// Levels of multi-level indexes.
    pub levels: bool,
}

impl Default for MetadataFilter {
    fn default() -> Self { Self {coords: true, indexes: true, multi_indexes: false, levels: true} }
}

/// Lists metadata names of `array`, restricted to those relating to `dims`
/// if given. Scalar coordinates relate to no dimension, so they are only
/// listed when `dims` is `None`.
pub fn get_metadata(array: &LabeledArray, dims: Option<&[&str]>, filter: MetadataFilter) -> Vec<SmolStr> {
    let wanted = |d: &str| dims.map_or(true, |dims| dims.contains(&d));
    let mut names = Vec::new();
    for (dim, levels) in array.indexes() {
        if !wanted(dim) { continue; }
        if array.is_multi_index(dim) {
            if filter.multi_indexes { names.push(dim.clone()); }
            if filter.levels { names.extend(levels.iter().cloned()); }
        } else if filter.indexes {
            names.push(dim.clone());
        }
    }
    if filter.coords {
        for (name, coord) in array.coords() {
            if array.is_index_level(name) { continue; }
            let related = match dims {
                None => true,
                Some(_) => coord.dims().iter().any(|d| wanted(d)),
            };
            if related { names.push(name.clone()); }
        }
    }
    names
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet};

    use ndarray::{arr2};

    use super::*;
    use crate::{values};

    fn updown(extra: Option<(&str, Coordinate)>) -> LabeledArray {
        let mut coords = vec![
            ("up", Coordinate::along("a", values(["alpha", "alpha", "beta", "beta", "beta", "beta"]))),
            ("down", Coordinate::along("a", values([1, 1, 1, 1, 2, 2]))),
            ("sideways", Coordinate::along("b", values(["x", "y", "z"]))),
        ];
        coords.extend(extra);
        LabeledArray::new(["a", "b"], arr2(&[
            [1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0],
            [10.0, 11.0, 12.0], [13.0, 14.0, 15.0], [16.0, 17.0, 18.0],
        ]).into_dyn(), coords).unwrap()
    }

    #[test]
    fn gathers_per_dimension() {
        let a = updown(None);
        assert!(a.indexes().is_empty());
        let g = gather_indexes(&a);
        assert_eq!(g.index_levels("a").unwrap(), ["up", "down"]);
        assert_eq!(g.index_levels("b").unwrap(), ["sideways"]);
        assert_eq!(get_levels(&g), ["up", "down", "sideways"]);
    }

    #[test]
    fn idempotent() {
        let once = gather_indexes(&updown(None));
        let twice = gather_indexes(&once);
        assert!(once.identical(&twice));
    }

    #[test]
    fn reset_then_gather_round_trips() {
        let g = gather_indexes(&updown(None));
        let flat = g.reset_index(&["a", "b"]).unwrap();
        assert!(get_levels(&flat).is_empty());
        let again = gather_indexes(&flat);
        assert!(again.identical(&g));
    }

    #[test]
    fn walks_levels_first() {
        let g = gather_indexes(&updown(Some(("c", Coordinate::scalar("remnant")))))
            .reset_index(&["up"]).unwrap();
        let names: Vec<&str> = walk_coords(&g).map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["down", "sideways", "up", "c"]);
        assert!(array_is_element(&["a"], "a"));
        assert!(!array_is_element(&["a", "b"], "a"));
        assert!(!array_is_element::<&str>(&[], "a"));
    }

    #[test]
    fn appends_after_existing_levels() {
        let a = updown(None).set_index("a", &["down"], false).unwrap();
        let g = gather_indexes(&a);
        assert_eq!(g.index_levels("a").unwrap(), ["down", "up"]);
    }

    #[test]
    fn leaves_other_coords_alone() {
        let scalar = gather_indexes(&updown(Some(("c", Coordinate::scalar("remnant")))));
        assert!(!scalar.is_index_level("c"));
        let empty = LabeledArray::new(["a"], ndarray::arr1(&[1.0]).into_dyn(), Vec::<(&str, Coordinate)>::new()).unwrap();
        assert!(gather_indexes(&empty).indexes().is_empty());
    }

    fn names(array: &LabeledArray, coords: bool, indexes: bool, multi_indexes: bool, levels: bool) -> BTreeSet<SmolStr> {
        get_metadata(array, None, MetadataFilter {coords, indexes, multi_indexes, levels}).into_iter().collect()
    }

    fn set(items: &[&str]) -> BTreeSet<SmolStr> { items.iter().map(|s| SmolStr::new(s)).collect() }

    #[test]
    fn metadata_kinds() {
        let a = updown(Some(("why", Coordinate::along("a", values(["yes", "yes", "yes", "yes", "yes", "no"])))))
            .with_coord("b", Coordinate::along("b", values(["x", "y", "z"]))).unwrap()
            .drop_coord("sideways").unwrap();
        let a = gather_indexes(&a.set_index("b", &["b"], false).unwrap()).reset_index(&["why"]).unwrap();
        assert_eq!(names(&a, true, true, true, true), set(&["a", "up", "down", "why", "b"]));
        assert_eq!(names(&a, true, true, true, false), set(&["a", "why", "b"]));
        assert_eq!(names(&a, true, true, false, true), set(&["up", "down", "why", "b"]));
        assert_eq!(names(&a, true, true, false, false), set(&["why", "b"]));
        assert_eq!(names(&a, true, false, true, true), set(&["a", "up", "down", "why"]));
        assert_eq!(names(&a, false, true, true, true), set(&["a", "up", "down", "b"]));
        assert_eq!(names(&a, false, false, false, true), set(&["up", "down"]));
        assert_eq!(names(&a, false, false, false, false), set(&[]));
        let only_b = get_metadata(&a, Some(&["b"][..]), MetadataFilter::default());
        assert_eq!(only_b, ["b"]);
    }
}
