//! A pure-Rust library for labelled, multi-dimensional assemblies of
//! experimental data, with composite indexes built from several coordinates.
//!
//! [`LabeledArray`] is an N-dimensional array of `f64` with named dimensions.
//! Metadata is attached as [`Coordinate`]s, each of which varies along zero,
//! one or several dimensions. Each dimension may have an index, which is an
//! ordered list of coordinates that vary along it (its "levels"). Positions
//! along an indexed dimension are labelled by the joint values of its levels,
//! which makes it possible to select and group by several coordinates at
//! once.
//!
//! [`Assembly`] wraps a `LabeledArray` with an [`AssemblyKind`] and keeps it
//! "gathered": every coordinate that varies along exactly one dimension is a
//! level of that dimension's index. Flat storage formats cannot hold indexes,
//! so [`gather_indexes()`] rebuilds them whenever an `Assembly` is
//! constructed. The multi-coordinate operations are methods of `Assembly`:
//! - [`Assembly::multi_groupby()`] groups by several coordinates of one
//! dimension, using [`MultiCoordKey`]s as synthetic group keys.
//! - [`Assembly::multi_dim_apply()`] maps a function over the cells defined
//! by groups on several dimensions.
//! - [`Assembly::multisel()`] selects by several coordinates, keeping the
//! index structure that a plain [`LabeledArray::sel()`] loses.
//!
//! Every operation returns a new value. Nothing is modified in place.

mod error;
pub use error::{AssemblyError, Result};

mod value;
pub use value::{Value, values};

mod key;
pub use key::{MultiCoordKey, zip_keys, unzip_keys};

mod coord;
pub use coord::{Coordinate};

pub mod ops;
pub use ops::{Reducer, Mean, Sum, Min, Max};

mod array;
pub use array::{LabeledArray, ReduceOver};

mod select;
pub use select::{Selector};

mod groupby;
pub use groupby::{GroupBy};

mod gather;
pub use gather::{
    coords_for_dim, gather_indexes, walk_coords, array_is_element, get_levels, get_metadata, MetadataFilter,
};

pub mod consts;

mod assembly;
pub use assembly::{Assembly, AssemblyKind};

mod bridge;
pub use bridge::{GroupbyBridge};

mod apply;
pub use apply::{Cell};

mod multisel;

mod merge;

mod record;
pub use record::{AssemblyRecord, CoordRecord};
