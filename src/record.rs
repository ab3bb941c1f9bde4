//! A flat, serialisable form of an [`Assembly`].
//!
//! The record holds no index structure: every coordinate is stored as a
//! plain named array, and indexes are gathered again on load.

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr};

use super::{Result, Assembly, AssemblyKind, LabeledArray, Coordinate, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyRecord {
    pub kind: AssemblyKind,
    pub dims: Vec<SmolStr>,
    pub shape: Vec<usize>,
    /// The data in row-major order.
    pub data: Vec<f64>,
    pub coords: Vec<CoordRecord>,
    #[serde(default)]
    pub attrs: Vec<(SmolStr, String)>,
}

/// One coordinate of an [`AssemblyRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordRecord {
    pub name: SmolStr,
    pub dims: Vec<SmolStr>,
    pub shape: Vec<usize>,
    pub values: Vec<Value>,
}

impl Assembly {
    /// Decomposes `self` into flat coordinates.
    ///
    /// Composite group keys cannot be serialised; a record holding one
    /// fails to serialise.
    pub fn to_record(&self) -> AssemblyRecord {
        let coords = self.coords().iter().map(|(name, coord)| CoordRecord {
            name: name.clone(),
            dims: coord.dims().to_vec(),
            shape: coord.values().shape().to_vec(),
            values: coord.to_vec(),
        }).collect();
        AssemblyRecord {
            kind: self.kind(),
            dims: self.dims().to_vec(),
            shape: self.shape().to_vec(),
            data: self.data().iter().copied().collect(),
            coords,
            attrs: self.attrs().iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Rebuilds an `Assembly` from `record`, gathering its indexes.
    ///
    /// ```
    /// use ndarray::{arr1};
    /// use assemblies::{Assembly, AssemblyKind, LabeledArray, Coordinate, values};
    /// let a = Assembly::new(AssemblyKind::Metadata, LabeledArray::new(["a"], arr1(&[1.0, 2.0]).into_dyn(), [
    ///     ("up", Coordinate::along("a", values(["x", "y"]))),
    /// ]).unwrap());
    /// let record = a.to_record();
    /// assert!(record.coords.iter().all(|c| c.dims == ["a"]));
    /// let b = Assembly::from_record(record).unwrap();
    /// assert!(b.identical(&a));
    /// ```
    pub fn from_record(record: AssemblyRecord) -> Result<Self> {
        let data = ArrayD::from_shape_vec(IxDyn(&record.shape), record.data)?;
        let coords = record.coords.into_iter().map(|c| -> Result<(SmolStr, Coordinate)> {
            let values = ArrayD::from_shape_vec(IxDyn(&c.shape), c.values)?;
            Ok((c.name, Coordinate::new(c.dims, values)?))
        }).collect::<Result<Vec<_>>>()?;
        let array = LabeledArray::new(record.dims, data, coords)?;
        let mut assembly = Assembly::new(record.kind, array);
        for (key, value) in record.attrs { assembly = assembly.with_attr(key, value); }
        Ok(assembly)
    }
}

// ----------------------------------------------------------------------------
