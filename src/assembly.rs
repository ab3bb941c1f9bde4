use std::fmt::{self, Display};
use std::ops::{Deref};

use indexmap::{IndexMap};
use ndarray::{ArrayView1};
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr};

use super::{AssemblyError, Result, LabeledArray, ReduceOver, Coordinate, Selector, Reducer, Mean, Sum, gather_indexes};

/// The kind of data an [`Assembly`] holds.
///
/// Every operation on an `Assembly` returns an `Assembly` of the same kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssemblyKind {
    /// Data for an analysis or benchmarking task, with no further claim.
    Data,
    Behavioral,
    /// Responses of neurons or neuron analogues.
    Neuroid,
    /// Responses recorded from neurons.
    NeuronRecording,
    /// Activations captured from nodes of a machine learning model.
    ModelFeatures,
    /// Single-neuron properties.
    Property,
    Metadata,
    SpikeTimes,
}

impl AssemblyKind {
    pub fn name(self) -> &'static str {
        match self {
            AssemblyKind::Data => "DataAssembly",
            AssemblyKind::Behavioral => "BehavioralAssembly",
            AssemblyKind::Neuroid => "NeuroidAssembly",
            AssemblyKind::NeuronRecording => "NeuronRecordingAssembly",
            AssemblyKind::ModelFeatures => "ModelFeaturesAssembly",
            AssemblyKind::Property => "PropertyAssembly",
            AssemblyKind::Metadata => "MetadataAssembly",
            AssemblyKind::SpikeTimes => "SpikeTimesAssembly",
        }
    }

    /// Whether this kind holds neuroid responses, recorded or modelled.
    pub fn is_neuroid(self) -> bool {
        matches!(self, AssemblyKind::Neuroid | AssemblyKind::NeuronRecording | AssemblyKind::ModelFeatures)
    }
}

impl Display for AssemblyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

// ----------------------------------------------------------------------------

/// A [`LabeledArray`] of some [`AssemblyKind`], in which every coordinate
/// that varies along exactly one dimension is a level of that dimension's
/// index.
///
/// `Assembly` dereferences to its `LabeledArray`, so every read-only method
/// is available directly. Methods that produce a new array are mirrored
/// here so that they return an `Assembly` of the same kind.
///
/// ```
/// use ndarray::{arr2};
/// use assemblies::{Assembly, AssemblyKind, LabeledArray, Coordinate, values};
/// let a = Assembly::new(AssemblyKind::Neuroid, LabeledArray::new(
///     ["presentation", "neuroid"],
///     arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn(),
///     [
///         ("image_id", Coordinate::along("presentation", values(["n0", "n1"]))),
///         ("region", Coordinate::along("neuroid", values(["IT", "V4"]))),
///     ],
/// ).unwrap());
/// assert_eq!(a.index_levels("presentation").unwrap(), ["image_id"]);
/// let t = a.transpose(&["neuroid", "presentation"]).unwrap();
/// assert_eq!(t.kind(), AssemblyKind::Neuroid);
/// ```
#[derive(Debug, Clone)]
pub struct Assembly {
    kind: AssemblyKind,
    array: LabeledArray,
    attrs: IndexMap<SmolStr, String>,
}

impl Assembly {
    /// Wraps `array`, gathering its flat coordinates into indexes.
    pub fn new(kind: AssemblyKind, array: LabeledArray) -> Self {
        Self::from_raw(kind, gather_indexes(&array))
    }

    /// Wraps `array` as it is, without gathering. Use this only for arrays
    /// that already come from an `Assembly`.
    pub fn from_raw(kind: AssemblyKind, array: LabeledArray) -> Self {
        Self {kind, array, attrs: IndexMap::new()}
    }

    pub fn kind(&self) -> AssemblyKind { self.kind }

    pub fn array(&self) -> &LabeledArray { &self.array }

    pub fn into_array(self) -> LabeledArray { self.array }

    /// Free-form annotations, such as the identifier of a stimulus set.
    pub fn attrs(&self) -> &IndexMap<SmolStr, String> { &self.attrs }

    pub fn with_attr(mut self, key: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Merges `assemblies` by an outer join of their labels; see
    /// [`LabeledArray::merge()`]. The result has the kind and attributes of
    /// the first.
    pub fn merge(assemblies: &[Assembly]) -> Result<Self> {
        let first = assemblies.first().ok_or_else(|| AssemblyError::structural("nothing to merge"))?;
        let arrays: Vec<&LabeledArray> = assemblies.iter().map(Assembly::array).collect();
        Ok(first.derive_gathered(LabeledArray::merge(&arrays)?))
    }

    /// An `Assembly` like `self` holding `array`, which is not gathered.
    pub(crate) fn derive(&self, array: LabeledArray) -> Self {
        Self {kind: self.kind, array, attrs: self.attrs.clone()}
    }

    /// An `Assembly` like `self` holding `array`, which is gathered.
    pub(crate) fn derive_gathered(&self, array: LabeledArray) -> Self {
        self.derive(gather_indexes(&array))
    }

    // ------------------------------------------------------------------------

    pub fn sel(&self, name: &str, selector: &Selector) -> Result<Self> { Ok(self.derive(self.array.sel(name, selector)?)) }

    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self> { Ok(self.derive(self.array.isel(dim, positions)?)) }

    pub fn with_coord(&self, name: impl Into<SmolStr>, coord: Coordinate) -> Result<Self> {
        Ok(self.derive(self.array.with_coord(name, coord)?))
    }

    pub fn drop_coord(&self, name: &str) -> Result<Self> { Ok(self.derive(self.array.drop_coord(name)?)) }

    pub fn set_index<N: AsRef<str>>(&self, dim: &str, levels: &[N], append: bool) -> Result<Self> {
        Ok(self.derive(self.array.set_index(dim, levels, append)?))
    }

    pub fn reset_index<N: AsRef<str>>(&self, names: &[N]) -> Result<Self> { Ok(self.derive(self.array.reset_index(names)?)) }

    pub fn squeeze(&self, dim: &str) -> Result<Self> { Ok(self.derive(self.array.squeeze(dim)?)) }

    pub fn expand_dims(&self, dim: impl Into<SmolStr>) -> Result<Self> { Ok(self.derive(self.array.expand_dims(dim)?)) }

    pub fn stack<N: AsRef<str>>(&self, new_dim: impl Into<SmolStr>, stacked: &[N]) -> Result<Self> {
        Ok(self.derive(self.array.stack(new_dim, stacked)?))
    }

    pub fn rename_dim(&self, old: &str, new: impl Into<SmolStr>) -> Result<Self> { Ok(self.derive(self.array.rename_dim(old, new)?)) }

    pub fn transpose<N: AsRef<str>>(&self, order: &[N]) -> Result<Self> { Ok(self.derive(self.array.transpose(order)?)) }

    pub fn reduce_with(&self, over: &ReduceOver, f: impl Fn(ArrayView1<f64>) -> f64) -> Result<Self> {
        Ok(self.derive(self.array.reduce_with(over, f)?))
    }

    pub fn reduce<R: Reducer>(&self, over: &ReduceOver) -> Result<Self> { self.reduce_with(over, R::reduce) }

    pub fn mean(&self, over: &ReduceOver) -> Result<Self> { self.reduce::<Mean>(over) }

    pub fn sum(&self, over: &ReduceOver) -> Result<Self> { self.reduce::<Sum>(over) }
}

impl Deref for Assembly {
    type Target = LabeledArray;
    fn deref(&self) -> &Self::Target { &self.array }
}

impl Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        write!(f, "{}", self.array)?;
        for (key, value) in &self.attrs {
            writeln!(f, "  @{}: {}", key, value)?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ndarray::{arr2};

    use super::*;
    use crate::{values, Value};

    fn neuroids() -> LabeledArray {
        LabeledArray::new(["presentation", "neuroid"], arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn(), [
            ("image_id", Coordinate::along("presentation", values(["n0", "n1"]))),
            ("repetition", Coordinate::along("presentation", values([0, 0]))),
            ("neuroid_id", Coordinate::along("neuroid", values(["a", "b", "c"]))),
            ("region", Coordinate::along("neuroid", values(["IT", "IT", "V4"]))),
            ("session", Coordinate::scalar("s1")),
        ]).unwrap()
    }

    #[test]
    fn new_gathers() {
        let a = Assembly::new(AssemblyKind::NeuronRecording, neuroids());
        assert_eq!(a.index_levels("presentation").unwrap(), ["image_id", "repetition"]);
        assert_eq!(a.index_levels("neuroid").unwrap(), ["neuroid_id", "region"]);
        assert!(!a.is_index_level("session"));
        assert!(a.kind().is_neuroid());
    }

    #[test]
    fn from_raw_does_not_gather() {
        let a = Assembly::from_raw(AssemblyKind::Data, neuroids());
        assert!(a.indexes().is_empty());
    }

    #[test]
    fn operations_keep_kind_and_attrs() {
        let a = Assembly::new(AssemblyKind::Behavioral, neuroids()).with_attr("stimulus_set_identifier", "dicarlo.hvm");
        let m = a.mean(&ReduceOver::dim("presentation")).unwrap();
        assert_eq!(m.kind(), AssemblyKind::Behavioral);
        assert_eq!(m.attrs()["stimulus_set_identifier"], "dicarlo.hvm");
        assert_eq!(m.data().as_slice().unwrap(), [2.5, 3.5, 4.5]);
        let s = a.sel("region", &Selector::one("IT")).unwrap();
        assert_eq!(s.kind(), AssemblyKind::Behavioral);
        assert_eq!(s.shape(), [2, 2]);
        assert_eq!(s.coord("session").unwrap().scalar_value(), Some(&Value::from("s1")));
    }

    #[test]
    fn merge_keeps_first_kind() {
        let a = Assembly::new(AssemblyKind::Behavioral, neuroids()).with_attr("stimulus_set_identifier", "dicarlo.hvm");
        let b = Assembly::new(AssemblyKind::Data, LabeledArray::new(["presentation", "neuroid"], arr2(&[[7.0, 8.0]]).into_dyn(), [
            ("image_id", Coordinate::along("presentation", values(["n2"]))),
            ("repetition", Coordinate::along("presentation", values([0]))),
            ("neuroid_id", Coordinate::along("neuroid", values(["a", "b"]))),
            ("region", Coordinate::along("neuroid", values(["IT", "IT"]))),
            ("session", Coordinate::scalar("s1")),
        ]).unwrap());
        let m = Assembly::merge(&[a.clone(), b]).unwrap();
        assert_eq!(m.kind(), AssemblyKind::Behavioral);
        assert_eq!(m.attrs()["stimulus_set_identifier"], "dicarlo.hvm");
        assert_eq!(m.shape(), [3, 3]);
        assert_eq!(m.coord("image_id").unwrap().to_vec(), values(["n0", "n1", "n2"]));
        assert_eq!(m.coord("region").unwrap().to_vec(), values(["IT", "IT", "V4"]));
        assert_eq!(m.index_levels("presentation").unwrap(), ["image_id", "repetition"]);
        let row: Vec<f64> = m.data().iter().skip(6).copied().collect();
        assert_eq!(row[..2], [7.0, 8.0]);
        assert!(row[2].is_nan());
        assert!(m.clone().into_array().identical(m.array()));
        assert!(Assembly::merge(&[]).is_err());
    }

    #[test]
    fn display_names_kind() {
        let a = Assembly::new(AssemblyKind::Property, neuroids()).with_attr("identifier", "x");
        let shown = a.to_string();
        assert!(shown.starts_with("PropertyAssembly\n<LabeledArray (presentation: 2, neuroid: 3)>"));
        assert!(shown.contains("@identifier: x"));
    }
}
