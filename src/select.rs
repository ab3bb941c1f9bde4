use std::slice;

use super::{AssemblyError, Result, LabeledArray, Value};

/// What to select from a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Every position holding this value. The selection may drop structure;
    /// see [`LabeledArray::sel()`].
    One(Value),
    /// Every position holding any of these values, in list order.
    Many(Vec<Value>),
}

impl Selector {
    pub fn one(value: impl Into<Value>) -> Self { Selector::One(value.into()) }

    pub fn many<V: Into<Value>>(values: impl IntoIterator<Item=V>) -> Self {
        Selector::Many(values.into_iter().map(Into::into).collect())
    }

    /// The requested values.
    pub fn values(&self) -> &[Value] {
        match self {
            Selector::One(v) => slice::from_ref(v),
            Selector::Many(vs) => vs,
        }
    }

    /// The single requested value, if this is [`Selector::One`].
    pub fn value(&self) -> Option<&Value> {
        match self {
            Selector::One(v) => Some(v),
            Selector::Many(_) => None,
        }
    }
}

impl LabeledArray {
    /// Selects by the labels of `name`, a coordinate or a dimension.
    ///
    /// Every requested value must occur, else [`AssemblyError::KeyNotFound`].
    /// Selecting [`Selector::Many`] keeps all structure. Selecting
    /// [`Selector::One`] loses some:
    /// - If `name` is one level of a multi-level index, that level and its
    ///   coordinate are dropped.
    /// - Otherwise, if exactly one position matches, the dimension is
    ///   squeezed away and the coordinates along it become scalars.
    ///
    /// Selecting from a scalar coordinate only checks that it matches.
    ///
    /// ```
    /// use ndarray::{arr1};
    /// use assemblies::{LabeledArray, Coordinate, Selector, values};
    /// let a = LabeledArray::new(["a"], arr1(&[1.0, 2.0, 3.0]).into_dyn(), [
    ///     ("a", Coordinate::along("a", values(["x", "y", "z"]))),
    /// ]).unwrap();
    /// let two = a.sel("a", &Selector::many(["z", "x"])).unwrap();
    /// assert_eq!(two.data().as_slice().unwrap(), [3.0, 1.0]);
    /// let one = a.sel("a", &Selector::one("y")).unwrap();
    /// assert!(one.dims().is_empty());
    /// assert!(one.coord("a").unwrap().is_scalar());
    /// ```
    pub fn sel(&self, name: &str, selector: &Selector) -> Result<Self> {
        let not_found = |value: &Value| AssemblyError::KeyNotFound {coord: name.into(), value: value.clone()};
        if let Some(scalar) = self.coords().get(name).and_then(|c| c.scalar_value()) {
            return match selector.values().iter().find(|v| *v != scalar) {
                Some(missing) => Err(not_found(missing)),
                None => Ok(self.clone()),
            };
        }
        let dim = self.dim_of(name)?;
        let labels = self.labels(name)?;
        let mut positions = Vec::new();
        for wanted in selector.values() {
            let mut found = false;
            for (i, label) in labels.iter().enumerate() {
                if label != wanted { continue; }
                found = true;
                if !positions.contains(&i) { positions.push(i); }
            }
            if !found { return Err(not_found(wanted)); }
        }
        let selected = self.isel(&dim, &positions)?;
        if let Selector::Many(_) = selector { return Ok(selected); }
        let levels = self.index_levels(&dim).unwrap_or(&[]);
        if levels.len() > 1 && levels.iter().any(|l| l == name) {
            selected.drop_coord(name)
        } else if positions.len() == 1 {
            selected.squeeze(&dim)
        } else {
            Ok(selected)
        }
    }
}

// ----------------------------------------------------------------------------
