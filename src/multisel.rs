use smol_str::{SmolStr};

use super::{AssemblyError, Result, Assembly, Coordinate, Selector, walk_coords, array_is_element};

impl Assembly {
    /// Selects by several coordinates of one dimension, keeping the
    /// structure that [`sel()`](Self::sel()) loses.
    ///
    /// The selections are applied in order. Afterwards the dimension is
    /// restored with length 1 if it was squeezed away, every indexer that is
    /// no longer a coordinate along it is put back with its selected value,
    /// and the dimension's index levels are restored. This takes several
    /// passes over the data; prefer `sel()` when the structure is not
    /// needed.
    ///
    /// All indexers must vary along the same single dimension, else
    /// [`AssemblyError::GroupingDimensionMismatch`].
    ///
    /// ```
    /// use ndarray::{arr2};
    /// use assemblies::{Assembly, AssemblyKind, LabeledArray, Coordinate, Selector, values};
    /// let a = Assembly::new(AssemblyKind::Data, LabeledArray::new(["a", "b"], arr2(&[
    ///     [1.0, 2.0], [3.0, 4.0], [5.0, 6.0],
    /// ]).into_dyn(), [
    ///     ("up", Coordinate::along("a", values(["x", "x", "y"]))),
    ///     ("down", Coordinate::along("a", values([1, 2, 1]))),
    /// ]).unwrap());
    /// let s = a.multisel(&[("up", Selector::one("x"))]).unwrap();
    /// assert_eq!(s.shape(), [2, 2]);
    /// assert_eq!(s.coord("up").unwrap().to_vec(), values(["x", "x"]));
    /// assert_eq!(s.index_levels("a").unwrap(), ["up", "down"]);
    /// ```
    pub fn multisel<N: AsRef<str>>(&self, indexers: &[(N, Selector)]) -> Result<Assembly> {
        let names: Vec<SmolStr> = indexers.iter().map(|(n, _)| SmolStr::new(n.as_ref())).collect();
        let mut dims: Vec<SmolStr> = Vec::new();
        for name in &names {
            let dim = self.dim_of(name)?;
            if !dims.contains(&dim) { dims.push(dim); }
        }
        if dims.len() > 1 { return Err(AssemblyError::GroupingDimensionMismatch {coords: names, dims}); }
        let Some(dim) = dims.pop() else { return Ok(self.clone()) };
        let co_coords: Vec<SmolStr> = walk_coords(self)
            .filter(|(_, c)| array_is_element(c.dims(), &dim))
            .map(|(n, _)| n.clone())
            .collect();
        let levels: Vec<SmolStr> = self.index_levels(&dim).map(<[_]>::to_vec).unwrap_or_default();

        let mut result = self.array().clone();
        for (name, selector) in indexers { result = result.sel(name.as_ref(), selector)?; }

        if !result.has_dim(&dim) {
            result = result.expand_dims(dim.clone())?;
            for name in &co_coords {
                let Some(value) = result.coords().get(name).and_then(|c| c.scalar_value()).cloned() else { continue };
                result = result.with_coord(name.clone(), Coordinate::along(dim.clone(), vec![value]))?;
            }
        }
        let len = result.dim_len(&dim)?;
        for ((name, selector), n) in indexers.iter().zip(&names) {
            if result.coord(n).map_or(false, |c| c.only_along(&dim)) { continue; }
            // A dimension selected by its index labels comes back through its levels.
            if !self.has_coord(n) { continue; }
            let value = selector.value().ok_or_else(|| AssemblyError::structural(format!(
                "`{}` was lost by selecting several values", name.as_ref(),
            )))?;
            result = result.with_coord(n.clone(), Coordinate::along(dim.clone(), vec![value.clone(); len]))?;
        }
        let levels: Vec<&SmolStr> = levels.iter().filter(|l| result.coord(l).map_or(false, |c| c.only_along(&dim))).collect();
        if !levels.is_empty() { result = result.set_index(&dim, &levels, false)?; }
        let order: Vec<&SmolStr> = self.dims().iter().filter(|d| result.has_dim(d)).collect();
        let result = result.transpose(&order)?;
        tracing::debug!("multisel on `{}` kept {} positions", dim, len);
        Ok(self.derive_gathered(result))
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ndarray::{arr2};

    use super::*;
    use crate::{AssemblyKind, LabeledArray, MultiCoordKey, Value, values};

    fn updown() -> Assembly {
        Assembly::new(AssemblyKind::Neuroid, LabeledArray::new(["a", "b"], arr2(&[
            [1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0],
            [10.0, 11.0, 12.0], [13.0, 14.0, 15.0], [16.0, 17.0, 18.0],
        ]).into_dyn(), [
            ("up", Coordinate::along("a", values(["alpha", "alpha", "beta", "beta", "beta", "beta"]))),
            ("down", Coordinate::along("a", values([1, 1, 1, 1, 2, 2]))),
            ("sideways", Coordinate::along("b", values(["x", "y", "z"]))),
            ("c", Coordinate::scalar("remnant")),
        ]).unwrap())
    }

    #[test]
    fn keeps_selected_level() {
        let s = updown().multisel(&[("up", Selector::one("beta"))]).unwrap();
        assert_eq!(s.shape(), [4, 3]);
        assert_eq!(s.coord("up").unwrap().to_vec(), values(["beta"; 4]));
        assert_eq!(s.index_levels("a").unwrap(), ["up", "down"]);
        assert_eq!(s.kind(), AssemblyKind::Neuroid);
    }

    #[test]
    fn collapsed_dimension_comes_back() {
        let s = updown().multisel(&[("sideways", Selector::one("y"))]).unwrap();
        assert_eq!(s.dims(), ["a", "b"]);
        assert_eq!(s.shape(), [6, 1]);
        assert_eq!(s.coord("sideways").unwrap().to_vec(), values(["y"]));
        assert_eq!(s.index_levels("b").unwrap(), ["sideways"]);
        assert_eq!(s.data().as_slice().unwrap(), [2.0, 5.0, 8.0, 11.0, 14.0, 17.0]);
    }

    #[test]
    fn all_co_coords_restack() {
        let s = updown().multisel(&[("up", Selector::one("beta")), ("down", Selector::one(2))]).unwrap();
        assert_eq!(s.shape(), [2, 3]);
        assert_eq!(s.index_levels("a").unwrap(), ["up", "down"]);
        let neuroids = Assembly::new(AssemblyKind::Neuroid, LabeledArray::new(["neuroid"], ndarray::arr1(&[1.0, 2.0, 3.0]).into_dyn(), [
            ("region", Coordinate::along("neuroid", values(["IT", "V4", "IT"]))),
            ("animal", Coordinate::along("neuroid", values(["m", "m", "c"]))),
        ]).unwrap());
        let one = neuroids.multisel(&[("region", Selector::one("IT")), ("animal", Selector::one("c"))]).unwrap();
        assert_eq!(one.dims(), ["neuroid"]);
        assert_eq!(one.data().as_slice().unwrap(), [3.0]);
        assert_eq!(one.coord("region").unwrap().to_vec(), values(["IT"]));
        assert_eq!(one.coord("animal").unwrap().to_vec(), values(["c"]));
        assert_eq!(one.index_levels("neuroid").unwrap(), ["region", "animal"]);
    }

    #[test]
    fn several_values() {
        let s = updown().multisel(&[("down", Selector::many([2, 1]))]).unwrap();
        assert_eq!(s.shape(), [6, 3]);
        assert_eq!(s.coord("down").unwrap().to_vec()[0], Value::from(2));
        assert_eq!(s.coord("c").unwrap().scalar_value(), Some(&Value::from("remnant")));
    }

    #[test]
    fn by_dimension_labels() {
        let a = updown();
        let key = Value::Key(MultiCoordKey::new(vec![Value::from("beta"), Value::from(2)]));
        let s = a.multisel(&[("a", Selector::one(key))]).unwrap();
        assert_eq!(s.shape(), [2, 3]);
        assert!(!s.has_coord("a"));
        assert_eq!(s.index_levels("a").unwrap(), ["up", "down"]);
        assert_eq!(s.coord("down").unwrap().to_vec(), values([2, 2]));
        assert!(serde_json::to_string(&s.to_record()).is_ok());

        let key = Value::Key(MultiCoordKey::new(vec![Value::from("alpha"), Value::from(1)]));
        let first = a.isel("a", &[0, 2, 4]).unwrap();
        let one = first.multisel(&[("a", Selector::one(key))]).unwrap();
        assert_eq!(one.shape(), [1, 3]);
        assert!(!one.has_coord("a"));
        assert_eq!(one.index_levels("a").unwrap(), ["up", "down"]);
        assert_eq!(one.coord("up").unwrap().to_vec(), values(["alpha"]));
        assert!(serde_json::to_string(&one.to_record()).is_ok());
    }

    #[test]
    fn cross_dimension_is_rejected() {
        let a = updown();
        let before = a.clone();
        let err = a.multisel(&[("up", Selector::one("beta")), ("sideways", Selector::one("x"))]).unwrap_err();
        assert!(matches!(err, AssemblyError::GroupingDimensionMismatch {..}));
        assert!(a.identical(&before));
        assert!(matches!(
            a.multisel(&[("c", Selector::one("remnant"))]),
            Err(AssemblyError::StructuralAssumption(_)),
        ));
        assert!(matches!(
            a.multisel(&[("up", Selector::one("gamma"))]),
            Err(AssemblyError::KeyNotFound {..}),
        ));
    }
}
