use std::cmp::{Ordering};
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smol_str::{SmolStr};

use super::{MultiCoordKey};

/// One element of a coordinate.
///
/// `Value`s of different variants never compare equal, but they are totally
/// ordered so that they can be sorted and used as group keys: booleans come
/// first, then numbers (integers and floats compared numerically, an integer
/// before an equal float), then strings, then composite keys. Floats compare
/// by [`f64::total_cmp()`] after folding `-0.0` into `0.0` and every `NaN`
/// into one, so `NaN` equals itself and the two zeros are one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(SmolStr),
    /// A synthetic composite key. These exist only while a multi-coordinate
    /// operation is running, and cannot be serialized.
    #[serde(skip)]
    Key(MultiCoordKey),
}

impl Value {
    /// The representative of `x` used for ordering and hashing.
    fn canonical(x: f64) -> f64 {
        if x == 0.0 { 0.0 } else if x.is_nan() { f64::NAN } else { x }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Str(_) => 2,
            Value::Key(_) => 3,
        }
    }

    /// Returns the numeric value, if `self` is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&MultiCoordKey> {
        match self {
            Value::Key(k) => Some(k),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => Value::canonical(*a).total_cmp(&Value::canonical(*b)),
            (Int(a), Float(b)) => (*a as f64).total_cmp(&Value::canonical(*b)).then(Ordering::Less),
            (Float(a), Int(b)) => Value::canonical(*a).total_cmp(&(*b as f64)).then(Ordering::Greater),
            (Str(a), Str(b)) => a.cmp(b),
            (Key(a), Key(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => Value::canonical(*f).to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Key(k) => k.hash(state),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Key(k) => write!(f, "{}", k),
        }
    }
}

// ----------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Int(i.into()) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self { Value::Int(i as i64) }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(s.into()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(s.into()) }
}

impl From<SmolStr> for Value {
    fn from(s: SmolStr) -> Self { Value::Str(s) }
}

impl From<MultiCoordKey> for Value {
    fn from(k: MultiCoordKey) -> Self { Value::Key(k) }
}

/// Converts a list of anything that converts into [`Value`].
///
/// ```
/// use assemblies::{values, Value};
/// assert_eq!(values(["x", "y"]), vec![Value::from("x"), Value::from("y")]);
/// ```
pub fn values<V: Into<Value>>(items: impl IntoIterator<Item=V>) -> Vec<Value> {
    items.into_iter().map(Into::into).collect()
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::{HashSet};

    use super::*;

    #[test]
    fn mixed_order() {
        let mut v = values([3.5, 1.0]);
        v.extend(values([2, 1]));
        v.push("a".into());
        v.push(true.into());
        v.sort();
        assert_eq!(v, vec![
            Value::Bool(true), Value::Int(1), Value::Float(1.0),
            Value::Int(2), Value::Float(3.5), Value::from("a"),
        ]);
    }

    #[test]
    fn int_is_not_float() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        let set: HashSet<Value> = values([1.0, 1.0, f64::NAN, f64::NAN]).into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn signed_zeros_are_one_value() {
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
        assert!(Value::Float(-0.0) > Value::Int(0));
        assert!(Value::Float(-0.0) < Value::Float(f64::MIN_POSITIVE));
        let set: HashSet<Value> = values([0.0, -0.0, -f64::NAN, f64::NAN]).into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
