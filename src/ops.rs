//! Generic programming over reductions.
//!
//! Each type in this module cannot be instantiated and implements
//! [`Reducer`]. It can be passed as a type parameter to generic code, e.g.
//! [`LabeledArray::reduce()`] or [`GroupBy::reduce()`].
//!
//! [`LabeledArray::reduce()`]: super::LabeledArray::reduce()
//! [`GroupBy::reduce()`]: super::GroupBy::reduce()

use ndarray::{ArrayView1};

/// A function that combines a lane of `f64`s into one.
///
/// This trait has no methods that take `self`. It makes sense to implement it
/// for types that cannot be instantiated, such as empty enumerations.
pub trait Reducer {
    fn reduce(lane: ArrayView1<f64>) -> f64;
}

// ----------------------------------------------------------------------------

/// The arithmetic mean. An empty lane gives `NaN`.
pub enum Mean {}

impl Reducer for Mean {
    fn reduce(lane: ArrayView1<f64>) -> f64 { lane.mean().unwrap_or(f64::NAN) }
}

// ----------------------------------------------------------------------------

pub enum Sum {}

impl Reducer for Sum {
    #[inline(always)]
    fn reduce(lane: ArrayView1<f64>) -> f64 { lane.sum() }
}

// ----------------------------------------------------------------------------

pub enum Min {}

impl Reducer for Min {
    fn reduce(lane: ArrayView1<f64>) -> f64 { lane.fold(f64::INFINITY, |a, &b| a.min(b)) }
}

// ----------------------------------------------------------------------------

pub enum Max {}

impl Reducer for Max {
    fn reduce(lane: ArrayView1<f64>) -> f64 { lane.fold(f64::NEG_INFINITY, |a, &b| a.max(b)) }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ndarray::{arr1};

    use super::*;

    #[test]
    fn reducers() {
        let a = arr1(&[1.0, 4.0, -2.0]);
        assert_eq!(Mean::reduce(a.view()), 1.0);
        assert_eq!(Sum::reduce(a.view()), 3.0);
        assert_eq!(Min::reduce(a.view()), -2.0);
        assert_eq!(Max::reduce(a.view()), 4.0);
        assert!(Mean::reduce(arr1::<f64>(&[]).view()).is_nan());
    }
}
