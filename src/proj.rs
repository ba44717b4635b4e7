//! Projection Oracles onto Convex Feasible Sets
//!
//! The solver only ever touches the feasible set through a [`Projection`],
//! a map $`P_C`$ sending any point to a point of $`C`$. Any closure
//! `Fn(ArrayView1<S>) -> Array1<S>` is a projection; a few common
//! sets are provided as ready-made types.
//!
//! Projections are assumed idempotent, $`P_C(P_C(x)) = P_C(x)`$, but this
//! is not verified.

use crate::error::SpgError;
use ndarray::prelude::*;
use ndarray::{NdFloat, Zip};
use ndarray_linalg::{Lapack, Norm, Scalar};
use num_traits::Float;

/// Map from an arbitrary point onto a convex feasible set
pub trait Projection<S> {
    fn project(&self, x: ArrayView1<S>) -> Array1<S>;
}

impl<S, F> Projection<S> for F
where
    F: Fn(ArrayView1<S>) -> Array1<S>,
{
    #[inline]
    fn project(&self, x: ArrayView1<S>) -> Array1<S> {
        self(x)
    }
}

/// The whole space, for unconstrained problems
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl<S: Clone> Projection<S> for Identity {
    #[inline]
    fn project(&self, x: ArrayView1<S>) -> Array1<S> {
        x.to_owned()
    }
}

/// The non-negative orthant $`\{x : x \geq 0\}`$
#[derive(Debug, Default, Clone, Copy)]
pub struct NonNegative;

impl<S: NdFloat> Projection<S> for NonNegative {
    fn project(&self, x: ArrayView1<S>) -> Array1<S> {
        x.mapv(|v| Float::max(v, S::zero()))
    }
}

/// Euclidean ball $`\{x : \|x - c\|_2 \leq r\}`$
///
/// Points outside are pulled radially onto the sphere.
#[derive(Debug, Clone)]
pub struct Ball<S> {
    center: Array1<S>,
    radius: S,
}

impl<S> Ball<S>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    pub fn new(center: Array1<S>, radius: S) -> Result<Self, SpgError> {
        if !(Float::is_finite(radius) && radius >= S::zero()) {
            return Err(SpgError::InvalidBounds("radius must be finite and non-negative"));
        }
        Ok(Ball { center, radius })
    }

    /// Unit ball centered at the origin of $`\mathbb{R}^n`$
    #[must_use]
    pub fn unit(n: usize) -> Self {
        Ball {
            center: Array1::zeros(n),
            radius: S::one(),
        }
    }
}

impl<S> Projection<S> for Ball<S>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    fn project(&self, x: ArrayView1<S>) -> Array1<S> {
        let offset = &x - &self.center;
        let dist = offset.norm_l2();
        if dist > self.radius {
            offset * (self.radius / dist) + &self.center
        } else {
            x.to_owned()
        }
    }
}

/// Box constraints $`\{x : l \leq x \leq u\}`$, elementwise
///
/// Infinite bounds are allowed, so half-bounded boxes work too.
#[derive(Debug, Clone)]
pub struct BoxBounds<S> {
    lower: Array1<S>,
    upper: Array1<S>,
}

impl<S: NdFloat> BoxBounds<S> {
    pub fn new(lower: Array1<S>, upper: Array1<S>) -> Result<Self, SpgError> {
        if lower.len() != upper.len() {
            return Err(SpgError::InvalidBounds("lower and upper differ in length"));
        }
        if lower.iter().zip(upper.iter()).any(|(&l, &u)| !(l <= u)) {
            return Err(SpgError::InvalidBounds("lower must not exceed upper"));
        }
        Ok(BoxBounds { lower, upper })
    }
}

impl<S: NdFloat> Projection<S> for BoxBounds<S> {
    fn project(&self, x: ArrayView1<S>) -> Array1<S> {
        let mut out = x.to_owned();
        Zip::from(&mut out)
            .and(&self.lower)
            .and(&self.upper)
            .apply(|v, &l, &u| *v = Float::min(Float::max(*v, l), u));
        out
    }
}
