//! Private Module

use crate::error::SpgError;
use crate::proj::Projection;
use ndarray::prelude::*;
use std::marker::PhantomData;

/// Objective oracle returning the value and gradient at a point
///
/// Implemented for every `Fn(ArrayView1<S>) -> (S, Array1<S>)`.
pub trait Objective<S> {
    fn evaluate(&self, x: ArrayView1<S>) -> (S, Array1<S>);
}

impl<S, F> Objective<S> for F
where
    F: Fn(ArrayView1<S>) -> (S, Array1<S>),
{
    #[inline]
    fn evaluate(&self, x: ArrayView1<S>) -> (S, Array1<S>) {
        self(x)
    }
}

/// Both oracles of one solve, with call counters and shape checks
pub(crate) struct Oracles<'a, S, O, P> {
    objective: &'a O,
    projection: &'a P,
    dim: usize,
    pub fun_evals: usize,
    pub projects: usize,
    phantom: PhantomData<S>,
}

impl<'a, S, O, P> Oracles<'a, S, O, P>
where
    O: Objective<S>,
    P: Projection<S>,
{
    pub fn new(objective: &'a O, projection: &'a P, dim: usize) -> Self {
        Oracles {
            objective,
            projection,
            dim,
            fun_evals: 0,
            projects: 0,
            phantom: PhantomData,
        }
    }

    pub fn evaluate(&mut self, x: ArrayView1<S>) -> Result<(S, Array1<S>), SpgError> {
        let (f, g) = self.objective.evaluate(x);
        self.fun_evals += 1;
        if g.len() != self.dim {
            return Err(SpgError::DimensionMismatch {
                oracle: "objective",
                expected: self.dim,
                got: g.len(),
            });
        }
        Ok((f, g))
    }

    pub fn project(&mut self, x: ArrayView1<S>) -> Result<Array1<S>, SpgError> {
        let p = self.projection.project(x);
        self.projects += 1;
        if p.len() != self.dim {
            return Err(SpgError::DimensionMismatch {
                oracle: "projection",
                expected: self.dim,
                got: p.len(),
            });
        }
        Ok(p)
    }
}
