//! The `ndarray-spg` crate minimizes a differentiable function of an
//! `ndarray` over a convex set, using the Spectral Projected Gradient (SPG)
//! method.
//!
//! The caller supplies two oracles:
//! - an [`Objective`](spg/trait.Objective.html), returning the value and
//!   gradient at a point,
//! - a [`Projection`](proj/trait.Projection.html) onto the feasible set.
//!
//! Closures work for both. Every iterate the solver accepts is feasible,
//! and no Hessian or quasi-Newton matrix is ever formed: curvature enters
//! only through the Barzilai-Borwein step length, safeguarded by a
//! non-monotone backtracking search.
//!
//! ```ignore
//! use ndarray::prelude::*;
//! use ndarray_spg::proj::Ball;
//! use ndarray_spg::spg::{spg, SpgOptions};
//!
//! let b = array![2., -2.];
//! let objective = |x: ArrayView1<f64>| (0.5 * x.dot(&x) + b.dot(&x), &b + &x);
//! let res = spg(objective, Ball::unit(2), array![1., 2.].view(), &SpgOptions::default())?;
//! assert!(res.termination.is_converged());
//! ```
//!
//! Diagnostics go through the `log` facade; install any logger to see them.

#![cfg_attr(all(rustc_nightly, test), feature(test))]
#[cfg(all(rustc_nightly, test))]
extern crate test;

#[cfg(test)]
extern crate intel_mkl_src;

pub mod error;
pub mod proj;
pub mod spg;

pub use error::SpgError;
