//! Spectral Projected Gradient Minimization
//!
//! For minimizing a differentiable objective $`f`$ over a closed convex set
//! $`C`$ given only two oracles: one returning $`(f(x), \nabla f(x))`$ and
//! one returning the projection $`P_C(x)`$. Every accepted iterate is feasible.
//!
//! Each iteration combines
//! - a spectral (Barzilai-Borwein) step length
//!   ```math
//!   \alpha_k = \frac{s^T s}{s^T y}, \quad s = x_k - x_{k-1}, \quad y = \nabla f(x_k) - \nabla f(x_{k-1})
//!   ```
//!   reset to $`1`$ whenever it leaves $`[10^{-10}, 10^{10}]`$,
//! - a search direction, either the projected-gradient direction
//!   $`d = P_C(x - \alpha \nabla f(x)) - x`$ followed along a line, or the
//!   curvilinear path $`t \mapsto P_C(x - t\alpha\nabla f(x))`$,
//! - a non-monotone Armijo backtracking search that compares against the
//!   worst of the last `memory` accepted objective values.
//!
//! See [\[BMR00\]](#references).
//!
//! References
//! ----------
//! \[BMR00\]: [ Birgin E, Martinez J, Raydan M,
//!      "Nonmonotone Spectral Projected Gradient Methods on Convex Sets",
//!         SIAM Journal on Optimization, Vol 10, #4, 2000, 1196-1211 ](https://doi.org/10.1137/S1052623497330963)

mod history;
mod line_search;
mod oracle;
pub use oracle::Objective;
mod spectral;
mod solve;
pub use solve::*;

use crate::error::SpgError;
use ndarray::prelude::*;
use ndarray::NdFloat;
use num_traits::Float;
use std::fmt;

/// Do nothing function for optional user callback (returns false)
#[allow(clippy::needless_pass_by_value)]
pub fn nop<T>(_x: ArrayView1<T>, _itr: usize) -> bool {
    false
}

/// Amount of diagnostic output sent to the `log` facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent,
    /// termination reason only
    Final,
    /// one line per iteration
    Iter,
    /// per iteration and line search events
    Debug,
}

impl Verbosity {
    /// Numeric levels 0 to 3, anything higher is `Debug`
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::Final,
            2 => Verbosity::Iter,
            _ => Verbosity::Debug,
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Iter
    }
}

/// Tunable constants of the solver
///
/// Parameters
/// ----------
/// - __max_iter:__     cap on (weighted) objective evaluations
/// - __memory:__       number of past objective values the acceptance test looks back on.
///                      `1` gives a monotone Armijo search.
/// - __suff_dec:__     sufficient decrease constant of the Armijo condition
/// - __prog_tol:__     smallest meaningful change in step or objective value
/// - __opt_tol:__      tolerance on the projected gradient for optimality
/// - __curvilinear:__  backtrack along the projection arc instead of a straight line
/// - __test_opt:__     compute the optimality measure every iteration (one extra projection)
/// - __fun_eval_multiplier:__ budget cost of one objective call
/// - __verbose:__      diagnostic output level
#[derive(Debug, Clone)]
pub struct SpgOptions<S> {
    pub max_iter: usize,
    pub memory: usize,
    pub suff_dec: S,
    pub prog_tol: S,
    pub opt_tol: S,
    pub curvilinear: bool,
    pub test_opt: bool,
    pub fun_eval_multiplier: usize,
    pub verbose: Verbosity,
}

impl<S: NdFloat> Default for SpgOptions<S> {
    fn default() -> Self {
        SpgOptions {
            max_iter: 200,
            memory: 10,
            suff_dec: lit(1e-4),
            prog_tol: lit(1e-9),
            opt_tol: lit(1e-7),
            curvilinear: false,
            test_opt: true,
            fun_eval_multiplier: 1,
            verbose: Verbosity::default(),
        }
    }
}

impl<S: NdFloat> SpgOptions<S> {
    pub fn validate(&self) -> Result<(), SpgError> {
        if self.max_iter == 0 {
            return Err(SpgError::InvalidOption {
                name: "max_iter",
                reason: "must be at least 1",
            });
        }
        if self.memory == 0 {
            return Err(SpgError::InvalidOption {
                name: "memory",
                reason: "must be at least 1",
            });
        }
        if self.fun_eval_multiplier == 0 {
            return Err(SpgError::InvalidOption {
                name: "fun_eval_multiplier",
                reason: "must be at least 1",
            });
        }
        if !(self.suff_dec > S::zero() && self.suff_dec < S::one()) {
            return Err(SpgError::InvalidOption {
                name: "suff_dec",
                reason: "must lie in (0, 1)",
            });
        }
        if !(Float::is_finite(self.prog_tol) && self.prog_tol >= S::zero()) {
            return Err(SpgError::InvalidOption {
                name: "prog_tol",
                reason: "must be finite and non-negative",
            });
        }
        if !(Float::is_finite(self.opt_tol) && self.opt_tol >= S::zero()) {
            return Err(SpgError::InvalidOption {
                name: "opt_tol",
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Why the solver stopped
///
/// Every reason comes with the last accepted point; only `Optimal`
/// certifies first-order stationarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// $`\nabla f^T d > -\mathrm{prog\_tol}`$
    NoDescent,
    /// $`\|P_C(x - \nabla f(x)) - x\|_\infty < \mathrm{opt\_tol}`$
    Optimal,
    /// $`\|t d\|_\infty < \mathrm{prog\_tol}`$
    StepTooSmall,
    /// $`|f_k - f_{k-1}| < \mathrm{prog\_tol}`$
    NoProgress,
    /// evaluation budget `max_iter` exhausted
    BudgetExceeded,
    /// the user callback asked to stop
    Callback,
}

impl Termination {
    #[must_use]
    pub fn is_converged(self) -> bool {
        self == Termination::Optimal
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Termination::NoDescent => "Directional derivative below progTol",
            Termination::Optimal => "First-order optimality conditions below optTol",
            Termination::StepTooSmall => "Step size below progTol",
            Termination::NoProgress => "Function value changing by less than progTol",
            Termination::BudgetExceeded => "Function evaluations exceed maxIter",
            Termination::Callback => "Stopped by callback",
        };
        f.write_str(msg)
    }
}

/// Outcome of a solve
#[derive(Debug, Clone)]
pub struct SpgResult<S> {
    /// last accepted (feasible) point
    pub x: Array1<S>,
    /// objective at `x`
    pub f: S,
    pub termination: Termination,
    /// outer iterations started
    pub iterations: usize,
    /// objective oracle calls, unweighted
    pub fun_evals: usize,
    /// projection oracle calls
    pub projects: usize,
    /// objective calls made by the line searches, every one but the first
    pub line_search_trials: usize,
    /// last optimality measure, if it was computed
    pub opt_cond: Option<S>,
}

/// Scalar constant in the working precision
#[inline]
pub(crate) fn lit<S: NdFloat>(v: f64) -> S {
    S::from(v).unwrap()
}
