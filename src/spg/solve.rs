use super::history::NonMonotoneHistory;
use super::line_search::nonmonotone_backtrack;
use super::oracle::{Objective, Oracles};
use super::spectral::{search_direction, spectral_step};
use super::{nop, SpgOptions, SpgResult, Termination, Verbosity};
use crate::error::SpgError;
use crate::proj::Projection;
use ndarray::prelude::*;
use ndarray::NdFloat;
use ndarray_linalg::{Lapack, Norm, Scalar};
use num_traits::Float;

/// Spectral Projected Gradient for minimization over a convex set
///
/// Minimizes a differentiable $`f`$ subject to $`x \in C`$, where $`C`$ is only
/// known through its projection $`P`$. All iterates are feasible.
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// \alpha_k &= \frac{s_{k-1}^T s_{k-1}}{s_{k-1}^T y_{k-1}} \quad (\alpha_1 = 1) \\
/// d_k &= P(x_k - \alpha_k \nabla f(x_k)) - x_k \\
/// f_{ref} &= \max_{0 \leq j < m} f(x_{k-j}) \\
/// t_k &= \max \{ t = 2^{-j} : f(x_k + t d_k) \leq f_{ref} + c\, t \nabla f(x_k)^T d_k \} \\
/// x_{k+1} &= x_k + t_k d_k
/// \end{aligned}
/// ```
/// With `curvilinear` set, $`d_k = -\alpha_k \nabla f(x_k)`$ and each trial is
/// $`P(x_k + t d_k)`$ instead. The first step length is $`\min(1, 1/\|\nabla f(x_1)\|_1)`$.
///
/// Parameters
/// ----------
/// - __objective:__  returns $`(f(x), \nabla f(x))`$
/// - __projection:__ maps any point onto $`C`$
/// - __x0:__         initial guess, projected before the first evaluation
/// - __options:__    tolerances and budget, see [`SpgOptions`](struct.SpgOptions.html)
///
/// Returns the last accepted point with the reason for stopping. A NaN or
/// infinite objective is not an error; comparisons against it simply admit the
/// next trial. Oracle panics propagate to the caller.
pub fn spg<S, O, P>(
    objective: O,
    projection: P,
    x0: ArrayView1<S>,
    options: &SpgOptions<S>,
) -> Result<SpgResult<S>, SpgError>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
    O: Objective<S>,
    P: Projection<S>,
{
    spg_with_callback(objective, projection, x0, options, nop)
}

/// [`spg`](fn.spg.html) with a user callback
///
/// - __callback:__  User-defined function to be evaluated with two arguments (x,iter).
///                   It is evaluated at (x0,0) and then after each iteration.
///                   If it returns True, the function terminates early.
pub fn spg_with_callback<S, O, P>(
    objective: O,
    projection: P,
    x0: ArrayView1<S>,
    options: &SpgOptions<S>,
    mut callback: impl FnMut(ArrayView1<S>, usize) -> bool,
) -> Result<SpgResult<S>, SpgError>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
    O: Objective<S>,
    P: Projection<S>,
{
    options.validate()?;
    if x0.is_empty() {
        return Err(SpgError::EmptyProblem);
    }
    let verbose = options.verbose;
    let prog_tol = options.prog_tol;

    let mut oracles = Oracles::new(&objective, &projection, x0.len());
    let mut x = oracles.project(x0)?;
    let (mut f, mut g) = oracles.evaluate(x.view())?;

    let mut history = NonMonotoneHistory::new(options.memory);
    let mut previous: Option<(Array1<S>, Array1<S>)> = None;
    let mut opt_cond = None;
    let mut iter = 0;
    let mut trials = 0;

    let termination = if callback(x.view(), 0) {
        Termination::Callback
    } else {
        if verbose >= Verbosity::Iter {
            log::info!(
                "{:>10} {:>10} {:>10} {:>15} {:>15} {:>15}",
                "Iteration",
                "FunEvals",
                "Projections",
                "Step Length",
                "Function Val",
                "Opt Cond"
            );
        }
        loop {
            iter += 1;

            let alpha = match &previous {
                Some((x_old, g_old)) => spectral_step(x.view(), x_old.view(), g.view(), g_old.view()),
                None => S::one(),
            };
            let d = search_direction(&mut oracles, x.view(), g.view(), alpha, options.curvilinear)?;

            let gtd = g.dot(&d);
            if gtd > -prog_tol {
                break Termination::NoDescent;
            }

            let t_init = if iter == 1 {
                Float::min(S::one(), S::one() / g.norm_l1())
            } else {
                S::one()
            };

            history.push(f);
            let fun_ref = history.reference();

            let step = nonmonotone_backtrack(
                &mut oracles,
                x.view(),
                f,
                g.view(),
                d.view(),
                fun_ref,
                t_init,
                options,
            )?;

            trials += step.trials;
            let f_old = f;
            previous = Some((x, g));
            x = step.x;
            f = step.f;
            g = step.g;

            if options.test_opt {
                let projected = oracles.project((&x - &g).view())?;
                opt_cond = Some((projected - &x).norm_max());
            }

            if verbose >= Verbosity::Iter {
                let evals = oracles.fun_evals.saturating_mul(options.fun_eval_multiplier);
                match opt_cond {
                    Some(c) => log::info!(
                        "{:>10} {:>10} {:>10} {:>15.5e} {:>15.5e} {:>15.5e}",
                        iter,
                        evals,
                        oracles.projects,
                        step.t,
                        f,
                        c
                    ),
                    None => log::info!(
                        "{:>10} {:>10} {:>10} {:>15.5e} {:>15.5e}",
                        iter,
                        evals,
                        oracles.projects,
                        step.t,
                        f
                    ),
                }
            }

            if let Some(c) = opt_cond {
                if c < options.opt_tol {
                    break Termination::Optimal;
                }
            }
            if (&d * step.t).norm_max() < prog_tol {
                break Termination::StepTooSmall;
            }
            if Float::abs(f - f_old) < prog_tol {
                break Termination::NoProgress;
            }
            if oracles.fun_evals.saturating_mul(options.fun_eval_multiplier) > options.max_iter {
                break Termination::BudgetExceeded;
            }
            if callback(x.view(), iter) {
                break Termination::Callback;
            }
        }
    };

    if verbose >= Verbosity::Final {
        log::info!("{}", termination);
    }

    Ok(SpgResult {
        x,
        f,
        termination,
        iterations: iter,
        fun_evals: oracles.fun_evals,
        projects: oracles.projects,
        line_search_trials: trials,
        opt_cond,
    })
}


#[cfg(all(rustc_nightly, test))]
mod benches {
    use super::*;
    use crate::proj::BoxBounds;
    use test::Bencher;

    fn separable(x: ArrayView1<f64>) -> (f64, Array1<f64>) {
        let w = Array1::linspace(1., 100., x.len());
        let r = &x - 1.;
        ((&w * &r).dot(&r) * 0.5, &w * &r)
    }

    #[bench]
    fn spg_box_separable_100(b: &mut Bencher) {
        let n = 100;
        let bounds = BoxBounds::new(Array1::zeros(n), Array1::from_elem(n, 0.5)).unwrap();
        let x0 = Array1::zeros(n);
        let options = SpgOptions {
            verbose: Verbosity::Silent,
            ..SpgOptions::default()
        };
        b.iter(|| spg(separable, bounds.clone(), x0.view(), &options).unwrap());
    }
}
