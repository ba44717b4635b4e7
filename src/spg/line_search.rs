//! Private Module

use super::oracle::{Objective, Oracles};
use super::{lit, SpgOptions, Verbosity};
use crate::error::SpgError;
use crate::proj::Projection;
use ndarray::prelude::*;
use ndarray::NdFloat;
use ndarray_linalg::{Lapack, Norm, Scalar};

/// Accepted trial of one backtracking search
///
/// A failed search returns the starting point with `t == 0`.
pub(crate) struct Step<S> {
    pub x: Array1<S>,
    pub f: S,
    pub g: Array1<S>,
    pub t: S,
    pub trials: usize,
}

fn trial_point<S, O, P>(
    oracles: &mut Oracles<'_, S, O, P>,
    x: ArrayView1<S>,
    d: ArrayView1<S>,
    t: S,
    curvilinear: bool,
) -> Result<Array1<S>, SpgError>
where
    S: NdFloat,
    O: Objective<S>,
    P: Projection<S>,
{
    let mut x_t = x.to_owned();
    x_t.scaled_add(t, &d);
    if curvilinear {
        oracles.project(x_t.view())
    } else {
        Ok(x_t)
    }
}

/// Non-monotone Armijo backtracking
///
/// Accepts the first trial $`x_t`$ with
/// ```math
/// f(x_t) \leq f_{ref} + c \, g^T (x_t - x)
/// ```
/// where $`x_t = x + t d`$, or $`x_t = P(x + t d)`$ on the curvilinear path.
/// On rejection $`t`$ is halved, kept within $`[10^{-3} t, 0.6 t]`$ of the
/// previous trial. The search gives up once $`\|t d\|_\infty`$ drops below
/// `prog_tol`.
pub(crate) fn nonmonotone_backtrack<S, O, P>(
    oracles: &mut Oracles<'_, S, O, P>,
    x: ArrayView1<S>,
    f: S,
    g: ArrayView1<S>,
    d: ArrayView1<S>,
    fun_ref: S,
    t_init: S,
    options: &SpgOptions<S>,
) -> Result<Step<S>, SpgError>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
    O: Objective<S>,
    P: Projection<S>,
{
    let debug = options.verbose >= Verbosity::Debug;
    let lower = lit::<S>(1e-3);
    let upper = lit::<S>(0.6);
    let two = lit::<S>(2.);

    let mut t = t_init;
    let mut x_new = trial_point(oracles, x, d, t, options.curvilinear)?;
    let (mut f_new, mut g_new) = oracles.evaluate(x_new.view())?;
    let mut trials = 1;

    while f_new > fun_ref + options.suff_dec * g.dot(&(&x_new - &x)) {
        let t_prev = t;

        // halving, no cubic interpolation
        t = t / two;
        if t < t_prev * lower {
            if debug {
                log::debug!("Interpolated value too small, adjusting");
            }
            t = t_prev * lower;
        } else if t > t_prev * upper {
            if debug {
                log::debug!("Interpolated value too large, adjusting");
            }
            t = t_prev * upper;
        }

        if (&d * t).norm_max() < options.prog_tol || t == S::zero() {
            if debug {
                log::debug!("Line search failed after {} trials", trials);
            }
            return Ok(Step {
                x: x.to_owned(),
                f,
                g: g.to_owned(),
                t: S::zero(),
                trials,
            });
        }

        x_new = trial_point(oracles, x, d, t, options.curvilinear)?;
        let (f_t, g_t) = oracles.evaluate(x_new.view())?;
        f_new = f_t;
        g_new = g_t;
        trials += 1;
    }

    Ok(Step {
        x: x_new,
        f: f_new,
        g: g_new,
        t,
        trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::{Ball, Identity};
    use approx::assert_abs_diff_eq;

    fn sphere(x: ArrayView1<f64>) -> (f64, Array1<f64>) {
        (0.5 * x.dot(&x), x.to_owned())
    }

    fn opts() -> SpgOptions<f64> {
        SpgOptions {
            verbose: Verbosity::Silent,
            ..SpgOptions::default()
        }
    }

    #[test]
    fn accepts_full_step_on_sufficient_decrease() {
        let mut oracles = Oracles::new(&sphere, &Identity, 2);
        let x = array![2., 0.];
        let (f, g) = sphere(x.view());
        let d = -&g;
        let step = nonmonotone_backtrack(&mut oracles, x.view(), f, g.view(), d.view(), f, 1., &opts()).unwrap();
        assert_eq!(step.t, 1.);
        assert_eq!(step.trials, 1);
        assert_abs_diff_eq!(step.x, array![0., 0.]);
        assert_eq!(step.f, 0.);
        assert_eq!(oracles.fun_evals, 1);
    }

    #[test]
    fn halves_until_accepted() {
        // t = 1 and t = 1/2 overshoot to -3 and -1
        let mut oracles = Oracles::new(&sphere, &Identity, 1);
        let x = array![1.];
        let (f, g) = sphere(x.view());
        let d = array![-4.];
        let step = nonmonotone_backtrack(&mut oracles, x.view(), f, g.view(), d.view(), f, 1., &opts()).unwrap();
        assert_eq!(step.t, 0.25);
        assert_eq!(step.trials, 3);
        assert_abs_diff_eq!(step.x, array![0.]);
        assert_eq!(oracles.fun_evals, 3);
    }

    #[test]
    fn consecutive_trials_stay_within_safeguards() {
        let t_seen = std::cell::RefCell::new(Vec::new());
        let x = array![1.];
        // records the step length of each trial along d = [-1]
        let record = |p: ArrayView1<f64>| {
            t_seen.borrow_mut().push(1. - p[0]);
            (1., array![1.])
        };
        let mut oracles = Oracles::new(&record, &Identity, 1);
        let d = array![-1.];
        let step = nonmonotone_backtrack(&mut oracles, x.view(), 1., array![1.].view(), d.view(), 1., 1., &opts()).unwrap();
        assert_eq!(step.t, 0.);
        let ts = t_seen.borrow();
        assert!(ts.len() > 10);
        for w in ts.windows(2) {
            assert!(w[1] >= 1e-3 * w[0] && w[1] <= 0.6 * w[0]);
        }
    }

    #[test]
    fn failure_keeps_previous_point() {
        // gradient claims descent but the objective only increases
        let liar = |x: ArrayView1<f64>| (x.dot(&x), -x.to_owned());
        let mut oracles = Oracles::new(&liar, &Identity, 2);
        let x = array![1., 1.];
        let (f, g) = liar(x.view());
        let d = -&g;
        let step = nonmonotone_backtrack(&mut oracles, x.view(), f, g.view(), d.view(), f, 1., &opts()).unwrap();
        assert_eq!(step.t, 0.);
        assert_eq!(step.x, x);
        assert_eq!(step.f, f);
        assert_eq!(step.g, g);
        assert_eq!(step.trials, oracles.fun_evals);
    }

    #[test]
    fn nonmonotone_reference_admits_an_increase() {
        let mut oracles = Oracles::new(&sphere, &Identity, 1);
        let x = array![1.];
        let (f, g) = sphere(x.view());
        // full step to -1.5 raises f from 0.5 to 1.125
        let d = array![-2.5];
        let relaxed = nonmonotone_backtrack(&mut oracles, x.view(), f, g.view(), d.view(), 2., 1., &opts()).unwrap();
        assert_eq!(relaxed.t, 1.);
        assert!(relaxed.f > f);

        let mut oracles = Oracles::new(&sphere, &Identity, 1);
        let strict = nonmonotone_backtrack(&mut oracles, x.view(), f, g.view(), d.view(), f, 1., &opts()).unwrap();
        assert!(strict.t < 1.);
        assert!(strict.f < f);
    }

    #[test]
    fn curvilinear_trials_are_projected() {
        let ball = Ball::unit(2);
        let mut oracles = Oracles::new(&sphere, &ball, 2);
        let x = array![1., 0.];
        let (f, g) = sphere(x.view());
        let d = array![-1., 3.];
        let options = SpgOptions {
            curvilinear: true,
            ..opts()
        };
        let step = nonmonotone_backtrack(&mut oracles, x.view(), f, g.view(), d.view(), f, 1., &options).unwrap();
        // t = 1, 1/2 and 1/4 are pulled back onto the sphere and rejected
        assert_eq!(step.t, 0.125);
        assert_eq!(step.trials, 4);
        assert!(step.x.norm_l2() <= 1.);
        assert_eq!(oracles.projects, 4);
    }
}
