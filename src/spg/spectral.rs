//! Private Module

use super::lit;
use super::oracle::{Objective, Oracles};
use crate::error::SpgError;
use crate::proj::Projection;
use ndarray::prelude::*;
use ndarray::NdFloat;

/// Barzilai-Borwein step length from two consecutive iterates
///
/// ```math
/// \alpha = \frac{s^T s}{s^T y}, \quad s = x - x_{old}, \quad y = g - g_{old}
/// ```
/// Any ratio outside $`(10^{-10}, 10^{10}]`$, including NaN and infinities
/// from $`s^T y \approx 0`$, falls back to $`1`$, so the result is always
/// finite and positive.
pub(crate) fn spectral_step<S: NdFloat>(
    x: ArrayView1<S>,
    x_old: ArrayView1<S>,
    g: ArrayView1<S>,
    g_old: ArrayView1<S>,
) -> S {
    let s = &x - &x_old;
    let y = &g - &g_old;
    let alpha = s.dot(&s) / s.dot(&y);
    if alpha > lit(1e-10) && alpha <= lit(1e10) {
        alpha
    } else {
        S::one()
    }
}

/// Scaled negative gradient, projected once unless backtracking is curvilinear
///
/// curvilinear: $`d = -\alpha g`$, projected per trial step by the line search
/// otherwise:   $`d = P(x - \alpha g) - x`$
pub(crate) fn search_direction<S, O, P>(
    oracles: &mut Oracles<'_, S, O, P>,
    x: ArrayView1<S>,
    g: ArrayView1<S>,
    alpha: S,
    curvilinear: bool,
) -> Result<Array1<S>, SpgError>
where
    S: NdFloat,
    O: Objective<S>,
    P: Projection<S>,
{
    let d = &g * (-alpha);
    if curvilinear {
        Ok(d)
    } else {
        Ok(oracles.project((d + &x).view())? - &x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::{Ball, Identity};
    use approx::assert_abs_diff_eq;

    fn sphere(x: ArrayView1<f64>) -> (f64, Array1<f64>) {
        (0.5 * x.dot(&x), x.to_owned())
    }

    #[test]
    fn exact_on_a_scaled_identity_hessian() {
        // g = 4x, so the inverse curvature is 1/4
        let x_old = array![1., 2.];
        let x = array![0., 1.];
        let alpha = spectral_step(x.view(), x_old.view(), (&x * 4.).view(), (&x_old * 4.).view());
        assert_abs_diff_eq!(alpha, 0.25, epsilon = 1e-15);
    }

    #[test]
    fn falls_back_to_one_when_ratio_is_unusable() {
        let x_old = array![1., 0.];
        let x = array![0., 0.];
        let zero = array![0., 0.];

        // negative curvature
        let alpha = spectral_step(x.view(), x_old.view(), array![1., 0.].view(), zero.view());
        assert_eq!(alpha, 1.);
        // s'y = 0 gives an infinite ratio
        let alpha = spectral_step(x.view(), x_old.view(), array![0., 3.].view(), zero.view());
        assert_eq!(alpha, 1.);
        // s = 0 and y = 0 gives NaN
        let alpha = spectral_step(x.view(), x.view(), zero.view(), zero.view());
        assert_eq!(alpha, 1.);
        // too large
        let alpha = spectral_step(x.view(), x_old.view(), array![-1e-11, 0.].view(), zero.view());
        assert_eq!(alpha, 1.);
        // too small
        let alpha = spectral_step(x.view(), x_old.view(), array![-1e11, 0.].view(), zero.view());
        assert_eq!(alpha, 1.);
        // large but inside the band is kept
        let alpha = spectral_step(x.view(), x_old.view(), array![-1e-9, 0.].view(), zero.view());
        assert_abs_diff_eq!(alpha, 1e9, epsilon = 1e-3);
    }

    #[test]
    fn curvilinear_direction_skips_projection() {
        let ball = Ball::unit(2);
        let mut oracles = Oracles::new(&sphere, &ball, 2);
        let x = array![0.5, 0.];
        let g = array![-4., 2.];
        let d = search_direction(&mut oracles, x.view(), g.view(), 0.5, true).unwrap();
        assert_eq!(d, array![2., -1.]);
        assert_eq!(oracles.projects, 0);
    }

    #[test]
    fn projected_direction_stays_feasible() {
        let ball = Ball::unit(2);
        let mut oracles = Oracles::new(&sphere, &ball, 2);
        let x = array![0., 0.];
        let g = array![-3., -4.];
        let d = search_direction(&mut oracles, x.view(), g.view(), 1., false).unwrap();
        assert_abs_diff_eq!(d, array![0.6, 0.8], epsilon = 1e-12);
        assert_eq!(oracles.projects, 1);

        let mut oracles = Oracles::new(&sphere, &Identity, 2);
        let d = search_direction(&mut oracles, x.view(), g.view(), 2., false).unwrap();
        assert_abs_diff_eq!(d, array![6., 8.], epsilon = 1e-12);
    }
}
