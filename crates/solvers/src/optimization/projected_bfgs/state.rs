use snac_core::{Bounds, Snapshot};

use super::{Point, Solution, Status, evaluate::Evaluation};

/// The accepted iterate and the curvature model built around it.
pub(super) struct State<I, O, const N: usize> {
    bounds: Bounds<N>,
    point: Point<N>,
    snapshot: Snapshot<I, O>,
    gradient: [f64; N],
    /// Inverse Hessian approximation.
    inverse_hessian: [[f64; N]; N],
    /// `true` while `inverse_hessian` is the identity.
    fresh: bool,
}

impl<I, O, const N: usize> State<I, O, N> {
    pub(super) fn new(bounds: Bounds<N>, start: Evaluation<I, O, N>) -> Self {
        Self {
            bounds,
            point: start.point,
            snapshot: start.snapshot,
            gradient: [0.0; N],
            inverse_hessian: identity(),
            fresh: true,
        }
    }

    pub(super) fn point(&self) -> Point<N> {
        self.point
    }

    pub(super) fn bounds(&self) -> &Bounds<N> {
        &self.bounds
    }

    pub(super) fn gradient(&self) -> &[f64; N] {
        &self.gradient
    }

    pub(super) fn set_gradient(&mut self, gradient: [f64; N]) {
        self.gradient = gradient;
    }

    pub(super) fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Discards accumulated curvature information.
    pub(super) fn reset(&mut self) {
        self.inverse_hessian = identity();
        self.fresh = true;
    }

    /// Infinity norm of `P(x - g) - x`.
    pub(super) fn projected_gradient_norm(&self) -> f64 {
        let x = self.point.x;
        let mut stepped = x;
        for (i, value) in stepped.iter_mut().enumerate() {
            *value -= self.gradient[i];
        }
        let projected = self.bounds.project(stepped);

        projected
            .iter()
            .zip(x.iter())
            .map(|(p, xi)| (p - xi).abs())
            .fold(0.0, f64::max)
    }

    /// Variables that may move: not pinned against a bound by the gradient.
    fn free(&self) -> [bool; N] {
        let x = &self.point.x;
        let mut free = [true; N];
        for (i, is_free) in free.iter_mut().enumerate() {
            let g = self.gradient[i];
            let pinned_low = self.bounds.is_at_lower(x, i) && g > 0.0;
            let pinned_high = self.bounds.is_at_upper(x, i) && g < 0.0;
            *is_free = !(pinned_low || pinned_high);
        }
        free
    }

    /// Quasi-Newton direction over the free variables.
    ///
    /// Falls back to steepest descent (and resets the curvature model) when
    /// the quasi-Newton direction is not a descent direction.
    pub(super) fn direction(&mut self) -> [f64; N] {
        let free = self.free();
        let direction = self.masked_direction(&free);

        let slope = dot(&self.gradient, &direction);
        if slope < 0.0 && slope.is_finite() {
            return direction;
        }

        self.reset();
        self.masked_direction(&free)
    }

    fn masked_direction(&self, free: &[bool; N]) -> [f64; N] {
        let mut direction = [0.0; N];
        for i in 0..N {
            if !free[i] {
                continue;
            }
            direction[i] = -(0..N)
                .filter(|&j| free[j])
                .map(|j| self.inverse_hessian[i][j] * self.gradient[j])
                .sum::<f64>();
        }
        direction
    }

    /// Moves to an accepted trial point and returns the step taken.
    pub(super) fn accept(&mut self, trial: Evaluation<I, O, N>) -> [f64; N] {
        let mut step = trial.point.x;
        for (i, value) in step.iter_mut().enumerate() {
            *value -= self.point.x[i];
        }
        self.point = trial.point;
        self.snapshot = trial.snapshot;
        step
    }

    /// BFGS update of the inverse Hessian from step `s` and gradient change `y`.
    ///
    /// Skipped when the curvature condition `s·y > 0` does not hold. The
    /// first update after a reset rescales the identity by `s·y / y·y`.
    pub(super) fn update(&mut self, s: &[f64; N], y: &[f64; N]) {
        let sy = dot(s, y);
        let yy = dot(y, y);
        let ss = dot(s, s);
        if !sy.is_finite() || sy <= 1e-10 * (ss * yy).sqrt() {
            return;
        }

        if self.fresh {
            let scale = sy / yy;
            for (i, row) in self.inverse_hessian.iter_mut().enumerate() {
                row[i] = scale;
            }
            self.fresh = false;
        }

        let rho = 1.0 / sy;
        let mut hy = [0.0; N];
        for (i, value) in hy.iter_mut().enumerate() {
            *value = dot(&self.inverse_hessian[i], y);
        }
        let yhy = dot(y, &hy);

        for i in 0..N {
            for j in 0..N {
                self.inverse_hessian[i][j] += -rho * (s[i] * hy[j] + hy[i] * s[j])
                    + (rho * rho * yhy + rho) * s[i] * s[j];
            }
        }
    }

    pub(super) fn into_solution(
        self,
        status: Status,
        iters: usize,
        evals: usize,
    ) -> Solution<I, O, N> {
        Solution {
            status,
            x: self.point.x,
            objective: self.point.objective,
            snapshot: self.snapshot,
            iters,
            evals,
        }
    }
}

fn identity<const N: usize>() -> [[f64; N]; N] {
    let mut matrix = [[0.0; N]; N];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    matrix
}

pub(super) fn dot<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
