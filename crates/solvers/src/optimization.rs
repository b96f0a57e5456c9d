//! Solvers for bounded minimization problems.
//!
//! A [`MinimizationProblem`] maps solver variables `x: [f64; N]` to model
//! inputs, calls the model, and extracts a scalar objective. Solvers in this
//! module search the problem's box bounds for the `x` that minimizes it.
//!
//! # Solvers
//!
//! - [`projected_bfgs`]: quasi-Newton search with finite-difference
//!   gradients, projected onto box bounds
//!
//! [`MinimizationProblem`]: snac_core::MinimizationProblem

pub mod projected_bfgs;
