//! Numerical solvers for SNAC thermal history fitting.
//!
//! Solvers operate on a [`Model`] and a [`MinimizationProblem`] from
//! `snac-core` and report progress to an [`Observer`].
//!
//! [`Model`]: snac_core::Model
//! [`MinimizationProblem`]: snac_core::MinimizationProblem
//! [`Observer`]: snac_core::Observer

pub mod optimization;
