//! Core traits and types shared by the SNAC solvers and thermal-history models.
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`MinimizationProblem`]: adapts bounded solver variables to model inputs
//!   and extracts an objective from model outputs
//! - [`Bounds`]: validated box constraints on solver variables
//! - [`constraint`]: construction-time numeric invariants for measured inputs

mod bounds;
pub mod constraint;
mod model;
mod observer;
mod problem;

pub use bounds::{Bounds, BoundsError};
pub use model::{Model, Snapshot};
pub use observer::Observer;
pub use problem::MinimizationProblem;
