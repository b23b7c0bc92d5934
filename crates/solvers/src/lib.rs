//! Numerical solvers for shellfit.
//!
//! # Modules
//!
//! - [`optimization`] — drive an expensive [`Oracle`] toward a target
//!   measurement by minimizing a squared-error objective
//!
//! [`Oracle`]: shellfit_core::Oracle

pub mod optimization;
