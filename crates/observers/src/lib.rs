//! Reusable observers for shellfit searches.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with the Nelder-Mead thickness search.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for solver-agnostic observers
//!   ([`HasObjective`], [`HasIteration`], [`CanStopEarly`], [`CanAssumeWorse`])
//!
//! # Observers
//!
//! - [`Cancellation`] stops a search at the next iteration boundary once its
//!   [`CancelHandle`] is triggered, possibly from another thread.
//! - [`IterationLog`] writes a per-iteration log to any [`std::io::Write`].
//!
//! [`Observer`]: shellfit_core::Observer
//! [`HasObjective`]: traits::HasObjective
//! [`HasIteration`]: traits::HasIteration
//! [`CanStopEarly`]: traits::CanStopEarly
//! [`CanAssumeWorse`]: traits::CanAssumeWorse

pub mod traits;

mod cancel;
mod log;

pub use cancel::{CancelHandle, Cancellation};
pub use log::IterationLog;
