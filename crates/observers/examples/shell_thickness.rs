//! Finds the wall thickness that gives a hollow sphere a target volume.
//!
//! The oracle stands in for a CAD kernel: each evaluation shells a solid
//! sphere to the candidate thickness and reports the remaining volume.
//! Thicknesses at or beyond the radius close the cavity and fail, which the
//! search treats as a penalized region rather than an error.
//!
//! # Usage
//!
//! ```text
//! cargo run --example shell_thickness
//! cargo run --example shell_thickness -- 2500 1.0
//! RUST_LOG=debug cargo run --example shell_thickness
//! ```
//!
//! The optional arguments are the target volume in mm³ and the initial
//! thickness guess in mm.

use std::{error::Error, f64::consts::PI, io, thread, time::Duration};

use shellfit_core::{Observer, Oracle};
use shellfit_observers::{Cancellation, IterationLog};
use shellfit_solvers::optimization::nelder_mead::{self, Action, Config, Event};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const RADIUS: f64 = 10.0;

#[derive(Debug, Error)]
enum ShellError {
    #[error("a {0} mm wall closes the sphere")]
    Closed(f64),
}

/// A solid sphere that is re-shelled on every evaluation.
struct Sphere {
    shelled: bool,
}

impl Oracle for Sphere {
    type Error = ShellError;
    type ResetError = ShellError;

    fn reset(&mut self) -> Result<(), Self::ResetError> {
        self.shelled = false;
        Ok(())
    }

    fn evaluate(&mut self, thickness: f64) -> Result<f64, Self::Error> {
        debug_assert!(!self.shelled, "sphere must be reset before shelling");
        if thickness >= RADIUS {
            return Err(ShellError::Closed(thickness));
        }
        self.shelled = true;
        let inner = RADIUS - thickness;
        Ok(4.0 / 3.0 * PI * (RADIUS.powi(3) - inner.powi(3)))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1).map(|arg| arg.parse::<f64>());
    let target = args.next().transpose()?.unwrap_or(2000.0);
    let x0 = args.next().transpose()?.unwrap_or(1.0);

    let config = Config::new(100, 1e-3)?.with_realize_best(true);
    let mut sphere = Sphere { shelled: false };

    let (mut cancellation, handle) = Cancellation::new();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(5));
        handle.cancel();
    });

    let mut log =
        IterationLog::new(io::stdout().lock(), "sphere volume", target).with_units("mm", "mm³");
    let observer = |event: &Event<'_, ShellError>| -> Option<Action> {
        let logged = log.observe(event);
        cancellation.observe(event).or(logged)
    };

    let solution = nelder_mead::run(&mut sphere, target, x0, &config, observer)?;
    let _stdout = log.finish(&solution)?;

    Ok(())
}
