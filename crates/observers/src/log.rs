use std::{
    fmt,
    io::{self, Write},
};

use jiff::Zoned;
use shellfit_core::Observer;
use shellfit_solvers::optimization::nelder_mead::{Event, Solution};

/// Writes a human-readable iteration log for a Nelder-Mead search.
///
/// The log starts with a header naming what is being matched and when the
/// log was created, gets one
/// tab-separated line per completed iteration, and ends with a summary
/// written by [`finish`](Self::finish). The caller owns the writer, so the
/// log can go to a file, stdout, or an in-memory buffer.
///
/// Observers cannot return errors, so the first write failure is latched,
/// later writes are skipped, and the error surfaces from `finish`.
#[derive(Debug)]
pub struct IterationLog<W> {
    writer: W,
    label: String,
    target: f64,
    started: Zoned,
    x_unit: String,
    measurement_unit: String,
    header_written: bool,
    error: Option<io::Error>,
}

impl<W: Write> IterationLog<W> {
    /// Creates a log for matching `label` to `target`.
    ///
    /// Nothing is written until the first iteration completes or the log is
    /// finished.
    pub fn new(writer: W, label: impl Into<String>, target: f64) -> Self {
        Self {
            writer,
            label: label.into(),
            target,
            started: Zoned::now(),
            x_unit: String::new(),
            measurement_unit: String::new(),
            header_written: false,
            error: None,
        }
    }

    /// Labels logged values with units, such as `"mm"` and `"g"`.
    #[must_use]
    pub fn with_units(mut self, x_unit: &str, measurement_unit: &str) -> Self {
        self.x_unit = x_unit.to_owned();
        self.measurement_unit = measurement_unit.to_owned();
        self
    }

    /// Replaces the start time shown in the header.
    #[must_use]
    pub fn with_start_time(mut self, started: Zoned) -> Self {
        self.started = started;
        self
    }

    /// Writes the summary and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns the first write error encountered while logging, or any error
    /// from writing the summary and flushing.
    pub fn finish(mut self, solution: &Solution) -> io::Result<W> {
        self.write_header();
        self.write_line(format_args!(""));
        let x = Quantity(Some(solution.x), &self.x_unit).to_string();
        let measured = Quantity(solution.measurement, &self.measurement_unit).to_string();
        self.write_line(format_args!("Best x: {x}\tmeasured: {measured}"));
        self.write_line(format_args!(
            "{:?} after {} iterations and {} evaluations in {:.3} s",
            solution.status,
            solution.iters,
            solution.evaluations,
            solution.elapsed.as_secs_f64(),
        ));

        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_header(&mut self) {
        if self.header_written {
            return;
        }
        self.header_written = true;
        let target = Quantity(Some(self.target), &self.measurement_unit).to_string();
        let header = format!("Matching {} to a target of {target}", self.label);
        self.write_line(format_args!("{header}"));
        let started = self.started.strftime("%d-%m-%Y %H:%M:%S").to_string();
        self.write_line(format_args!("{started}"));
    }

    fn write_line(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = writeln!(self.writer, "{args}") {
            tracing::warn!(%error, "iteration log write failed");
            self.error = Some(error);
        }
    }
}

impl<E, A, W: Write> Observer<Event<'_, E>, A> for IterationLog<W> {
    fn observe(&mut self, event: &Event<'_, E>) -> Option<A> {
        if let Event::Iterated { record, .. } = event {
            self.write_header();
            let x = Quantity(Some(record.x), &self.x_unit).to_string();
            let measured = Quantity(record.measurement, &self.measurement_unit).to_string();
            self.write_line(format_args!(
                "Iteration: {}\tx: {x}\tmeasured: {measured}",
                record.iter,
            ));
        }
        None
    }
}

/// Formats a logged value with its unit, or `failed` when there is none.
struct Quantity<'u>(Option<f64>, &'u str);

impl fmt::Display for Quantity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0, self.1) {
            (None, _) => f.write_str("failed"),
            (Some(v), "") => write!(f, "{v:.6}"),
            (Some(v), unit) => write!(f, "{v:.6} {unit}"),
        }
    }
}
