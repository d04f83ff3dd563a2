//! Console output: one line per batch event, then a summary.

use pdfpull_core::{BatchReport, FetchEvent};
use std::io::Write;

pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write errors (closed stdout, broken pipe) are ignored so the batch keeps going.
    pub fn event(&mut self, event: &FetchEvent<'_>) {
        let _ = writeln!(self.out, "{}", event);
        let _ = self.out.flush();
    }

    pub fn summary(&mut self, report: &BatchReport) {
        let aborted = if report.aborted {
            " (stopped early: rate limited)"
        } else {
            ""
        };
        let _ = writeln!(
            self.out,
            "Done: {} saved, {} skipped, {} failed{}",
            report.saved(),
            report.skipped(),
            report.failed(),
            aborted
        );
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
