//! Report producer contract
//!
//! A producer writes a plain-text report for one market. Flags are read back
//! out of that text: a heading line starting with `Diagnostics`, one flag per
//! line (optionally bulleted with `- `), closed by a blank line.

use chrono::NaiveDate;
use market_data::DataSource;
use std::io::Write;

/// Everything a producer needs for one run
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    pub source: &'a dyn DataSource,
    /// Lookback windows end on this date
    pub as_of: NaiveDate,
}

impl<'a> RunContext<'a> {
    pub fn new(source: &'a dyn DataSource, as_of: NaiveDate) -> Self {
        Self { source, as_of }
    }
}

impl std::fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("source", &self.source.describe())
            .field("as_of", &self.as_of)
            .finish()
    }
}

/// Produces one market's health report
pub trait ReportProducer {
    /// Write the report to `out`
    ///
    /// Returning [`common::Error::Terminated`] stops the run early without
    /// marking it failed. Any other error marks the market as ERROR.
    fn run(&self, ctx: &RunContext<'_>, out: &mut dyn Write) -> common::Result<()>;
}

impl<F> ReportProducer for F
where
    F: Fn(&RunContext<'_>, &mut dyn Write) -> common::Result<()>,
{
    fn run(&self, ctx: &RunContext<'_>, out: &mut dyn Write) -> common::Result<()> {
        self(ctx, out)
    }
}
