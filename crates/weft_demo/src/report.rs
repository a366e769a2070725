//! Three-stage report pipeline with simulated latency.
//!
//! `produce`, `format`, and `persist` each block the calling thread for a
//! configurable delay to stand in for real work. All three run through the
//! dispatcher under the `report` target, so an around advice can measure
//! them without the pipeline knowing.

use core::time::Duration;
use std::sync::Arc;
use std::thread;

use weft_advice::{CallError, Dispatcher, OperationInfo};

/// A raw report produced by the first stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Report body text.
    pub body: String,
}

/// A report prepared for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReport {
    /// Formatted body text.
    pub body: String,
}

/// Three-stage report pipeline routed through the dispatcher.
pub struct ReportPipeline {
    dispatcher: Arc<Dispatcher>,
    produce_delay: Duration,
    format_delay: Duration,
    persist_delay: Duration,
}

impl ReportPipeline {
    /// Target component name used in operation metadata.
    pub const TARGET: &'static str = "report";

    /// Creates a pipeline with the default stage delays.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            produce_delay: Duration::from_millis(300),
            format_delay: Duration::from_millis(100),
            persist_delay: Duration::from_millis(200),
        }
    }

    /// Sets the produce stage delay.
    #[must_use]
    pub fn with_produce_delay(mut self, delay: Duration) -> Self {
        self.produce_delay = delay;
        self
    }

    /// Sets the format stage delay.
    #[must_use]
    pub fn with_format_delay(mut self, delay: Duration) -> Self {
        self.format_delay = delay;
        self
    }

    /// Sets the persist stage delay.
    #[must_use]
    pub fn with_persist_delay(mut self, delay: Duration) -> Self {
        self.persist_delay = delay;
        self
    }

    /// Produces a raw report after the configured delay.
    ///
    /// # Errors
    ///
    /// Propagates advice failures; the stage itself cannot fail.
    pub fn produce(&self) -> Result<Report, CallError> {
        self.dispatcher
            .invoke(OperationInfo::new(Self::TARGET, "produce"), || {
                tracing::info!("fetching the report");
                thread::sleep(self.produce_delay);
                tracing::info!("report created");
                Ok(Report {
                    body: "quarterly totals".to_owned(),
                })
            })
    }

    /// Formats a raw report after the configured delay.
    ///
    /// # Errors
    ///
    /// Propagates advice failures; the stage itself cannot fail.
    pub fn format(&self, report: Report) -> Result<FormattedReport, CallError> {
        self.dispatcher
            .invoke(OperationInfo::new(Self::TARGET, "format"), || {
                tracing::info!("formatting the report");
                thread::sleep(self.format_delay);
                tracing::info!("report formatted");
                Ok(FormattedReport {
                    body: format!("== {} ==", report.body),
                })
            })
    }

    /// Persists a formatted report after the configured delay.
    ///
    /// # Errors
    ///
    /// Propagates advice failures; the stage itself cannot fail.
    pub fn persist(&self, report: FormattedReport) -> Result<(), CallError> {
        self.dispatcher.invoke_with_args(
            OperationInfo::new(Self::TARGET, "persist"),
            vec![report.body.clone()],
            || {
                tracing::info!(body = %report.body, "saving the report");
                thread::sleep(self.persist_delay);
                tracing::info!("report saved");
                Ok(())
            },
        )
    }

    /// Runs produce → format → persist.
    ///
    /// # Errors
    ///
    /// Propagates the first failing stage's error.
    pub fn run(&self) -> Result<(), CallError> {
        let report = self.produce()?;
        let formatted = self.format(report)?;
        self.persist(formatted)
    }
}
