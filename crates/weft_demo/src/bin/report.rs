//! Report demo: a duration-measuring around advice over the report pipeline.
//!
//! Runs produce → format → persist, each stage logged with its measured
//! duration, then fetches one more report so the advice fires again on its
//! own.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p weft_demo --bin report
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use weft_advice::{AdviceRegistry, Dispatcher, Selector};
use weft_demo::aspects::install_latency_logger;
use weft_demo::report::ReportPipeline;

fn main() -> ExitCode {
    init_tracing();

    if let Err(error) = run() {
        tracing::error!(error = %error, "report demo failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), Box<dyn core::error::Error>> {
    let registry = Arc::new(AdviceRegistry::new());
    install_latency_logger(&registry, &Selector::target(ReportPipeline::TARGET))?;

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry)));
    let pipeline = ReportPipeline::new(dispatcher);

    pipeline.run()?;

    // One extra fetch, so the advice measures a lone stage as well.
    let report = pipeline.produce()?;
    tracing::info!(body = %report.body, "extra report fetched");

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}
