//! Advice-kinds demo: every advice kind wired over the employee directory.
//!
//! Looks up employee 8, then deliberately looks up the `-1` sentinel so the
//! after-throwing advice fires; the resulting error is checked and discarded.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p weft_demo --bin advice_kinds
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use weft_advice::{AdviceRegistry, Dispatcher, Selector};
use weft_demo::aspects::install_call_trace;
use weft_demo::employees::EmployeeDirectory;

fn main() -> ExitCode {
    init_tracing();

    if let Err(error) = run() {
        tracing::error!(error = %error, "advice_kinds demo failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), Box<dyn core::error::Error>> {
    let registry = Arc::new(AdviceRegistry::new());
    install_call_trace(&registry, &Selector::target(EmployeeDirectory::TARGET))?;

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry)));
    let directory = EmployeeDirectory::new(dispatcher);

    let employee = directory.find_by_id(8)?;
    tracing::info!(id = employee.id, "lookup succeeded");

    // The sentinel lookup must fail; the error itself is only logged.
    match directory.find_by_id(-1) {
        Err(error) => tracing::info!(error = %error, "sentinel lookup failed as expected"),
        Ok(_) => return Err("sentinel lookup unexpectedly succeeded".into()),
    }

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
