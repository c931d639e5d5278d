#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

use builddag::config::{BuildConfig, BuildContext, Configuration};
use builddag::graph::GraphBuilder;
use builddag::proc::mock::MockRunner;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// A fixed configuration for tests that never touch the real toolchain.
pub fn test_config() -> BuildConfig {
    BuildConfig {
        configuration: Configuration::Debug,
        root_dir: ".".into(),
        source_dir: "src".into(),
        output_dir: "output".into(),
        settings_path: "appsettings.json".into(),
        solution: None,
        pack_project: None,
        package_id: "PowerUp.Watcher".into(),
        mainline_branch: "main".into(),
    }
}

/// Context backed by a [`MockRunner`]; the returned runner shares state
/// with the boxed one inside the context, so tests can script and inspect
/// commands through it.
pub fn mock_context() -> (MockRunner, BuildContext) {
    let runner = MockRunner::new();
    let ctx = BuildContext::new(test_config(), Box::new(runner.clone()));
    (runner, ctx)
}

/// Shared execution log written to by recording targets.
pub type RunLog = Rc<RefCell<Vec<String>>>;

pub fn run_log() -> RunLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Declare a target whose action appends its own name to `log`.
pub fn recording_target(builder: &mut GraphBuilder, name: &str, log: &RunLog) {
    let log = Rc::clone(log);
    let recorded = name.to_string();
    builder.target(name).executes(move |_ctx| {
        log.borrow_mut().push(recorded.clone());
        Ok(())
    });
}

/// Position of `name` in `order`, panicking if absent.
pub fn position(order: &[String], name: &str) -> usize {
    order
        .iter()
        .position(|n| n == name)
        .unwrap_or_else(|| panic!("'{name}' not found in {order:?}"))
}
