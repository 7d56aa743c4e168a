use std::sync::Once;

use env_logger::{Builder, Env};

/// Crates whose output is shown at `info` when nothing else is asked for. Everything else
/// (glutin, winit) stays at `warn`.
const DEFAULT_FILTER: &str = "warn,glpractice=info,shaders=info";

static INIT: Once = Once::new();

/// Installs the global logger. `--log` wins over `RUST_LOG`; with neither, `DEFAULT_FILTER`.
/// Calls after the first are ignored.
pub fn init_logging(cli_filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = match cli_filter {
            Some(filter) => {
                let mut builder = Builder::new();
                builder.parse_filters(filter);
                builder
            }
            None => Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)),
        };

        builder.format_timestamp(None).format_module_path(false).init();

        let source = if cli_filter.is_some() { "--log" } else { "RUST_LOG" };
        log::debug!("logging initialized, filter from {}", source);
    });
}
