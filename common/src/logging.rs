//! Common logging initializer
//!

use std::path::PathBuf;

use eyre::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

/// Default filter for a given number of `-v`, used when `RUST_LOG` is not set.
///
pub fn verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Set up the global `tracing` subscriber.
///
/// - filters come from `RUST_LOG`, or from `verbose` if unset
/// - `use_tree` selects the hierarchical output instead of the compact one
/// - `use_file` adds an hourly-rotated log file in that directory
///
pub fn init_logging(
    name: &'static str,
    verbose: u8,
    use_tree: bool,
    use_file: Option<PathBuf>,
) -> Result<()> {
    // Load filters from environment
    //
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity(verbose)));

    // Do we want hierarchical output?
    //
    let (tree, compact) = if use_tree {
        let tree = HierarchicalLayer::new(2)
            .with_ansi(true)
            .with_span_retrace(true)
            .with_span_modes(true)
            .with_targets(true)
            .with_verbose_entry(true)
            .with_verbose_exit(true)
            .with_bracketed_fields(true);
        (Some(tree), None)
    } else {
        let fmt = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();
        (None, Some(fmt))
    };

    // Log to file?
    //
    let file = use_file.map(|dir| {
        // Basic append-only rolling file for all traces.
        //
        let file_appender = tracing_appender::rolling::hourly(dir, name);
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender)
    });

    // Combine filters & exporters
    //
    tracing_subscriber::registry()
        .with(filter)
        .with(tree)
        .with(compact)
        .with(file)
        .try_init()?;

    Ok(())
}
