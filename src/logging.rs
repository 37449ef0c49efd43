use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the diagnostic subscriber for the binary.
///
/// Events go to stderr so they never interleave with tables on stdout.
/// `RUST_LOG` wins over the default directive when it parses.
pub fn init(verbose: bool) {
    let directive = if verbose {
        "sporlapi=debug"
    } else {
        "sporlapi=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}
