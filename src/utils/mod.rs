use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "finboard=info";

/// Installs the global fmt subscriber. `RUST_LOG` directives are honoured and the
/// finboard crates log at `info` unless overridden. Calling it again is a no-op.
pub fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = DEFAULT_DIRECTIVE.parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    // Another subscriber may already be installed by the host; keep it.
    let _ = fmt().with_env_filter(filter).try_init();
}
