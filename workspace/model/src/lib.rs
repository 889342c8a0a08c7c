pub mod auth;
pub mod entities;
pub mod error;
pub mod manager;
pub mod password;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use error::{AccountError, Result};
pub use manager::{NewUser, UserManager};

// Re-export tracing for use in this crate
pub use tracing;

// Initialize tracing if not already initialized
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::format::FmtSpan;

    // Log to stderr so command output on stdout stays machine readable.
    // The log level can be controlled via the RUST_LOG environment variable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
}
