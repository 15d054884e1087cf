use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing();
        init_tracing();
        tracing::info!("subscriber installed");
    }
}
