use std::env::VarError;
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Logs to stdout: relay requests at `debug` (`trace` adds bodies and signatures),
/// the demo itself at every level, everything else at `warn`.
///
/// `RUST_LOG` replaces that filter, e.g. `RUST_LOG=flashbot_rs=trace,send_bundle=info`.
pub fn init_tracing() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(err) if unset(&err) => {
            EnvFilter::new(format!("warn,flashbot_rs=debug,{}", demo_name()))
        }
        Err(err) => panic!("invalid RUST_LOG: {err}"),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn unset(err: &tracing_subscriber::filter::FromEnvError) -> bool {
    matches!(
        err.source().and_then(|source| source.downcast_ref::<VarError>()),
        Some(VarError::NotPresent)
    )
}

/// Stem of the running example binary, which is also its log target.
fn demo_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem()?.to_str().map(str::to_owned))
        .unwrap_or_default()
}
