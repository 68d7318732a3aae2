mod config;
mod mock_tx;
mod tracing;

pub use config::*;
pub use mock_tx::*;
pub use tracing::*;
