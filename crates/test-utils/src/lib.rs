//! In-memory doubles of the wallet and the WavePortal contract.

#![warn(unused_crate_dependencies, unreachable_pub)]

mod portal;
pub use portal::{MockPortal, SentWave};

mod wallet;
pub use wallet::MockWallet;

use futures::{StreamExt, stream::BoxStream};
use tokio::sync::broadcast;

/// Initializes tracing for tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Follows a broadcast channel, skipping over lagged items, until it closes.
fn broadcast_stream<T: Clone + Send + 'static>(rx: broadcast::Receiver<T>) -> BoxStream<'static, T> {
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(item) => return Some((item, rx)),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .boxed()
}
