use crate::layer::DispatchLayer;
use crate::logger::Logger;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::Registry;

/// Route `tracing` events through `logger`.
///
/// **Parameters**
/// - `logger`: resolved [`Logger`] whose gate and sinks receive every
///   `tracing` event in the process.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`DispatchLayer`] as the global
/// default subscriber, so `tracing::info!` and friends end up in the same
/// sinks as direct [`Logger`] calls. Events emitted by this crate itself are
/// not routed.
///
/// **Returns**
/// - `Err(..)` if a global subscriber is already set.
pub fn init_tracing(logger: Logger) -> Result<(), TryInitError> {
    Registry::default().with(DispatchLayer::new(logger)).try_init()
}
