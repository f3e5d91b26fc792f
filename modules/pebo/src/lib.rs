//! Promise-aware event dispatcher.
//!
//! Listeners are registered against event names. Firing an event returns a
//! future that settles with the (possibly transformed) payload once the
//! chosen strategy has run every listener: concurrently, sequentially with
//! the original payload, or sequentially threading each listener's reply
//! into the next.
//!
//! The payload type is opaque to the dispatcher. Plain fields behave like
//! values (each listener gets its own clone); shared handles such as
//! `Arc<Mutex<_>>` carry side effects back to the caller.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod provider;
pub mod registry;
pub mod traits;

pub use config::{DispatcherConfig, FireStrategy, FIRE_STRATEGY_ENV};
pub use dispatcher::Dispatcher;
pub use error::PeboError;
pub use listener::{from_async_fn, from_fn, AsyncFnListener, FnListener};
pub use provider::{InlinePromises, TokioPromises};
pub use registry::ListenerRegistry;
pub use traits::{Listener, Promise, PromiseProvider, Reply};
