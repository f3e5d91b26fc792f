//! Core traits for the dispatcher.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;

/// A boxed, sendable future that settles with `T` or rejects with an error.
pub type Promise<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// What a listener hands back when invoked.
///
/// Synchronous listeners answer with `Ready`, asynchronous ones with
/// `Pending`. In both cases `None` means the listener produced no
/// replacement payload.
pub enum Reply<A> {
    Ready(Result<Option<A>>),
    Pending(Promise<Option<A>>),
}

impl<A> Reply<A> {
    /// A synchronous reply that replaces the payload.
    pub fn replace(args: A) -> Self {
        Reply::Ready(Ok(Some(args)))
    }

    /// A synchronous reply that leaves the payload alone.
    pub fn unchanged() -> Self {
        Reply::Ready(Ok(None))
    }

    /// A synchronous failure.
    pub fn reject(err: impl Into<anyhow::Error>) -> Self {
        Reply::Ready(Err(err.into()))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Reply::Pending(_))
    }
}

impl<A> From<Result<Option<A>>> for Reply<A> {
    fn from(result: Result<Option<A>>) -> Self {
        Reply::Ready(result)
    }
}

/// A function attached to an event name.
///
/// `owner` is the context value of the dispatcher the listener was
/// registered on. Whatever runs inside `invoke` runs at invocation time;
/// work deferred into a `Reply::Pending` future runs when it is polled.
pub trait Listener<O, A>: Send + Sync + 'static {
    fn invoke(&self, owner: &O, args: A) -> Reply<A>;
}

impl<O, A, L: Listener<O, A> + ?Sized> Listener<O, A> for Arc<L> {
    fn invoke(&self, owner: &O, args: A) -> Reply<A> {
        (**self).invoke(owner, args)
    }
}

/// The promise primitives the dispatcher builds on.
///
/// `resolve` lifts a plain value into a promise. `all` settles once every
/// promise has resolved, keeping input order, and rejects with the first
/// rejection. Implemented by `TokioPromises` (default) and
/// `InlinePromises`; also implemented for `Arc<P>` so a provider can be
/// shared for assertions.
pub trait PromiseProvider: Send + Sync + 'static {
    fn resolve<T: Send + 'static>(&self, value: Result<T>) -> Promise<T>;

    fn all<T: Send + 'static>(&self, promises: Vec<Promise<T>>) -> Promise<Vec<T>>;
}

impl<P: PromiseProvider> PromiseProvider for Arc<P> {
    fn resolve<T: Send + 'static>(&self, value: Result<T>) -> Promise<T> {
        (**self).resolve(value)
    }

    fn all<T: Send + 'static>(&self, promises: Vec<Promise<T>>) -> Promise<Vec<T>> {
        (**self).all(promises)
    }
}
