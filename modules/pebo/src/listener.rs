//! Closure adapters for the `Listener` trait.

use std::future::Future;
use std::marker::PhantomData;

use anyhow::Result;

use crate::traits::{Listener, Reply};

/// A synchronous listener backed by a closure.
pub struct FnListener<F, O, A> {
    f: F,
    _phantom: PhantomData<fn(&O, A)>,
}

/// An asynchronous listener backed by a closure returning a future.
pub struct AsyncFnListener<F, O, A> {
    f: F,
    _phantom: PhantomData<fn(&O, A)>,
}

/// Wrap a synchronous closure.
///
/// ```ignore
/// let add_basil = from_fn(|owner: &Pizzaiolo, mut order: Order| {
///     order.ingredients.push_str(" - basil");
///     Ok(Some(order))
/// });
/// ```
pub fn from_fn<F, O, A>(f: F) -> FnListener<F, O, A>
where
    F: Fn(&O, A) -> Result<Option<A>> + Send + Sync + 'static,
{
    FnListener {
        f,
        _phantom: PhantomData,
    }
}

/// Wrap a closure that returns a future.
///
/// The closure body runs when the listener is invoked; the future it
/// returns is awaited by the dispatcher. Anything the future needs from the
/// owner must be copied out before it is built.
pub fn from_async_fn<F, Fut, O, A>(f: F) -> AsyncFnListener<F, O, A>
where
    F: Fn(&O, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<A>>> + Send + 'static,
{
    AsyncFnListener {
        f,
        _phantom: PhantomData,
    }
}

impl<F, O, A> Listener<O, A> for FnListener<F, O, A>
where
    F: Fn(&O, A) -> Result<Option<A>> + Send + Sync + 'static,
    O: 'static,
    A: 'static,
{
    fn invoke(&self, owner: &O, args: A) -> Reply<A> {
        Reply::from((self.f)(owner, args))
    }
}

impl<F, Fut, O, A> Listener<O, A> for AsyncFnListener<F, O, A>
where
    F: Fn(&O, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<A>>> + Send + 'static,
    O: 'static,
    A: 'static,
{
    fn invoke(&self, owner: &O, args: A) -> Reply<A> {
        Reply::Pending(Box::pin((self.f)(owner, args)))
    }
}
