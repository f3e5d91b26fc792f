//! The firing strategies.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, trace, warn};

use crate::config::{DispatcherConfig, FireStrategy};
use crate::provider::TokioPromises;
use crate::registry::ListenerRegistry;
use crate::traits::{Listener, Promise, PromiseProvider, Reply};

/// Promise-aware event dispatcher.
///
/// Listeners are registered per event name, then an event is fired with a
/// payload `A`. Every fire operation settles with the final payload once
/// its strategy has run all listeners of that event:
///
/// - `fire_concurrently`: all listeners invoked up front with clones of the
///   same payload; settles with the original payload.
/// - `fire_sequentially`: one at a time in registration order, each with a
///   clone of the original payload; settles with the original payload.
/// - `fire_sequentially_propagating_responses`: one at a time, each with the
///   latest replacement payload; settles with the last replacement.
/// - `fire`: whichever of the above `DispatcherConfig::default_strategy` names.
///
/// An event with no listeners settles with the payload untouched, without
/// going through the promise provider. A listener error rejects the whole
/// fire call with that same error; sequential strategies stop there.
pub struct Dispatcher<A, O = (), P = TokioPromises> {
    registry: ListenerRegistry<O, A>,
    owner: O,
    provider: P,
    config: DispatcherConfig,
}

impl<A> Dispatcher<A, (), TokioPromises>
where
    A: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::from_parts((), TokioPromises, DispatcherConfig::default())
    }
}

impl<A> Default for Dispatcher<A, (), TokioPromises>
where
    A: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, O> Dispatcher<A, O, TokioPromises>
where
    A: Clone + Send + 'static,
    O: Send + Sync + 'static,
{
    /// A dispatcher whose listeners receive `owner` as their context.
    pub fn with_owner(owner: O) -> Self {
        Self::from_parts(owner, TokioPromises, DispatcherConfig::default())
    }
}

impl<A, O, P> Dispatcher<A, O, P>
where
    A: Clone + Send + 'static,
    O: Send + Sync + 'static,
    P: PromiseProvider,
{
    pub fn from_parts(owner: O, provider: P, config: DispatcherConfig) -> Self {
        Self {
            registry: ListenerRegistry::new(),
            owner,
            provider,
            config,
        }
    }

    /// Swap the promise provider. Listeners registered so far are kept.
    pub fn with_provider<Q: PromiseProvider>(self, provider: Q) -> Dispatcher<A, O, Q> {
        Dispatcher {
            registry: self.registry,
            owner: self.owner,
            provider,
            config: self.config,
        }
    }

    pub fn with_default_strategy(mut self, strategy: FireStrategy) -> Self {
        self.config.default_strategy = strategy;
        self
    }

    /// Attach `listener` to `event_name`. Chainable.
    pub fn register(
        &mut self,
        event_name: impl Into<String>,
        listener: impl Listener<O, A>,
    ) -> &mut Self {
        self.registry.register(event_name, listener);
        self
    }

    pub fn listeners_for(&self, event_name: &str) -> &[Arc<dyn Listener<O, A>>] {
        self.registry.listeners_for(event_name)
    }

    pub fn listener_count(&self, event_name: &str) -> usize {
        self.registry.listener_count(event_name)
    }

    pub fn registry(&self) -> &ListenerRegistry<O, A> {
        &self.registry
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn default_strategy(&self) -> FireStrategy {
        self.config.default_strategy
    }

    /// Fire with the configured default strategy.
    pub async fn fire(&self, event_name: &str, args: A) -> Result<A> {
        self.fire_with(self.config.default_strategy, event_name, args)
            .await
    }

    pub async fn fire_with(&self, strategy: FireStrategy, event_name: &str, args: A) -> Result<A> {
        match strategy {
            FireStrategy::Concurrent => self.fire_concurrently(event_name, args).await,
            FireStrategy::Sequential => self.fire_sequentially(event_name, args).await,
            FireStrategy::SequentialPropagating => {
                self.fire_sequentially_propagating_responses(event_name, args)
                    .await
            }
        }
    }

    /// Invoke every listener before awaiting any of them.
    ///
    /// Replacement payloads are ignored; shared handles inside the payload
    /// carry side effects back to the caller. On rejection, listeners that
    /// are still running are left to finish or not as the provider decides.
    pub async fn fire_concurrently(&self, event_name: &str, args: A) -> Result<A> {
        let listeners = self.registry.listeners_for(event_name);
        if listeners.is_empty() {
            trace!(event = event_name, "No listeners, settling with payload as-is");
            return Ok(args);
        }

        debug!(
            event = event_name,
            listeners = listeners.len(),
            strategy = %FireStrategy::Concurrent,
            "Firing event"
        );

        let promises: Vec<Promise<Option<A>>> = listeners
            .iter()
            .enumerate()
            .map(|(index, listener)| {
                trace!(event = event_name, index, "Invoking listener");
                self.settle(listener.invoke(&self.owner, args.clone()))
            })
            .collect();

        if let Err(err) = self.provider.all(promises).await {
            warn!(event = event_name, error = %err, "Listener rejected, event failed");
            return Err(err);
        }

        Ok(args)
    }

    /// Invoke listeners one at a time, each with the original payload.
    pub async fn fire_sequentially(&self, event_name: &str, args: A) -> Result<A> {
        let listeners = self.registry.listeners_for(event_name);
        if listeners.is_empty() {
            trace!(event = event_name, "No listeners, settling with payload as-is");
            return Ok(args);
        }

        debug!(
            event = event_name,
            listeners = listeners.len(),
            strategy = %FireStrategy::Sequential,
            "Firing event"
        );

        for (index, listener) in listeners.iter().enumerate() {
            trace!(event = event_name, index, "Invoking listener");
            if let Err(err) = self.settle(listener.invoke(&self.owner, args.clone())).await {
                warn!(event = event_name, index, error = %err, "Listener rejected, chain stopped");
                return Err(err);
            }
        }

        Ok(args)
    }

    /// Invoke listeners one at a time, threading replacement payloads.
    ///
    /// A listener that replies with no payload passes the one it received
    /// on to the next listener.
    pub async fn fire_sequentially_propagating_responses(
        &self,
        event_name: &str,
        args: A,
    ) -> Result<A> {
        let listeners = self.registry.listeners_for(event_name);
        if listeners.is_empty() {
            trace!(event = event_name, "No listeners, settling with payload as-is");
            return Ok(args);
        }

        debug!(
            event = event_name,
            listeners = listeners.len(),
            strategy = %FireStrategy::SequentialPropagating,
            "Firing event"
        );

        let mut current = args;
        for (index, listener) in listeners.iter().enumerate() {
            trace!(event = event_name, index, "Invoking listener");
            match self.settle(listener.invoke(&self.owner, current.clone())).await {
                Ok(Some(next)) => current = next,
                Ok(None) => {}
                Err(err) => {
                    warn!(event = event_name, index, error = %err, "Listener rejected, chain stopped");
                    return Err(err);
                }
            }
        }

        Ok(current)
    }

    /// Normalize a reply into a promise. Plain values go through the
    /// provider's `resolve`.
    fn settle(&self, reply: Reply<A>) -> Promise<Option<A>> {
        match reply {
            Reply::Ready(result) => self.provider.resolve(result),
            Reply::Pending(promise) => promise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::from_fn;
    use crate::provider::InlinePromises;

    #[tokio::test]
    async fn fire_uses_configured_default() {
        let mut dispatcher: Dispatcher<String> =
            Dispatcher::new().with_default_strategy(FireStrategy::SequentialPropagating);
        dispatcher.register("e", from_fn(|_: &(), s: String| Ok(Some(s + "!"))));

        assert_eq!(dispatcher.default_strategy(), FireStrategy::SequentialPropagating);
        assert_eq!(dispatcher.fire("e", "hi".into()).await.unwrap(), "hi!");
    }

    #[tokio::test]
    async fn swapping_provider_keeps_listeners() {
        let mut dispatcher: Dispatcher<u32> = Dispatcher::new();
        dispatcher.register("e", from_fn(|_: &(), n: u32| Ok(Some(n + 1))));

        let dispatcher = dispatcher.with_provider(InlinePromises);
        assert_eq!(dispatcher.listener_count("e"), 1);
        assert_eq!(
            dispatcher
                .fire_sequentially_propagating_responses("e", 1)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn fire_with_dispatches_each_strategy() {
        let mut dispatcher: Dispatcher<u32> = Dispatcher::new();
        dispatcher
            .register("e", from_fn(|_: &(), n: u32| Ok(Some(n * 10))))
            .register("e", from_fn(|_: &(), n: u32| Ok(Some(n + 1))));

        assert_eq!(dispatcher.fire_with(FireStrategy::Concurrent, "e", 2).await.unwrap(), 2);
        assert_eq!(dispatcher.fire_with(FireStrategy::Sequential, "e", 2).await.unwrap(), 2);
        assert_eq!(
            dispatcher
                .fire_with(FireStrategy::SequentialPropagating, "e", 2)
                .await
                .unwrap(),
            21
        );
    }
}
