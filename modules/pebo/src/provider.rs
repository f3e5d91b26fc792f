//! PromiseProvider implementations.

use futures::future;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::task::JoinSet;

use anyhow::Result;

use crate::error::PeboError;
use crate::traits::{Promise, PromiseProvider};

// ---------------------------------------------------------------------------
// TokioPromises (default — one task per promise)
// ---------------------------------------------------------------------------

/// Runs every promise handed to `all` as its own tokio task.
///
/// The first rejection (in completion order) rejects the aggregate. Tasks
/// still running at that point are detached, not aborted: they run to
/// completion in the background. Must be used from inside a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPromises;

impl PromiseProvider for TokioPromises {
    fn resolve<T: Send + 'static>(&self, value: Result<T>) -> Promise<T> {
        Box::pin(future::ready(value))
    }

    fn all<T: Send + 'static>(&self, promises: Vec<Promise<T>>) -> Promise<Vec<T>> {
        let count = promises.len();
        let mut set = JoinSet::new();
        for (index, promise) in promises.into_iter().enumerate() {
            set.spawn(async move { (index, promise.await) });
        }

        Box::pin(async move {
            let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
            while let Some(joined) = set.join_next().await {
                let outcome = match joined {
                    Ok((index, Ok(value))) => {
                        slots[index] = Some(value);
                        continue;
                    }
                    Ok((_, Err(err))) => err,
                    Err(join_err) => PeboError::from(join_err).into(),
                };
                set.detach_all();
                return Err(outcome);
            }
            let values: Vec<T> = slots.into_iter().flatten().collect();
            Ok(values)
        })
    }
}

// ---------------------------------------------------------------------------
// InlinePromises (runtime-agnostic — polled by the awaiting task)
// ---------------------------------------------------------------------------

/// Drives every promise inside the task that awaits the aggregate.
///
/// Needs no runtime. The first rejection (in completion order) rejects the
/// aggregate, but only after every other promise has settled: nothing is
/// left in the background to make progress once the aggregate is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlinePromises;

impl PromiseProvider for InlinePromises {
    fn resolve<T: Send + 'static>(&self, value: Result<T>) -> Promise<T> {
        Box::pin(future::ready(value))
    }

    fn all<T: Send + 'static>(&self, promises: Vec<Promise<T>>) -> Promise<Vec<T>> {
        Box::pin(async move {
            let count = promises.len();
            let mut pending: FuturesUnordered<_> = promises
                .into_iter()
                .enumerate()
                .map(|(index, promise)| async move { (index, promise.await) })
                .collect();

            let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
            let mut rejection: Option<anyhow::Error> = None;
            while let Some((index, outcome)) = pending.next().await {
                match outcome {
                    Ok(value) => slots[index] = Some(value),
                    Err(err) => {
                        rejection.get_or_insert(err);
                    }
                }
            }

            if let Some(err) = rejection {
                return Err(err);
            }
            let values: Vec<T> = slots.into_iter().flatten().collect();
            Ok(values)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn delayed(ms: u64, value: u32) -> Promise<u32> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, anyhow::Error>(value)
        })
    }

    fn failing(ms: u64, message: &'static str) -> Promise<u32> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Err::<u32, _>(anyhow::anyhow!(message))
        })
    }

    #[tokio::test]
    async fn tokio_all_keeps_input_order() {
        let values = TokioPromises
            .all(vec![delayed(30, 1), delayed(5, 2), delayed(15, 3)])
            .await
            .unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn inline_all_keeps_input_order() {
        let values = InlinePromises
            .all(vec![delayed(30, 1), delayed(5, 2), delayed(15, 3)])
            .await
            .unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn empty_all_resolves_empty() {
        assert!(TokioPromises.all::<u32>(vec![]).await.unwrap().is_empty());
        assert!(InlinePromises.all::<u32>(vec![]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn first_rejection_in_time_wins() {
        let err = TokioPromises
            .all(vec![failing(40, "slow"), failing(5, "fast"), delayed(1, 7)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "fast");
    }

    #[tokio::test]
    async fn tokio_rejection_leaves_siblings_running() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let sibling: Promise<u32> = Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(1)
        });

        let err = TokioPromises
            .all(vec![failing(1, "boom"), sibling])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn inline_rejection_drives_siblings_to_completion() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let sibling: Promise<u32> = Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(1)
        });

        let err = InlinePromises
            .all(vec![failing(1, "boom"), sibling, failing(10, "late")])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panicking_task_surfaces_as_pebo_error() {
        let exploding: Promise<u32> = Box::pin(async {
            let missing: Option<u32> = None;
            Ok::<_, anyhow::Error>(missing.expect("kaboom"))
        });
        let err = TokioPromises.all(vec![exploding]).await.unwrap_err();
        match err.downcast_ref::<PeboError>() {
            Some(PeboError::ListenerPanicked(message)) => assert_eq!(message, "kaboom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolve_lifts_plain_values() {
        assert_eq!(TokioPromises.resolve(Ok(5u32)).await.unwrap(), 5);
        assert!(InlinePromises
            .resolve::<u32>(Err(anyhow::anyhow!("nope")))
            .await
            .is_err());
    }
}
