//! Bounded concurrent fan-out, shared by the categorizer (C3) and edge
//! verifier (C5): "Up to W workers... fan out across tools/candidates"
//! (spec.md §5).

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Run `f` once per item in `items`, with at most `max_workers` futures
/// in flight at a time. Order of the returned results matches the input
/// order (output order is irrelevant to correctness per spec.md §4.5,
/// but a stable order keeps tests simple).
pub async fn bounded_for_each<T, F, Fut, R>(items: Vec<T>, max_workers: usize, f: F) -> Vec<R>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = R> + Send,
    R: Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let f = Arc::new(f);

    let tasks = items.into_iter().map(|item| {
        let semaphore = Arc::clone(&semaphore);
        let f = Arc::clone(&f);
        async move {
            let _permit = semaphore.acquire().await.expect("worker semaphore closed unexpectedly");
            f(item).await
        }
    });

    join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn respects_worker_ceiling() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let items: Vec<usize> = (0..20).collect();
        let in_flight_cl = Arc::clone(&in_flight);
        let max_seen_cl = Arc::clone(&max_seen);

        let results = bounded_for_each(items, 4, move |i| {
            let in_flight = Arc::clone(&in_flight_cl);
            let max_seen = Arc::clone(&max_seen_cl);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                i * 2
            }
        })
        .await;

        assert_eq!(results.len(), 20);
        assert!(max_seen.load(Ordering::SeqCst) <= 4);
    }
}
