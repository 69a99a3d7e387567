//! Work queue between the discovery walker and the worker pool
//!
//! One [`QueueSender`] feeds any number of cloned [`QueueReceiver`]s. The
//! queue closes when the sender is closed or dropped; receivers then drain
//! what is left and get `None`.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Returned when pushing into a queue whose consumers are all gone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueClosed(pub PathBuf);

/// Creates a bounded work queue of repository paths
pub fn work_queue(capacity: usize) -> (QueueSender, QueueReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        QueueSender { tx },
        QueueReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producing half of the work queue
///
/// Not `Clone`: a single producer owns the queue, so it can only close once.
#[derive(Debug)]
pub struct QueueSender {
    tx: mpsc::Sender<PathBuf>,
}

impl QueueSender {
    /// Pushes a path, waiting while the queue is full
    pub async fn push(&self, path: PathBuf) -> Result<(), QueueClosed> {
        self.tx.send(path).await.map_err(|e| QueueClosed(e.0))
    }

    /// Pushes a path from a blocking (non-async) thread
    pub fn push_blocking(&self, path: PathBuf) -> Result<(), QueueClosed> {
        self.tx.blocking_send(path).map_err(|e| QueueClosed(e.0))
    }

    /// Closes the queue; receivers drain remaining items and then see `None`
    pub fn close(self) {
        drop(self);
    }
}

/// Consuming half of the work queue, shared by all workers
#[derive(Debug, Clone)]
pub struct QueueReceiver {
    rx: Arc<Mutex<mpsc::Receiver<PathBuf>>>,
}

impl QueueReceiver {
    /// Waits for the next path
    ///
    /// Returns `None` once the queue is closed and empty.
    pub async fn recv(&self) -> Option<PathBuf> {
        self.rx.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fifo_order_with_single_consumer() {
        let (tx, rx) = work_queue(4);
        for name in ["a", "b", "c"] {
            tx.push(PathBuf::from(name)).await.unwrap();
        }
        tx.close();

        assert_eq!(rx.recv().await, Some(PathBuf::from("a")));
        assert_eq!(rx.recv().await, Some(PathBuf::from("b")));
        assert_eq!(rx.recv().await, Some(PathBuf::from("c")));
        assert_eq!(rx.recv().await, None);
        assert_eq!(rx.recv().await, None, "closed state is sticky");
    }

    #[tokio::test]
    async fn test_all_consumers_observe_close() {
        let (tx, rx) = work_queue(1);
        let consumers: Vec<_> = (0..8)
            .map(|_| {
                let rx = rx.clone();
                tokio::spawn(async move {
                    let mut seen = 0;
                    while rx.recv().await.is_some() {
                        seen += 1;
                    }
                    seen
                })
            })
            .collect();

        for i in 0..20 {
            tx.push(PathBuf::from(format!("repo-{i}"))).await.unwrap();
        }
        tx.close();

        let total: usize = tokio::time::timeout(
            Duration::from_secs(5),
            futures::future::join_all(consumers),
        )
        .await
        .expect("consumers must not block on a closed queue")
        .into_iter()
        .map(|r| r.unwrap())
        .sum();
        assert_eq!(total, 20);
    }

    #[tokio::test]
    async fn test_close_without_items_releases_waiting_consumer() {
        let (tx, rx) = work_queue(2);
        let waiter = tokio::spawn(async move { rx.recv().await });
        tx.close();
        let got = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn test_push_after_receivers_dropped_fails() {
        let (tx, rx) = work_queue(2);
        drop(rx);
        let err = tx.push(PathBuf::from("x")).await.unwrap_err();
        assert_eq!(err, QueueClosed(PathBuf::from("x")));
    }

    #[test]
    fn test_push_blocking_from_plain_thread() {
        let (tx, rx) = work_queue(8);
        std::thread::spawn(move || {
            tx.push_blocking(PathBuf::from("one")).unwrap();
            tx.push_blocking(PathBuf::from("two")).unwrap();
        })
        .join()
        .unwrap();

        let rt = tokio::runtime::Runtime::new().unwrap();
        let drained = rt.block_on(async {
            let mut out = Vec::new();
            while let Some(p) = rx.recv().await {
                out.push(p);
            }
            out
        });
        assert_eq!(drained, vec![PathBuf::from("one"), PathBuf::from("two")]);
    }
}
