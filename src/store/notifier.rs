//! Single background worker running subscriber notifications.

use crossbeam_channel::{unbounded, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tracing::{trace, warn};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// FIFO task queue drained by exactly one thread.
///
/// Tasks run one at a time in submission order. The worker exits once the
/// `Notifier` is dropped and the queue is drained.
pub(crate) struct Notifier {
    tx: Sender<Task>,
}

impl Notifier {
    pub(crate) fn spawn(name: &str) -> std::io::Result<Self> {
        let (tx, rx) = unbounded::<Task>();
        let worker = name.to_string();

        thread::Builder::new().name(name.to_string()).spawn(move || {
            trace!(worker = %worker, "notification worker started");
            for task in rx {
                if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                    warn!(worker = %worker, "subscriber panicked during notification");
                }
            }
            trace!(worker = %worker, "notification worker stopped");
        })?;

        Ok(Self { tx })
    }

    pub(crate) fn submit<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // The receiver lives as long as the worker, which only stops after
        // every sender is gone.
        if self.tx.send(Box::new(task)).is_err() {
            warn!("notification worker is gone, dropping task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::RecvTimeoutError;
    use std::time::Duration;

    #[test]
    fn tasks_run_in_submission_order() {
        let notifier = Notifier::spawn("test-order").unwrap();
        let (tx, rx) = unbounded();

        for i in 0..100 {
            let tx = tx.clone();
            notifier.submit(move || tx.send(i).unwrap());
        }

        let received: Vec<i32> = (0..100)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        assert_eq!(received, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn tasks_run_on_the_named_worker() {
        let notifier = Notifier::spawn("named-worker").unwrap();
        let (tx, rx) = unbounded();

        notifier.submit(move || {
            tx.send(thread::current().name().map(str::to_string)).unwrap();
        });

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("named-worker"));
    }

    #[test]
    fn panicking_task_does_not_stop_worker() {
        let notifier = Notifier::spawn("test-panic").unwrap();
        let (tx, rx) = unbounded();

        notifier.submit(|| panic!("subscriber failure"));
        notifier.submit(move || tx.send("still alive").unwrap());

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Ok("still alive")
        );
    }

    #[test]
    fn queued_tasks_drain_after_notifier_is_dropped() {
        let notifier = Notifier::spawn("test-drop").unwrap();
        let (tx, rx) = unbounded::<()>();

        notifier.submit(move || drop(tx));
        drop(notifier);

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
