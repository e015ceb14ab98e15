use crate::remote::transport::{Transport, TransportError};
use crate::remote::RemoteEvent;
use std::cell::Cell;
use std::io;
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Extra time the caller waits for the worker's own timeout to report back.
const REPLY_GRACE: Duration = Duration::from_millis(250);

/// Jobs waiting for the worker runtime; senders beyond this get `QueueFull`.
const JOB_QUEUE: usize = 64;

thread_local! {
    static ON_WORKER: Cell<bool> = const { Cell::new(false) };
}

/// True on a remote-capture worker thread, i.e. inside a `Transport::send`.
///
/// Anything logged there must not reach a remote sink again.
pub(crate) fn on_worker_thread() -> bool {
    ON_WORKER.with(Cell::get)
}

struct Job {
    event: RemoteEvent,
    /// The caller stops waiting at this point; the job is dropped unsent if
    /// the runtime only gets to it later.
    deadline: Instant,
    reply: std_mpsc::SyncSender<Result<(), TransportError>>,
}

/// Drives an async [`Transport`] from synchronous callers.
///
/// A dedicated thread owns a current-thread tokio runtime; every job is
/// spawned onto it and raced against its deadline. Callers block on a reply
/// channel for at most `timeout` plus a small grace, whatever the transport
/// does. Works from plain threads and from inside another tokio runtime.
pub(crate) struct TransportWorker {
    jobs: mpsc::Sender<Job>,
    timeout: Duration,
}

impl TransportWorker {
    pub(crate) fn spawn(transport: Arc<dyn Transport>, timeout: Duration) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (tx, mut rx) = mpsc::channel::<Job>(JOB_QUEUE);

        thread::Builder::new()
            .name("remote-capture".into())
            .spawn(move || {
                ON_WORKER.with(|flag| flag.set(true));
                runtime.block_on(async move {
                    while let Some(job) = rx.recv().await {
                        let transport = Arc::clone(&transport);
                        tokio::spawn(async move {
                            let result = if Instant::now() >= job.deadline {
                                Err(TransportError::Timeout(timeout))
                            } else {
                                let deadline = tokio::time::Instant::from_std(job.deadline);
                                match tokio::time::timeout_at(deadline, transport.send(&job.event)).await {
                                    Ok(result) => result,
                                    Err(_) => Err(TransportError::Timeout(timeout)),
                                }
                            };
                            // The caller may have given up already.
                            let _ = job.reply.send(result);
                        });
                    }
                });
            })?;

        Ok(TransportWorker { jobs: tx, timeout })
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `event` and wait for the outcome, bounded by the timeout.
    pub(crate) fn send(&self, event: RemoteEvent) -> Result<(), TransportError> {
        if on_worker_thread() {
            return Err(TransportError::Reentrant);
        }

        let (reply, outcome) = std_mpsc::sync_channel(1);
        let job = Job {
            event,
            deadline: Instant::now() + self.timeout,
            reply,
        };
        self.jobs.try_send(job).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => TransportError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => TransportError::Closed,
        })?;

        match outcome.recv_timeout(self.timeout + REPLY_GRACE) {
            Ok(result) => result,
            Err(std_mpsc::RecvTimeoutError::Timeout) => Err(TransportError::Timeout(self.timeout)),
            Err(std_mpsc::RecvTimeoutError::Disconnected) => Err(TransportError::Closed),
        }
    }
}
