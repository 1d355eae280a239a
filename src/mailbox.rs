use std::collections::VecDeque;
use std::fmt;

use parking_lot::{Condvar, Mutex};

/// Error returned by [`Mailbox::recv`] once the mailbox has been closed and
/// every buffered value drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvError;

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "receiving on a closed mailbox")
    }
}

impl std::error::Error for RecvError {}

struct Inner<T> {
    pending: VecDeque<T>,
    closed: bool,
}

/// Thread-safe collapsing mailbox: senders append values, a receiver blocks
/// until something is available and then takes the most recent value,
/// discarding everything older.
///
/// This carries current-state notifications, not an event log. A slow
/// receiver must see the freshest value, never a backlog of stale ones.
pub struct Mailbox<T> {
    inner: Mutex<Inner<T>>,
    ready: Condvar,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Mailbox {
            inner: Mutex::new(Inner {
                pending: VecDeque::new(),
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Appends a value and wakes one waiting receiver. Values sent after
    /// [`close`](Self::close) are discarded.
    pub fn send(&self, value: T) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.pending.push_back(value);
        drop(inner);
        self.ready.notify_one();
    }

    /// Blocks until a value is available, then returns the most recently
    /// sent one and clears the rest of the buffer. Returns `Err` once the
    /// mailbox is closed and empty.
    pub fn recv(&self) -> Result<T, RecvError> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(latest) = inner.pending.pop_back() {
                inner.pending.clear();
                return Ok(latest);
            }
            if inner.closed {
                return Err(RecvError);
            }
            self.ready.wait(&mut inner);
        }
    }

    /// Marks the mailbox closed and wakes every blocked receiver. Buffered
    /// values can still be drained before `recv` starts reporting errors.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        drop(inner);
        self.ready.notify_all();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().pending.is_empty()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Mailbox::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crossbeam_channel::unbounded;

    use super::*;
    use crate::phase::Phase;

    #[test]
    fn single_send_receive_round_trip() {
        let mailbox = Mailbox::new();
        mailbox.send(Phase::Green);
        assert_eq!(mailbox.recv(), Ok(Phase::Green));
        assert!(mailbox.is_empty());
    }

    #[test]
    fn receive_collapses_to_the_latest_value() {
        let mailbox = Mailbox::new();
        mailbox.send(Phase::Red);
        mailbox.send(Phase::Green);
        mailbox.send(Phase::Red);

        assert_eq!(mailbox.recv(), Ok(Phase::Red));
        // The intermediate green must be gone, not waiting for the next recv.
        assert!(mailbox.is_empty());
    }

    #[test]
    fn receive_blocks_on_an_empty_mailbox_until_closed() {
        let mailbox = Arc::new(Mailbox::<Phase>::new());
        let (done_tx, done_rx) = unbounded();

        let receiver = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || {
                done_tx.send(mailbox.recv()).unwrap();
            })
        };

        // Nothing was sent, so the receiver must still be blocked.
        assert!(done_rx.recv_timeout(Duration::from_millis(200)).is_err());

        mailbox.close();
        let result = done_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("closing the mailbox should wake the receiver");
        assert_eq!(result, Err(RecvError));
        receiver.join().unwrap();
    }

    #[test]
    fn send_after_close_is_discarded() {
        let mailbox = Mailbox::new();
        mailbox.close();
        mailbox.send(Phase::Green);
        assert!(mailbox.is_empty());
        assert_eq!(mailbox.recv(), Err(RecvError));
    }

    #[test]
    fn no_missed_wakeup_under_stress() {
        for round in 0..1000 {
            let mailbox = Arc::new(Mailbox::new());
            let (done_tx, done_rx) = unbounded();

            let receiver = {
                let mailbox = Arc::clone(&mailbox);
                thread::spawn(move || {
                    done_tx.send(mailbox.recv()).unwrap();
                })
            };

            // Whether the send lands before or after the receiver starts
            // waiting, the value must come through.
            if round % 2 == 0 {
                thread::yield_now();
            }
            mailbox.send(round);

            let received = done_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("receiver hung despite a completed send");
            assert_eq!(received, Ok(round));
            receiver.join().unwrap();
        }
    }

    #[test]
    fn concurrent_senders_do_not_corrupt_the_buffer() {
        let mailbox = Arc::new(Mailbox::new());

        let senders: Vec<_> = (0..4)
            .map(|n| {
                let mailbox = Arc::clone(&mailbox);
                thread::spawn(move || {
                    for i in 0..100 {
                        mailbox.send(n * 100 + i);
                    }
                })
            })
            .collect();
        for handle in senders {
            handle.join().unwrap();
        }

        // All 400 sends happened; one recv drains every one of them.
        let last = mailbox.recv().unwrap();
        assert!(last < 400);
        assert!(mailbox.is_empty());
    }
}
