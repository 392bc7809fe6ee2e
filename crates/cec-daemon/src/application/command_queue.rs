//! Thread-safe command FIFO with a single consumer.
//!
//! # Why a queue? (for beginners)
//!
//! The CEC driver calls us back on threads it owns, at any time, possibly
//! from several threads at once.  If those callbacks touched the key state or
//! the connection state directly we would need locks around everything and
//! would still have to reason about interleavings.
//!
//! Instead every callback only builds a [`Command`] and pushes it here.  One
//! thread (the supervisor loop) pops commands and is the only code that ever
//! mutates daemon state.  The queue is the single piece of shared mutable
//! state, guarded by one `Mutex` + `Condvar` pair.
//!
//! # Shutdown flag
//!
//! While the adapter is being closed its driver may still fire callbacks.
//! After [`CommandQueue::shutdown`] every [`CommandQueue::push`] is silently
//! dropped so a late callback cannot resurrect a loop that already stopped.
//! Only a final stop shuts the queue down.  A restart keeps it open, so a
//! signal delivered while the adapter is reopened is never lost, and uses
//! [`CommandQueue::retain`] to drop what the old connection left behind.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use cec_core::Command;
use tracing::trace;

/// Idle time after which the consumer wakes up to ping the adapter.
pub const DEFAULT_WATCHDOG_INTERVAL: Duration = Duration::from_secs(43);

#[derive(Default)]
struct QueueState {
    commands: VecDeque<Command>,
    shut_down: bool,
}

/// FIFO of [`Command`]s shared between producers and the consumer thread.
#[derive(Default)]
pub struct CommandQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `command`.  Never waits for the consumer.
    ///
    /// Does nothing once [`shutdown`](Self::shutdown) has been called.
    pub fn push(&self, command: Command) {
        let mut state = self.lock();
        if state.shut_down {
            trace!(?command, "queue shut down; dropping command");
            return;
        }
        state.commands.push_back(command);
        drop(state);
        self.ready.notify_one();
    }

    /// Removes and returns everything currently queued, oldest first.
    pub fn pop_all(&self) -> Vec<Command> {
        self.lock().commands.drain(..).collect()
    }

    /// Waits up to `timeout` for a command and removes it.
    ///
    /// Returns `None` when the wait ends with nothing queued, whether by
    /// timeout, spurious wakeup, or shutdown.  The caller treats that as a
    /// watchdog tick.
    pub fn wait_and_pop(&self, timeout: Duration) -> Option<Command> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if let Some(command) = state.commands.pop_front() {
                return Some(command);
            }
            if state.shut_down {
                return None;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, result) = self
                .ready
                .wait_timeout(state, remaining)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state = guard;
            if result.timed_out() && state.commands.is_empty() {
                return None;
            }
        }
    }

    /// Keeps only the queued commands for which `keep` returns `true`, in
    /// order.  Returns how many were dropped.
    pub fn retain(&self, mut keep: impl FnMut(&Command) -> bool) -> usize {
        let mut state = self.lock();
        let before = state.commands.len();
        state.commands.retain(|command| keep(command));
        before - state.commands.len()
    }

    /// Stops accepting commands and wakes the consumer.
    pub fn shutdown(&self) {
        self.lock().shut_down = true;
        self.ready.notify_all();
    }

    /// Accepts commands again and forgets anything left over from the
    /// previous cycle.
    pub fn reopen(&self) {
        let mut state = self.lock();
        state.shut_down = false;
        state.commands.clear();
    }

    pub fn is_shut_down(&self) -> bool {
        self.lock().shut_down
    }

    pub fn len(&self) -> usize {
        self.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A producer panicking mid-push leaves the deque intact, so keep going.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cec_core::UserControlCode;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_pop_all_returns_commands_in_push_order() {
        // Arrange
        let queue = CommandQueue::new();
        queue.push(Command::Standby);
        queue.push(Command::BecomeActive);
        queue.push(Command::Exit);

        // Act
        let drained = queue.pop_all();

        // Assert
        assert_eq!(
            drained,
            vec![Command::Standby, Command::BecomeActive, Command::Exit]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_wait_and_pop_returns_immediately_when_command_queued() {
        let queue = CommandQueue::new();
        queue.push(Command::Restart);

        let started = Instant::now();
        let popped = queue.wait_and_pop(Duration::from_secs(10));

        assert_eq!(popped, Some(Command::Restart));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_and_pop_times_out_on_empty_queue() {
        let queue = CommandQueue::new();

        let started = Instant::now();
        let popped = queue.wait_and_pop(Duration::from_millis(30));

        assert_eq!(popped, None);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_and_pop_wakes_on_push_from_other_thread() {
        // Arrange
        let queue = Arc::new(CommandQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                queue.push(Command::Exit);
            })
        };

        // Act
        let popped = queue.wait_and_pop(Duration::from_secs(10));
        producer.join().unwrap();

        // Assert
        assert_eq!(popped, Some(Command::Exit));
    }

    #[test]
    fn test_push_after_shutdown_is_ignored() {
        let queue = CommandQueue::new();
        queue.shutdown();

        queue.push(Command::Standby);

        assert!(queue.is_empty());
        assert!(queue.is_shut_down());
    }

    #[test]
    fn test_shutdown_wakes_waiting_consumer() {
        let queue = Arc::new(CommandQueue::new());
        let stopper = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                queue.shutdown();
            })
        };

        let started = Instant::now();
        let popped = queue.wait_and_pop(Duration::from_secs(10));
        stopper.join().unwrap();

        assert_eq!(popped, None);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_reopen_clears_flag_and_stale_commands() {
        // Arrange
        let queue = CommandQueue::new();
        queue.push(Command::Restart);
        queue.shutdown();

        // Act
        queue.reopen();
        queue.push(Command::Exit);

        // Assert
        assert!(!queue.is_shut_down());
        assert_eq!(queue.pop_all(), vec![Command::Exit]);
    }

    #[test]
    fn test_retain_keeps_matching_commands_in_order() {
        // Arrange
        let queue = CommandQueue::new();
        queue.push(Command::KeyPress(UserControlCode::UP));
        queue.push(Command::Exit);
        queue.push(Command::Restart);
        queue.push(Command::Exit);

        // Act
        let dropped = queue.retain(|command| *command == Command::Exit);

        // Assert
        assert_eq!(dropped, 2);
        assert_eq!(queue.pop_all(), vec![Command::Exit, Command::Exit]);
    }

    #[test]
    fn test_concurrent_producers_keep_their_own_order() {
        // Arrange
        const PRODUCERS: u8 = 8;
        const PER_PRODUCER: u8 = 200;
        let queue = Arc::new(CommandQueue::new());

        // Act: each producer pushes its id as the key code with a rising
        // sequence encoded in the held duration.
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|id| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for seq in 0..PER_PRODUCER {
                        queue.push(Command::KeyEvent(cec_core::Keypress::released(
                            UserControlCode(id),
                            Duration::from_millis(u64::from(seq) + 1),
                        )));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Assert
        let drained = queue.pop_all();
        assert_eq!(drained.len(), usize::from(PRODUCERS) * usize::from(PER_PRODUCER));
        let mut last_seen = [Duration::ZERO; PRODUCERS as usize];
        for command in drained {
            let Command::KeyEvent(key) = command else {
                panic!("unexpected command {command:?}");
            };
            let slot = &mut last_seen[usize::from(key.keycode.0)];
            assert!(key.duration > *slot, "producer {} reordered", key.keycode);
            *slot = key.duration;
        }
    }
}
