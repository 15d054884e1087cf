use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::frame::Frame;

/// What a repeating tick wants to happen next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    /// The animated target is gone; end the loop.
    Stop,
}

/// Owned handle to a repeating animation task.
///
/// The task ends when [`AnimationLease::stop`] is called, when the lease is
/// dropped, or when its tick returns [`TickControl::Stop`]. After `stop`
/// returns no further tick runs: ticks execute under the same gate that
/// `stop` closes. A tick must therefore never stop its own lease; it returns
/// `TickControl::Stop` instead.
///
/// Must be started from within a tokio runtime.
pub struct AnimationLease {
    name: &'static str,
    live: Arc<Mutex<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl AnimationLease {
    /// Spawns `tick` every `period`. The first tick fires one period after start.
    pub fn start<F>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut(Frame) -> TickControl + Send + 'static,
    {
        let live = Arc::new(Mutex::new(true));
        let gate = Arc::clone(&live);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // `interval` yields immediately once; skip it so ticks are spaced.
            interval.tick().await;

            let mut frame = Frame::new(0);
            loop {
                interval.tick().await;
                let mut live = gate.lock();
                if !*live {
                    break;
                }
                if tick(frame) == TickControl::Stop {
                    *live = false;
                    debug!("animation {name} ended itself at frame {}", frame.index);
                    break;
                }
                drop(live);
                frame = frame.next();
            }
        });

        debug!("animation {name} started ({period:?} period)");
        Self {
            name,
            live,
            handle: Some(handle),
        }
    }

    /// `true` until the lease is stopped or its tick ended the loop.
    pub fn is_active(&self) -> bool {
        self.handle.is_some() && *self.live.lock()
    }

    /// Stops the loop. Idempotent.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        *self.live.lock() = false;
        handle.abort();
        debug!("animation {} stopped", self.name);
    }
}

impl Drop for AnimationLease {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for AnimationLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationLease")
            .field("name", &self.name)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationLease, TickControl};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let _lease = AnimationLease::start("t", Duration::from_millis(80), move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            TickControl::Continue
        });

        tokio::time::sleep(Duration::from_millis(410)).await;
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_ticks_and_is_idempotent() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let mut lease = AnimationLease::start("t", Duration::from_millis(10), move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            TickControl::Continue
        });

        tokio::time::sleep(Duration::from_millis(35)).await;
        lease.stop();
        lease.stop();
        assert!(!lease.is_active());
        let seen = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_can_end_the_loop() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let lease = AnimationLease::start("t", Duration::from_millis(10), move |frame| {
            c.fetch_add(1, Ordering::SeqCst);
            if frame.index == 2 {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!lease.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_the_loop() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let lease = AnimationLease::start("t", Duration::from_millis(10), move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            TickControl::Continue
        });
        drop(lease);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
