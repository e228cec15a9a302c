use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

//
// ─── COUNTDOWN STATE MACHINE ───────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Expired,
    Stopped,
}

/// Tick-driven countdown.
///
/// The machine is pure: time advances only through `tick`, so tests and
/// the async driver share the exact same expiry logic. The time-up
/// signal is reported exactly once per run; a stop before expiry
/// suppresses it for good.
#[derive(Debug, Clone)]
pub struct Countdown {
    duration: Duration,
    remaining: Duration,
    state: CountdownState,
    fired: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            remaining: duration,
            state: CountdownState::Idle,
            fired: false,
        }
    }

    /// Enter `Running` with the full duration.
    pub fn start(&mut self) {
        self.remaining = self.duration;
        self.state = CountdownState::Running;
        self.fired = false;
    }

    /// Re-enter `Running` from a fresh duration, regardless of the
    /// current state.
    pub fn restart(&mut self, duration: Duration) {
        self.duration = duration;
        self.start();
    }

    /// Advance time. Returns `true` exactly once, on the tick that
    /// reaches zero; every other call returns `false`.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.state != CountdownState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if !self.remaining.is_zero() {
            return false;
        }
        self.state = CountdownState::Expired;
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    /// External stop (e.g. an answer was submitted). Only a running
    /// countdown can be stopped; an expired one keeps its state, and the
    /// signal it already fired is not un-fired.
    pub fn stop(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Stopped;
        }
    }

    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }
}

//
// ─── ASYNC DRIVER ──────────────────────────────────────────────────────────────
//

/// Events emitted by a spawned countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: Duration },
    Expired,
}

/// Handle to a spawned countdown task.
///
/// Dropping the handle cancels the countdown, mirroring a dismissed
/// view; no event is delivered after that.
pub struct CountdownHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop the countdown. Ticks cease and the expiry event will never
    /// be sent. Stopping twice is harmless.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Run a countdown on a tokio interval, emitting `TimerEvent`s on the
/// given channel. The stop signal is polled before each tick, so a stop
/// observed before expiry deterministically suppresses the expiry event.
#[must_use]
pub fn spawn_countdown(
    duration: Duration,
    tick_every: Duration,
    events: mpsc::UnboundedSender<TimerEvent>,
) -> CountdownHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        let mut countdown = Countdown::new(duration);
        countdown.start();
        let mut interval = tokio::time::interval(tick_every);
        // The first interval tick completes immediately; consume it so the
        // countdown runs on whole tick periods.
        interval.tick().await;
        loop {
            tokio::select! {
                biased;
                _ = stop_rx.changed() => {
                    countdown.stop();
                    return;
                }
                _ = interval.tick() => {
                    if countdown.tick(tick_every) {
                        let _ = events.send(TimerEvent::Expired);
                        return;
                    }
                    if !countdown.is_running() {
                        return;
                    }
                    let _ = events.send(TimerEvent::Tick {
                        remaining: countdown.remaining(),
                    });
                }
            }
        }
    });
    CountdownHandle {
        stop: stop_tx,
        task,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn counts_down_and_fires_once() {
        let mut countdown = Countdown::new(Duration::from_secs(3));
        countdown.start();

        assert!(!countdown.tick(SECOND));
        assert!(!countdown.tick(SECOND));
        assert!(countdown.tick(SECOND));
        assert_eq!(countdown.state(), CountdownState::Expired);

        // Late ticks never re-fire.
        assert!(!countdown.tick(SECOND));
        assert!(!countdown.tick(SECOND));
    }

    #[test]
    fn stop_suppresses_expiry() {
        let mut countdown = Countdown::new(Duration::from_secs(2));
        countdown.start();
        assert!(!countdown.tick(SECOND));

        countdown.stop();
        assert_eq!(countdown.state(), CountdownState::Stopped);
        assert!(!countdown.tick(SECOND));
        assert!(!countdown.tick(Duration::from_secs(100)));
    }

    #[test]
    fn restart_runs_a_fresh_countdown() {
        let mut countdown = Countdown::new(Duration::from_secs(1));
        countdown.start();
        assert!(countdown.tick(SECOND));

        countdown.restart(Duration::from_secs(2));
        assert!(countdown.is_running());
        assert!(!countdown.tick(SECOND));
        // The second run fires its own signal, once.
        assert!(countdown.tick(SECOND));
        assert!(!countdown.tick(SECOND));
    }

    #[test]
    fn overshooting_tick_still_fires_once() {
        let mut countdown = Countdown::new(Duration::from_secs(5));
        countdown.start();
        assert!(countdown.tick(Duration::from_secs(60)));
        assert!(!countdown.tick(Duration::from_secs(60)));
    }

    #[test]
    fn idle_countdown_ignores_ticks() {
        let mut countdown = Countdown::new(Duration::from_secs(1));
        assert!(!countdown.tick(SECOND));
        assert_eq!(countdown.state(), CountdownState::Idle);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn spawned_countdown_expires_exactly_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = spawn_countdown(
            Duration::from_millis(30),
            Duration::from_millis(10),
            tx,
        );

        tokio::time::sleep(Duration::from_millis(150)).await;
        let mut expired = 0;
        while let Ok(event) = rx.try_recv() {
            if event == TimerEvent::Expired {
                expired += 1;
            }
        }
        assert_eq!(expired, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stopped_countdown_never_expires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_countdown(
            Duration::from_millis(40),
            Duration::from_millis(10),
            tx,
        );
        handle.stop();

        tokio::time::sleep(Duration::from_millis(120)).await;
        while let Ok(event) = rx.try_recv() {
            assert_ne!(event, TimerEvent::Expired);
        }
        assert!(handle.is_finished());
    }
}
