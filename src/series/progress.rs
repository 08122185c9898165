//! Progress observers for the time-series assembly.
//!
//! The assembler reports through the [`ProgressObserver`] trait and never logs by
//! itself. Available observers:
//! * [`NoProgress`], which ignores every observation,
//! * any `FnMut(Progress)` closure,
//! * [`LogProgress`], one `tracing` line per observation with chunk timing,
//! * `ProgressBarObserver` (feature `progress`), an `indicatif` bar.
//!
//! Chunk timing uses an exponential moving average of the durations between two
//! observations: `ema ← α·dt + (1–α)·ema`, initialised with the first duration.

use std::time::{Duration, Instant};

use tracing::debug;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// One progress observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Grid index of the last instant computed.
    pub index: usize,
    /// Grid length.
    pub total: usize,
    /// Share of the grid computed so far, in `[0, 100]`.
    pub percent: f64,
}

impl Progress {
    pub fn new(index: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            (index + 1) as f64 / total as f64 * 100.0
        };
        Progress {
            index,
            total,
            percent,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.index + 1 >= self.total
    }
}

pub trait ProgressObserver {
    fn observe(&mut self, progress: Progress);

    /// Called once after the last observation of a successful assembly.
    fn finish(&mut self) {}
}

impl<F: FnMut(Progress)> ProgressObserver for F {
    fn observe(&mut self, progress: Progress) {
        self(progress)
    }
}

/// Observer that drops every observation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn observe(&mut self, _progress: Progress) {}
}

/// Smoothed duration between successive ticks.
#[derive(Debug)]
pub(crate) struct IterTimer {
    last: Instant,
    ema_ns: f64,
    alpha: f64,
    count: u64,
}

impl IterTimer {
    pub(crate) fn new(alpha: f64) -> Self {
        Self {
            last: Instant::now(),
            ema_ns: 0.0,
            alpha,
            count: 0,
        }
    }

    /// Duration since the previous tick (or since creation).
    #[inline]
    pub(crate) fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.count += 1;

        let dt_ns = dt.as_nanos() as f64;
        self.ema_ns = if self.count == 1 {
            dt_ns
        } else {
            self.alpha * dt_ns + (1.0 - self.alpha) * self.ema_ns
        };
        dt
    }

    #[inline]
    pub(crate) fn avg(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.ema_ns as u64)
        }
    }
}

/// Compact duration: `253µs`, `42ms` or `3.14s`.
pub fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else if d.as_millis() < 1_000 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.2}s", d.as_secs_f32())
    }
}

/// Logs every observation at debug level.
#[derive(Debug)]
pub struct LogProgress {
    timer: IterTimer,
}

impl LogProgress {
    pub fn new() -> Self {
        LogProgress {
            timer: IterTimer::new(0.2),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        LogProgress::new()
    }
}

impl ProgressObserver for LogProgress {
    fn observe(&mut self, progress: Progress) {
        let last = self.timer.tick();
        debug!(
            "instant {}/{} ({:.0}%) | chunk: {}, avg: {}",
            progress.index + 1,
            progress.total,
            progress.percent,
            fmt_dur(last),
            fmt_dur(self.timer.avg())
        );
    }
}

/// Terminal progress bar.
#[cfg(feature = "progress")]
pub struct ProgressBarObserver {
    pb: ProgressBar,
    timer: IterTimer,
}

#[cfg(feature = "progress")]
impl ProgressBarObserver {
    pub fn new(total: usize) -> Self {
        let pb = ProgressBar::new((total as u64).max(1));
        pb.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.enable_steady_tick(Duration::from_millis(200));
        ProgressBarObserver {
            pb,
            timer: IterTimer::new(0.2),
        }
    }
}

#[cfg(feature = "progress")]
impl ProgressObserver for ProgressBarObserver {
    fn observe(&mut self, progress: Progress) {
        let last = self.timer.tick();
        self.pb.set_length((progress.total as u64).max(1));
        self.pb.set_position(progress.index as u64 + 1);
        self.pb.set_message(format!(
            "chunk: {}, avg: {}",
            fmt_dur(last),
            fmt_dur(self.timer.avg())
        ));
    }

    fn finish(&mut self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}
