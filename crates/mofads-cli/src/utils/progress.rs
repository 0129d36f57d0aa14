use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mofads::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Jobs of a batch that have finished so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub placed: u64,
    pub failed: u64,
}

impl Tally {
    fn summary(&self) -> String {
        match self.failed {
            0 => format!("✓ {} placed", self.placed),
            failed => format!("✓ {} placed, ✗ {} failed", self.placed, failed),
        }
    }
}

struct BatchDisplay {
    bar: ProgressBar,
    phase: &'static str,
    tally: Tally,
}

impl BatchDisplay {
    fn apply(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => {
                self.phase = name;
                self.tally = Tally::default();
                self.bar.set_style(spinner_style());
                self.bar.set_prefix("");
                self.bar.set_message(name);
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.set_style(bar_style());
                self.bar.set_length(total_steps);
                self.bar.set_position(0);
                self.bar.set_message(self.phase);
            }
            Progress::JobPlaced { label } => {
                self.tally.placed += 1;
                self.bar.set_message(label);
            }
            Progress::JobFailed { label, reason } => {
                self.tally.failed += 1;
                self.bar.println(format!("  ✗ {}: {}", label, reason));
                self.bar.set_prefix(format!("{} failed", self.tally.failed));
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = self.bar.length() {
                    self.bar.set_position(length);
                }
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar.finish_with_message(self.tally.summary());
            }
            Progress::Message(text) => self.bar.println(format!("  {}", text)),
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("[{bar:32.cyan/blue}] {pos}/{len} {prefix:.red} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// Shows a batch placement on stderr: one bar step per job, the job that just
/// finished, and each failure printed above the bar as it happens.
#[derive(Clone)]
pub struct BatchProgress {
    display: Arc<Mutex<BatchDisplay>>,
}

impl BatchProgress {
    /// A quiet display counts jobs without drawing anything.
    pub fn new(quiet: bool) -> Self {
        let target = if quiet {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let display = BatchDisplay {
            bar: ProgressBar::with_draw_target(None, target),
            phase: "",
            tally: Tally::default(),
        };
        Self {
            display: Arc::new(Mutex::new(display)),
        }
    }

    pub fn tally(&self) -> Tally {
        self.display
            .lock()
            .map(|display| display.tally)
            .unwrap_or_default()
    }

    pub fn callback(&self) -> ProgressCallback<'static> {
        let display = Arc::clone(&self.display);
        Box::new(move |event: Progress| match display.lock() {
            Ok(mut display) => display.apply(event),
            Err(_) => warn!("Batch progress display is poisoned; dropping {:?}", event),
        })
    }
}
