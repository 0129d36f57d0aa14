/// Events emitted by long-running workflows such as batch placement.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// A job of a batch produced its adsorbate complex.
    JobPlaced { label: String },
    /// A job of a batch failed; the batch itself carries on.
    JobFailed { label: String, reason: String },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
///
/// A reporter without a callback swallows every event, so library code can report
/// unconditionally.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    pub fn message(&self, text: impl Into<String>) {
        self.report(Progress::Message(text.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
        reporter.message("nothing happens");
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let seen = Mutex::new(Vec::new());
        {
            let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
                seen.lock().unwrap().push(event);
            }));
            reporter.report(Progress::PhaseStart { name: "Placement" });
            reporter.message("hello");
            reporter.report(Progress::PhaseFinish);
        }
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![
                Progress::PhaseStart { name: "Placement" },
                Progress::Message("hello".to_string()),
                Progress::PhaseFinish,
            ]
        );
    }
}
