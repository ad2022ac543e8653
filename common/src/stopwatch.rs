//! Named-task timer for per-stage profiling.

use std::time::{Duration, Instant};

/// Measures a sequence of consecutive tasks.
///
/// Starting a task stops the previous one; `print` logs one line per task.
#[derive(Debug)]
pub struct StopWatch {
    name: String,
    tasks: Vec<(String, Duration)>,
    current: Option<(String, Instant)>,
}

impl StopWatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
            current: None,
        }
    }

    pub fn start(&mut self, task: impl Into<String>) {
        self.stop();
        self.current = Some((task.into(), Instant::now()));
    }

    pub fn stop(&mut self) {
        if let Some((task, started)) = self.current.take() {
            self.tasks.push((task, started.elapsed()));
        }
    }

    /// Completed tasks in start order.
    pub fn tasks(&self) -> &[(String, Duration)] {
        &self.tasks
    }

    pub fn total(&self) -> Duration {
        self.tasks.iter().map(|(_, d)| *d).sum()
    }

    pub fn print(&mut self) {
        self.stop();
        let total = self.total();
        log::info!("{} total: {:.3} ms", self.name, total.as_secs_f64() * 1e3);
        for (task, duration) in &self.tasks {
            let percent = if total.is_zero() {
                0.0
            } else {
                100.0 * duration.as_secs_f64() / total.as_secs_f64()
            };
            log::info!(
                "  {:<24} {:>9.3} ms {:>5.1}%",
                task,
                duration.as_secs_f64() * 1e3,
                percent
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_closes_previous_task() {
        let mut watch = StopWatch::new("w");
        watch.start("a");
        watch.start("b");
        watch.stop();
        let names: Vec<_> = watch.tasks().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn stop_without_task_is_noop() {
        let mut watch = StopWatch::new("w");
        watch.stop();
        assert!(watch.tasks().is_empty());
        assert_eq!(watch.total(), Duration::ZERO);
    }
}
