use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};

/// Starts the global logger: rotated files under `logs/`, everything mirrored
/// to stdout and warnings to stderr.
///
/// `base_level` is a flexi_logger spec such as `"info"` or
/// `"info, noteheads::split=trace"`.
pub fn setup_logging(base_level: &str) {
    Logger::try_with_str(base_level)
        .unwrap_or_else(|e| panic!("Invalid log spec {base_level:?}: {e}"))
        .log_to_file(
            FileSpec::default()
                .directory("logs")
                .basename("noteheads"),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .duplicate_to_stdout(Duplicate::All)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
        .map(std::mem::forget)
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_starts_and_accepts_records() {
        setup_logging("debug");
        log::debug!("logger up");
        assert!(log::log_enabled!(log::Level::Debug));
        assert!(!log::log_enabled!(log::Level::Trace));
    }
}
