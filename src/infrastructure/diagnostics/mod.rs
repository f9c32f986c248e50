mod file_failure_log;

pub use file_failure_log::FileFailureLog;
