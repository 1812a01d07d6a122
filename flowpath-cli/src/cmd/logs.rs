use chrono::Local;
use std::{fs, path::Path};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
	filter::{EnvFilter, LevelFilter},
	fmt::{self},
	layer::SubscriberExt,
	util::SubscriberInitExt,
	Layer,
};

/// Installs the global subscriber: warnings (or `RUST_LOG`) to stderr and,
/// when `logs_dir` is given, everything down to TRACE into a fresh file.
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the command finishes.
pub fn init(logs_dir: Option<&Path>) -> Option<WorkerGuard> {
	let stderr_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

	let logs_dir = logs_dir.filter(|dir| match fs::create_dir_all(dir) {
		Ok(()) => true,
		Err(e) => {
			eprintln!("could not create log directory {}: {e}", dir.display());
			false
		}
	});

	let (file_layer, guard) = match logs_dir {
		Some(dir) => {
			// milliseconds keep back-to-back runs in separate files
			let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S%.3f");
			let file_appender = tracing_appender::rolling::never(dir, format!("{timestamp}.log"));
			let (writer, guard) = tracing_appender::non_blocking(file_appender);
			let layer = fmt::layer()
				.with_writer(writer)
				.with_ansi(false)
				.pretty()
				.with_filter(LevelFilter::TRACE);
			(Some(layer), Some(guard))
		}
		None => (None, None),
	};

	tracing_subscriber::registry().with(stderr_layer).with(file_layer).init();

	if let Some(dir) = logs_dir {
		tracing::debug!("Logging initialized. Log file in: {}", dir.display());
	}
	guard
}
