//! Logger setup.

/// Installs the global logger: timestamped lines on stderr, filtered at `level`.
/// Fails if a logger was already installed.
pub fn setup_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_installs_once() {
        let _ = setup_logger(log::LevelFilter::Debug);
        log::debug!("logger installed");
        assert!(setup_logger(log::LevelFilter::Debug).is_err());
    }
}
