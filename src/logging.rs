//! File logging through log4rs. The terminal is owned by the UI, so nothing
//! is written to stdout or stderr while the game runs.

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use std::path::Path;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {t} {m}{n}";

fn build_config(level: LevelFilter, path: &Path) -> Result<Config> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .context("building log config")?;
    Ok(config)
}

/// Install the global logger. Without a path the `log` macros stay no-ops.
pub fn init_log(level: LevelFilter, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let config = build_config(level, path)?;
    log4rs::init_config(config).context("installing logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_is_a_no_op() {
        assert!(init_log(LevelFilter::Debug, None).is_ok());
    }

    #[test]
    fn config_builds_for_writable_path() {
        let path = std::env::temp_dir().join(format!("falltris-log-test-{}.log", std::process::id()));
        assert!(build_config(LevelFilter::Info, &path).is_ok());
        let _ = std::fs::remove_file(path);
    }
}
