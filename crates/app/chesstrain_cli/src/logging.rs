use flexi_logger::{DeferredNow, Logger};
use log::{Level, Record};

use crate::Error;

pub fn init() -> Result<(), Error> {
    Logger::try_with_env_or_str("info")?
        .format(cli_format)
        .log_to_stdout()
        .start()?;

    Ok(())
}

/// Bare message for info, a level prefix for everything else.
fn cli_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    match record.level() {
        Level::Info => write!(w, "{}", record.args()),
        Level::Warn => write!(w, "warning: {}", record.args()),
        level => write!(w, "{}: {}", level.as_str().to_lowercase(), record.args()),
    }
}
