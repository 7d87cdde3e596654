use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

pub const AUDIT_TARGET: &str = "pmservice::audit";

const ENC_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

/// Maps `error|warn|info|debug|trace` (any case) to a level; anything else is `Info`.
#[must_use]
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Configure logging globally for the process. If log4rs is already
/// initialized the call fails and the existing config stays in place.
/// - dir: base directory for log files; if None, console only.
/// - level: error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// # Errors
/// Returns an error if the directory cannot be created or log4rs rejects the config.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let lvl = parse_level(level);
    let keep = u32::try_from(retention.unwrap_or(7)).unwrap_or(u32::MAX);
    let console = ConsoleAppender::builder().encoder(Box::new(PatternEncoder::new(ENC_PATTERN))).build();
    let mut builder = Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(base) = dir {
        std::fs::create_dir_all(base)?;
        builder = builder
            .appender(Appender::builder().build("app", Box::new(rolling_appender(base, "pmservice", keep)?)))
            .appender(Appender::builder().build("audit", Box::new(rolling_appender(base, "audit", keep)?)))
            .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, lvl));
        root = root.appender("app");
    }

    let config = builder.build(root.build(lvl))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn rolling_appender(
    base: &Path,
    stem: &str,
    keep: u32,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let roller = FixedWindowRoller::builder().build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENC_PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))?;
    Ok(appender)
}
