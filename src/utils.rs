use anyhow::Result;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use log::{LevelFilter, Record};
use std::fs::OpenOptions;
use std::io::Write;

// Stdout belongs to the terminal UI, so logging goes to a file.

pub struct SimpleLogger {
    log_file: Option<std::fs::File>,
}

impl SimpleLogger {
    pub fn new(log_file_path: Option<&str>) -> Result<Self> {
        let log_file = if let Some(path) = log_file_path {
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        } else {
            None
        };

        Ok(SimpleLogger { log_file })
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now: DateTime<Local> = Local::now();
            let log_message = format!(
                "[{}] {} [{}:{}] {}\n",
                now.format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            );

            if let Some(file) = &self.log_file {
                if let Ok(mut file) = file.try_clone() {
                    let _ = file.write_all(log_message.as_bytes());
                }
            } else {
                print!("{}", log_message);
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.log_file {
            if let Ok(mut file) = file.try_clone() {
                let _ = file.flush();
            }
        } else {
            let _ = std::io::stdout().flush();
        }
    }
}

pub fn setup_logging(log_file: Option<&str>, level: LevelFilter) -> Result<()> {
    let logger = SimpleLogger::new(log_file)?;
    log::set_boxed_logger(Box::new(logger)).map(|()| log::set_max_level(level))?;

    log::info!("Logging initialized at level: {}", level);
    log::info!(
        "App version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_NAME")
    );

    Ok(())
}

/// Read a line of input from stdin, trimming whitespace
pub fn read_line() -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Chat-list timestamp: time of day for today, "Yesterday", otherwise
/// the date.
pub fn format_chat_timestamp(timestamp: u64) -> String {
    let datetime = match Utc.timestamp_opt(timestamp as i64, 0).single() {
        Some(dt) => dt.with_timezone(&Local),
        None => return String::new(),
    };
    let today = Local::now().date_naive();

    if datetime.date_naive() == today {
        datetime.format("%H:%M").to_string()
    } else if datetime.date_naive() == today - Duration::days(1) {
        "Yesterday".to_string()
    } else {
        datetime.format("%d/%m/%Y").to_string()
    }
}

/// Message timestamp inside a conversation.
pub fn format_message_timestamp(timestamp: u64) -> String {
    match Utc.timestamp_opt(timestamp as i64, 0).single() {
        Some(dt) => dt.with_timezone(&Local).format("%H:%M").to_string(),
        None => String::new(),
    }
}

/// Coarse "how long ago" used by the status feed and last-seen lines.
pub fn format_relative(timestamp: u64) -> String {
    let now = Utc::now().timestamp() as u64;
    let elapsed = now.saturating_sub(timestamp);

    if elapsed < 60 {
        "just now".to_string()
    } else if elapsed < 3600 {
        format!("{} min ago", elapsed / 60)
    } else if elapsed < 86_400 {
        format!("{} h ago", elapsed / 3600)
    } else {
        format!("{} d ago", elapsed / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_formatting_buckets() {
        let now = Utc::now().timestamp() as u64;
        assert_eq!(format_relative(now), "just now");
        assert_eq!(format_relative(now - 300), "5 min ago");
        assert_eq!(format_relative(now - 2 * 3600), "2 h ago");
        assert_eq!(format_relative(now - 3 * 86_400), "3 d ago");
    }

    #[test]
    fn todays_timestamp_renders_time_of_day() {
        let now = Utc::now().timestamp() as u64;
        let rendered = format_chat_timestamp(now);
        assert_eq!(rendered.len(), 5);
        assert!(rendered.contains(':'));
    }
}
