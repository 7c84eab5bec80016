use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::Config;

static STUDIO_LOGGER: Lazy<StudioLogger> = Lazy::new(StudioLogger::new);
static INSTALLED: OnceCell<()> = OnceCell::new();

pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::default())
}

/// Installs the logger on first call; later calls only swap the config.
pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    STUDIO_LOGGER.update_config(config.clone())?;

    INSTALLED.get_or_try_init(|| {
        log::set_logger(&*STUDIO_LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))
    })?;

    log::set_max_level(config.min_level.to_level_filter());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// One emitted record, also the JSON line format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
    pub thread_id: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String, module: String, file: String, line: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            message,
            module,
            file,
            line,
            thread_id: format!("{:?}", std::thread::current().id()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_thread_id: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_to_file: bool,
    pub log_file_path: String,
    /// Console output goes to stderr so stdout stays clean for command output.
    pub use_stderr: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_thread_id: false,
            show_file_location: false,
            show_module: true,
            include_timestamp: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_to_file: false,
            log_file_path: "portraitgen.log".to_string(),
            use_stderr: true,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_to_file = true;
        self.log_file_path = path.to_string();
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_emojis: true,
            output_json: false,
            show_file_location: true,
            ..Default::default()
        }
    }

    /// `PORTRAITGEN_LOG` picks the level, `PORTRAITGEN_LOG_JSON=true` switches to
    /// JSON lines, `PORTRAITGEN_LOG_FILE` adds a file sink.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(level) = std::env::var("PORTRAITGEN_LOG")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.min_level = level;
        }
        if std::env::var("PORTRAITGEN_LOG_JSON").map_or(false, |v| v == "true") {
            config = config.with_json_output(true).with_colors(false);
        }
        if let Ok(path) = std::env::var("PORTRAITGEN_LOG_FILE") {
            if !path.is_empty() {
                config = config.with_file_output(&path);
            }
        }
        config
    }
}

pub struct StudioLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl StudioLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) -> Result<(), String> {
        let file = if new_config.log_to_file {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&new_config.log_file_path)
                .map_err(|e| format!("Failed to open {}: {}", new_config.log_file_path, e))?;
            Some(file)
        } else {
            None
        };

        if let Ok(mut log_file) = self.log_file.lock() {
            *log_file = file;
        }
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
        Ok(())
    }

    fn format_console_output(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        let mut output = String::new();

        if config.include_timestamp {
            let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
            if config.show_colors {
                output.push_str(&format!("{} ", timestamp.bright_black()));
            } else {
                output.push_str(&format!("{} ", timestamp));
            }
        }

        let level_str = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };
        if config.show_colors {
            output.push_str(&format!("[{}] ", level_str.color(entry.level.color()).bold()));
        } else {
            output.push_str(&format!("[{}] ", level_str));
        }

        if config.show_module && !entry.module.is_empty() {
            if config.show_colors {
                output.push_str(&format!("{}: ", entry.module.bright_blue()));
            } else {
                output.push_str(&format!("{}: ", entry.module));
            }
        }

        output.push_str(&entry.message);

        if config.show_thread_id {
            output.push_str(&format!(" [thread:{}]", entry.thread_id));
        }

        if config.show_file_location {
            let location = format!("({}:{})", entry.file, entry.line);
            if config.show_colors {
                output.push_str(&format!(" {}", location.bright_black()));
            } else {
                output.push_str(&format!(" {}", location));
            }
        }

        output
    }

    fn render(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            serde_json::to_string(entry).unwrap_or_default()
        } else {
            self.format_console_output(entry, config)
        }
    }

    fn write_to_file(&self, entry: &LogEntry, config: &LoggerConfig) {
        if let Ok(mut guard) = self.log_file.lock() {
            if let Some(file) = guard.as_mut() {
                // file sink never carries ANSI colors
                let plain = LoggerConfig {
                    show_colors: false,
                    ..config.clone()
                };
                let _ = writeln!(file, "{}", self.render(entry, &plain));
            }
        }
    }

    fn create_log_entry(&self, record: &Record) -> LogEntry {
        LogEntry::new(
            LogLevel::from_level(record.level()),
            record.args().to_string(),
            record.module_path().unwrap_or("unknown").to_string(),
            record.file().unwrap_or("unknown").to_string(),
            record.line().unwrap_or(0),
        )
    }
}

impl Default for StudioLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for StudioLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_level(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = self.create_log_entry(record);
        let Ok(config) = self.config.lock() else {
            return;
        };

        let line = self.render(&entry, &config);
        if config.use_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }

        if config.log_to_file {
            self.write_to_file(&entry, &config);
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        if let Ok(mut guard) = self.log_file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long an operation took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  {} completed in {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_config_info(config: &Config) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Model: {}", config.gemini.model());
    log::info!("   Endpoint: {}", config.gemini.base_url());
    log::info!(
        "   API key: {}",
        if config.gemini.api_key.is_some() { "✅" } else { "❌" }
    );
    log::info!(
        "   Watermark: {}",
        if config.watermark.enabled {
            config.watermark.text.as_str()
        } else {
            "off"
        }
    );
    log::info!("   Download prefix: {}", config.download_prefix);
}
