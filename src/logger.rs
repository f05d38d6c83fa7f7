use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

/// ファイルに追記するロガー
///
/// raw mode 中は端末に書けないため、ログはすべてファイルに出す
pub struct Logger {
    file: Mutex<File>,
}

impl Logger {
    pub fn new<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl Log for Logger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "[{}] {} {}", timestamp, record.level(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// ログファイルを開いて `log` のロガーとして登録する
///
/// release build では何も記録しない
pub fn init(path: &str) -> std::io::Result<()> {
    if !cfg!(debug_assertions) {
        log::set_max_level(LevelFilter::Off);
        return Ok(());
    }

    let logger = Logger::new(path)?;
    // 既に設定済みなら何もしない
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
    Ok(())
}
