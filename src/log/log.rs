use env_logger::fmt::{Color, Formatter};
use env_logger::Builder;
use log::{Level, LevelFilter, Record};
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

const SUCCESS_TINT: (u8, u8, u8) = (0, 255, 0); // pure green

/// 50 / 50 blend of two RGB colors
#[inline]
fn blend((r1, g1, b1): (u8, u8, u8), (r2, g2, b2): (u8, u8, u8)) -> (u8, u8, u8) {
    (
        ((r1 as u16 + r2 as u16) / 2) as u8,
        ((g1 as u16 + g2 as u16) / 2) as u8,
        ((b1 as u16 + b2 as u16) / 2) as u8,
    )
}
/// Base color for each standard log level
#[inline]
fn base_rgb(level: Level) -> (u8, u8, u8) {
    match level {
        Level::Error => (255, 0, 0),     // red
        Level::Warn => (255, 255, 0),    // yellow
        Level::Info => (255, 255, 255),  // white
        Level::Debug => (200, 200, 255), // blue
        Level::Trace => (220, 220, 220), // grey
    }
}

fn record_rgb(record: &Record) -> (u8, u8, u8) {
    match record.target() {
        "success" => blend(base_rgb(record.level()), SUCCESS_TINT),
        _ => base_rgb(record.level()),
    }
}

/// `src/…/file.rs:line:1`, relative to the crate root when possible.
fn record_location(record: &Record) -> String {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut full = PathBuf::from(record.file().unwrap_or("unknown"));
    if full.is_relative() {
        full = env::current_dir().unwrap_or_default().join(full);
    }
    let rel = full
        .strip_prefix(manifest_dir)
        .unwrap_or(&full) // fall back to abs
        .to_string_lossy()
        .replace('\\', "/"); // Windows → forward-slash
    format!("{rel}:{}:1", record.line().unwrap_or(0))
}

/// Installs the colored console logger.
///
/// Everything down to `Trace` is printed unless `RUST_LOG` says otherwise.
/// Calling it twice returns an error instead of replacing the logger.
pub fn init_log() -> anyhow::Result<()> {
    Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let mut style = buf.style();
            let rgb = record_rgb(record);
            style.set_color(Color::Rgb(rgb.0, rgb.1, rgb.2));

            match record.level() {
                Level::Error | Level::Warn => style.set_bold(true),
                Level::Trace => style.set_dimmed(true),
                _ => style.set_bold(false),
            };

            // The path part has no ANSI codes so terminals keep it clickable.
            writeln!(
                buf,
                "[{} {}] {}  \n{}",
                chrono::Local::now().format("%H:%M:%S"),
                style.value(record.level()),
                style.value(record.args()),
                record_location(record)
            )
        })
        .filter_level(LevelFilter::Trace)
        .parse_default_env()
        .try_init()
        .map_err(Into::into)
}

#[macro_export]
macro_rules! info_success {
    ($($arg:tt)*) => {
        ::log::info!(target: "success", "[SUCCESS] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! debug_success {
    ($($arg:tt)*) => {
        ::log::debug!(target: "success", "[SUCCESS] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_success {
    ($($arg:tt)*) => {
        ::log::trace!(target: "success", "[SUCCESS] {}", format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_target_is_tinted_green() {
        let rgb = record_rgb(
            &Record::builder()
                .target("success")
                .level(Level::Info)
                .args(format_args!("done"))
                .build(),
        );

        assert_eq!(rgb, (127, 255, 127));
    }

    #[test]
    fn location_is_relative_to_the_crate() {
        let location = record_location(
            &Record::builder()
                .file(Some(concat!(env!("CARGO_MANIFEST_DIR"), "/src/log/log.rs")))
                .line(Some(42))
                .args(format_args!("x"))
                .build(),
        );

        assert_eq!(location, "src/log/log.rs:42:1");
    }
}
