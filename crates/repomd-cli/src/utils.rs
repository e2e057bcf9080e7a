use std::{
    fmt::Display,
    sync::{LazyLock, RwLock},
};

use chrono::DateTime;
use nu_ansi_term::Color;
use repomd_core::Package;
use repomd_utils::bytes::format_bytes;

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));
pub static PROGRESS: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub fn progress_enabled() -> bool {
    PROGRESS.read().map(|enabled| *enabled).unwrap_or(false)
}

fn color_enabled() -> bool {
    COLOR.read().map(|enabled| *enabled).unwrap_or(false)
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if color_enabled() {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Size column for a package, `-` when the metadata carries none.
pub fn pretty_package_size(package: &Package) -> String {
    if package.size == 0 {
        "-".to_string()
    } else {
        format!("{}", Colored(Color::Magenta, format_bytes(package.size, 2)))
    }
}

/// Renders a unix timestamp as `YYYY-MM-DD`, or `unknown` for 0.
pub fn format_date(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .filter(|timestamp| *timestamp > 0)
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
