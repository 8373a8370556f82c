use std::fmt::Arguments;

use chrono::{DateTime, Local};

/// Similar to `info!` macro in tracing.
/// You can pass in the starting time and it will print how long it took from starting time to now.
/// ```
/// use chrono::Local;
/// use store_reviews::info_time;
///
/// info_time!("str {}, {}", 1, 2);
/// let time = Local::now();
/// info_time!(time, "str {}, {}", 1, 2);
/// ```
#[macro_export]
macro_rules! info_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {
        $crate::macros::log_line(format_args!($strfm, $($arg),*))
    };
    ($time:expr, $strfm:literal $(,)? $($arg:expr),*) => {
        $crate::macros::log_line_since($time, format_args!($strfm, $($arg),*))
    };
}

pub fn log_line(msg: Arguments<'_>) {
    let stamp = Local::now().to_string();
    println!("{stamp:<30} : {msg}");
}

pub fn log_line_since(start: DateTime<Local>, msg: Arguments<'_>) {
    let local_now = Local::now();
    println!(
        "{:<30} : {msg}\nRUNTIME: {} sec",
        local_now.to_string(),
        elapsed_secs(start, local_now)
    );
}

/// Microsecond precision; 0.0 if the span doesn't fit.
fn elapsed_secs(start: DateTime<Local>, end: DateTime<Local>) -> f64 {
    (end - start)
        .num_microseconds()
        .map(|n| n as f64 / 1_000_000.0)
        .unwrap_or(0.0)
}
