//! 时间工具
//!
//! 报表查询统一使用 UTC 的 unix 秒时间戳；日期格式化固定为 `YYYY-MM-DD`。

use chrono::{DateTime, Utc};

/// First second (00:00:00 UTC) of the day containing `ts`.
pub fn day_start(ts: i64) -> i64 {
    ts - ts.rem_euclid(86_400)
}

/// Last second (23:59:59 UTC) of the day containing `ts`.
pub fn day_end(ts: i64) -> i64 {
    day_start(ts) + 86_399
}

/// Format a unix-seconds timestamp as `YYYY-MM-DD` (UTC).
pub fn format_ymd(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
