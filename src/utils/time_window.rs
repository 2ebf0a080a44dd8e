//! 统计时间窗口

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// 当前 UTC 月份的第一个时刻
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// 上一个自然月的第一个时刻
pub fn previous_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// `now - days`
pub fn days_ago(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

/// 环比增长百分比，上期为 0 时本期有数据记 100，否则 0
pub fn growth_percent(this: u64, prev: u64) -> i64 {
    if prev == 0 {
        return if this > 0 { 100 } else { 0 };
    }
    ((this as f64 - prev as f64) / prev as f64 * 100.0).round() as i64
}
