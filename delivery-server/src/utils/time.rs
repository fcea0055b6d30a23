//! 时间工具函数 — 看板显示用的分钟级相对时间
//!
//! 所有格式化都是 `(now, t)` 的纯函数，每次渲染重新计算，
//! 不落库存储。

use chrono::{DateTime, Utc};

/// 相对过去时间 ("Just now" / "1 min ago" / "{n} mins ago")
pub fn time_ago(now: DateTime<Utc>, t: DateTime<Utc>) -> String {
    let mins = (now - t).num_minutes();
    match mins {
        i64::MIN..=0 => "Just now".to_string(),
        1 => "1 min ago".to_string(),
        n => format!("{} mins ago", n),
    }
}

/// 相对未来时间 ("Overdue" / "Now" / "{n} mins")
///
/// 已过期的目标时间显示 "Overdue"，不显示负数。
pub fn time_until(now: DateTime<Utc>, t: DateTime<Utc>) -> String {
    if t < now {
        return "Overdue".to_string();
    }
    let mins = (t - now).num_minutes();
    match mins {
        0 => "Now".to_string(),
        n => format!("{} mins", n),
    }
}
