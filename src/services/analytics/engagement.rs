//! 互动率

/// (shares + contacts) / views，四舍五入到整数百分比，封顶 100
pub fn engagement_percent(views: u64, shares: u64, contacts: u64) -> u32 {
    if views == 0 {
        return 0;
    }
    let ratio = (shares + contacts) as f64 / views as f64 * 100.0;
    ratio.round().min(100.0) as u32
}

/// 形如 `"30%"` 的互动率
pub fn engagement_rate(views: u64, shares: u64, contacts: u64) -> String {
    format!("{}%", engagement_percent(views, shares, contacts))
}
