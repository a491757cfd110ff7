/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Whole minutes from `start` to `end` (Unix millis), clamped to zero
///
/// A negative span only happens with clock skew between devices.
pub fn whole_minutes_between(start: i64, end: i64) -> i64 {
    end.saturating_sub(start).max(0) / 60_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_minutes_floors() {
        assert_eq!(whole_minutes_between(0, 59_999), 0);
        assert_eq!(whole_minutes_between(0, 60_000), 1);
        assert_eq!(whole_minutes_between(1_000, 181_500), 3);
    }

    #[test]
    fn test_whole_minutes_clamps_negative() {
        assert_eq!(whole_minutes_between(120_000, 0), 0);
    }
}
