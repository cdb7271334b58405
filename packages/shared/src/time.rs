//! Time helpers.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Current Unix timestamp in milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Wall-clock time of day (`HH:MM:SS`) in the host's local timezone.
///
/// Used as the display time of a message when the sender did not supply one.
pub fn display_time_now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Convert a millisecond Unix timestamp to an RFC 3339 string (UTC).
///
/// Out-of-range values fall back to the Unix epoch.
pub fn millis_to_rfc3339(millis: i64) -> String {
    let datetime: DateTime<Utc> = Utc
        .timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH);
    datetime.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_rfc3339() {
        // テスト項目: ミリ秒タイムスタンプを RFC 3339 文字列に変換できる
        // given (前提条件):
        let millis = 1_672_498_800_000i64; // 2022-12-31T15:00:00Z

        // when (操作):
        let formatted = millis_to_rfc3339(millis);

        // then (期待する結果):
        assert_eq!(formatted, "2022-12-31T15:00:00+00:00");
    }

    #[test]
    fn test_display_time_now_format() {
        // テスト項目: 表示用時刻は HH:MM:SS 形式
        // when (操作):
        let time = display_time_now();

        // then (期待する結果):
        assert_eq!(time.len(), 8);
        assert_eq!(time.as_bytes()[2], b':');
        assert_eq!(time.as_bytes()[5], b':');
    }

    #[test]
    fn test_now_millis_is_positive() {
        // テスト項目: 現在時刻のタイムスタンプは正の値
        assert!(now_millis() > 0);
    }
}
