// src/core/time.rs
use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Current wall-clock time in Japan Standard Time.
pub fn now_jst() -> DateTime<FixedOffset> {
    match FixedOffset::east_opt(JST_OFFSET_SECS) {
        Some(jst) => Utc::now().with_timezone(&jst),
        None => Utc::now().fixed_offset(),
    }
}

/// `YYYY-mm-dd HH:MM:SS`, as used in log lines.
pub fn timestamp() -> String {
    now_jst().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_nine_hours_ahead_of_utc() {
        assert_eq!(now_jst().offset().local_minus_utc(), JST_OFFSET_SECS);
    }

    #[test]
    fn timestamp_shape() {
        let s = timestamp();
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], " ");
        assert_eq!(&s[13..14], ":");
    }
}
