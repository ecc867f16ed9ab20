//! Time helpers.

use chrono::Utc;

/// Current Unix timestamp in milliseconds (UTC).
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_positive() {
        // given / when:
        let now = now_millis();

        // then: sometime after 2020
        assert!(now > 1_577_836_800_000);
    }

}
