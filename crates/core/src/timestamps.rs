use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a timestamp string as emitted by the upstream backend.
///
/// The upstream serializes `datetime.isoformat()`, which may or may not carry
/// a UTC offset. Naive timestamps are interpreted as UTC.
pub fn parse_upstream_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_upstream_timestamp("2024-03-01T14:25:17Z").unwrap();
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn parses_naive_isoformat() {
        let dt = parse_upstream_timestamp("2024-03-01T14:25:17.123456").unwrap();
        assert_eq!(dt.minute(), 25);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_upstream_timestamp("yesterday").is_none());
    }
}
