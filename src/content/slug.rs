//! Slug generation for new posts

use chrono::{DateTime, SecondsFormat, Utc};

/// Build the slug for a post created at `timestamp`
///
/// The timestamp is quantized to whole seconds, so two posts with the same
/// title created within the same second share a slug and the later write wins.
///
/// # Examples
/// ```ignore
/// slug_for("Hello World", ts) // -> "2024-01-02t15-04-05z-hello-world"
/// ```
pub fn slug_for(title: &str, timestamp: &DateTime<Utc>) -> String {
    let stamp = slug::slugify(timestamp.to_rfc3339_opts(SecondsFormat::Secs, true));
    let title = slug::slugify(title);

    if title.is_empty() {
        stamp
    } else {
        format!("{}-{}", stamp, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap()
    }

    #[test]
    fn test_slug_format() {
        assert_eq!(slug_for("Hello World", &ts()), "2024-01-02t15-04-05z-hello-world");
    }

    #[test]
    fn test_slug_is_deterministic() {
        assert_eq!(slug_for("Hello World", &ts()), slug_for("Hello World", &ts()));
    }

    #[test]
    fn test_different_timestamps_differ() {
        let later = ts() + Duration::seconds(1);
        assert_ne!(slug_for("Hello World", &ts()), slug_for("Hello World", &later));
    }

    #[test]
    fn test_same_second_collides() {
        // Sub-second precision is dropped, so these two share a slug.
        let a = ts() + Duration::milliseconds(100);
        let b = ts() + Duration::milliseconds(900);
        assert_eq!(slug_for("Same", &a), slug_for("Same", &b));
    }

    #[test]
    fn test_normalizes_title() {
        let slug = slug_for("  Héllo,   Wörld!! ", &ts());
        assert_eq!(slug, "2024-01-02t15-04-05z-hello-world");
    }

    #[test]
    fn test_empty_title() {
        // No trailing "-" when the title slugifies to nothing; the slug is
        // the timestamp alone.
        assert_eq!(slug_for("", &ts()), "2024-01-02t15-04-05z");
        assert_eq!(slug_for("!!!", &ts()), "2024-01-02t15-04-05z");
    }
}
