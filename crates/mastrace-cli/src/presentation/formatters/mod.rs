use chrono::{DateTime, Utc};

/// `3.5` → `"3.5s"`, `754.0` → `"12m 34s"`, `7384.0` → `"2h 3m"`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        let rounded = (seconds * 10.0).round() / 10.0;
        return format!("{}s", rounded);
    }
    let total = seconds.round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, secs)
    }
}

pub fn format_cost(cost: f64) -> String {
    format!("${:.4}", cost)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_time_of_day(ts: &DateTime<Utc>) -> String {
    ts.format("%H:%M:%S").to_string()
}

/// Single-line preview: newlines collapsed, cut to `max` chars.
pub fn one_line(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    if max < 3 {
        return flat.chars().take(max).collect();
    }
    let mut cut: String = flat.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3.0), "3s");
        assert_eq!(format_duration(3.25), "3.3s");
        assert_eq!(format_duration(754.0), "12m 34s");
        assert_eq!(format_duration(7384.0), "2h 3m");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.02), "$0.0200");
    }

    #[test]
    fn test_one_line() {
        assert_eq!(one_line("a\n  b", 10), "a b");
        assert_eq!(one_line("abcdefghijk", 8), "abcde...");
        assert_eq!(one_line("abcdefghijk", 2), "ab");
    }
}
