//! Formatting utilities used for CLI outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Render a number of seconds as `HHh MMm SSs`.
pub fn secs2readable(secs: f64) -> String {
    let total = secs.max(0.0).round() as i64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_seconds() {
        assert_eq!(secs2readable(3600.0), "01h 00m 00s");
        assert_eq!(secs2readable(3725.4), "01h 02m 05s");
        assert_eq!(secs2readable(0.0), "00h 00m 00s");
    }
}
