//! Small formatting helpers with no state and no dependencies on the
//! rest of the crate, the way the teacher kept `get_time_str` here.

/// Renders a duration in minutes (as accumulated on a [`crate::label::Label`])
/// as `HH:MM:SS`, truncating towards zero.
pub fn format_minutes(total_minutes: f64) -> String {
    let total_seconds = (total_minutes * 60.0).max(0.0).round() as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_minutes() {
        assert_eq!(format_minutes(90.0), "01:30:00");
    }

    #[test]
    fn clamps_negative_to_zero() {
        assert_eq!(format_minutes(-5.0), "00:00:00");
    }
}
