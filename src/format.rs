//! Display formatting shared by the live run view, announcements and the
//! activity history. Output strings are part of the external contract.

/// Placeholder shown when no pace can be computed yet
pub const PACE_PLACEHOLDER: &str = "--:--";

/// Placeholder shown when no speed can be computed yet
pub const SPEED_PLACEHOLDER: &str = "--";

/// Average pace in minutes per kilometer.
///
/// Returns `None` when no distance has been covered, instead of dividing by zero.
pub fn average_pace(elapsed_secs: u64, distance_meters: f64) -> Option<f64> {
    if distance_meters <= 0.0 || !distance_meters.is_finite() {
        return None;
    }
    Some((elapsed_secs as f64 / 60.0) / (distance_meters / 1000.0))
}

/// Average speed in km/h, `None` when no time has elapsed
pub fn average_speed_kmh(distance_meters: f64, elapsed_secs: u64) -> Option<f64> {
    if elapsed_secs == 0 {
        return None;
    }
    Some((distance_meters / 1000.0) / (elapsed_secs as f64 / 3600.0))
}

/// `MM:SS`, zero padded. Minutes keep counting past 59.
pub fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `M:SS` per kilometer, or `--:--` when the pace is missing, zero or not finite
pub fn format_pace(pace_min_per_km: Option<f64>) -> String {
    match pace_min_per_km {
        Some(pace) if pace.is_finite() && pace > 0.0 => {
            let total_secs = (pace * 60.0).round() as u64;
            format!("{}:{:02}", total_secs / 60, total_secs % 60)
        }
        _ => PACE_PLACEHOLDER.to_string(),
    }
}

/// Kilometers with two decimals, e.g. `6.43 km`
pub fn format_distance(meters: f64) -> String {
    format!("{:.2} km", meters / 1000.0)
}

/// km/h with one decimal, or `--` before any time has elapsed
pub fn format_speed(distance_meters: f64, elapsed_secs: u64) -> String {
    match average_speed_kmh(distance_meters, elapsed_secs) {
        Some(kmh) => format!("{:.1} km/h", kmh),
        None => SPEED_PLACEHOLDER.to_string(),
    }
}
