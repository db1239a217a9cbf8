use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn system_time_from_unix_seconds(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

pub(crate) fn unix_seconds(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

/// Compact age label for a thread row, or `None` when there is nothing
/// sensible to show (no timestamp, or one from the future).
pub fn format_relative_age(updated_at: Option<SystemTime>, now: SystemTime) -> Option<String> {
    let updated_at = updated_at?;
    let seconds = now.duration_since(updated_at).ok()?.as_secs();

    Some(if seconds < 60 {
        "now".to_owned()
    } else if seconds < 60 * 60 {
        format!("{}m", seconds / 60)
    } else if seconds < 60 * 60 * 24 {
        format!("{}h", seconds / (60 * 60))
    } else {
        format!("{}d", seconds / (60 * 60 * 24))
    })
}
