//! Relative timestamps for project listings.

use chrono::{DateTime, Utc};

/// Coarse "N units ago" label used in project listings. Future timestamps read as
/// zero seconds.
pub fn format_time_ago(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - updated_at).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        format!("{seconds} seconds ago")
    } else if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else {
        format!("{days} days ago")
    }
}
