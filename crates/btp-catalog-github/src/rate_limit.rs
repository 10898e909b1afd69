use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Slack added on top of the advertised reset time.
const RESET_SLACK_SECS: i64 = 2;

/// How long to wait before retrying, if this response is an exhausted quota.
///
/// Only a `403` whose remaining-requests header reads `0` qualifies. The
/// wait is `max(1, reset - now + 2)` seconds; a missing or unreadable reset
/// header counts as `0`.
pub fn retry_delay(status: StatusCode, headers: &HeaderMap, now_epoch: i64) -> Option<Duration> {
    if status != StatusCode::FORBIDDEN {
        return None;
    }

    let remaining = headers.get(REMAINING_HEADER)?.to_str().ok()?;
    if remaining.trim() != "0" {
        return None;
    }

    let reset = headers
        .get(RESET_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0);

    Some(Duration::from_secs(sleep_secs(reset, now_epoch)))
}

fn sleep_secs(reset_epoch: i64, now_epoch: i64) -> u64 {
    let wait = reset_epoch
        .saturating_sub(now_epoch)
        .saturating_add(RESET_SLACK_SECS);
    wait.max(1) as u64
}
