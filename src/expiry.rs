use chrono::{DateTime, Duration, Utc};

/// Compute the effective expiration instant of a session.
///
/// The idle expiry (`now + idle_timeout_seconds`) extends on every
/// access, but can never push the session past its absolute expiry
/// (`created_at + absolute_timeout_seconds`). The result is the minimum
/// of the two, bounding total session lifetime even under continuous
/// activity.
///
/// # Example
///
/// ```rust
/// # use chrono::{Duration, Utc};
/// # use stored_session::compute_expiry;
/// let created_at = Utc::now();
/// let (idle, absolute) = (20, 30);
///
/// // Right after creation the idle rule wins.
/// assert_eq!(
///     compute_expiry(created_at, idle, absolute, created_at),
///     created_at + Duration::seconds(idle),
/// );
///
/// // One second before the absolute deadline, the idle extension is
/// // capped by it.
/// let now = created_at + Duration::seconds(absolute - 1);
/// assert_eq!(
///     compute_expiry(created_at, idle, absolute, now),
///     created_at + Duration::seconds(absolute),
/// );
/// ```
pub fn compute_expiry(
    created_at: DateTime<Utc>,
    idle_timeout_seconds: i64,
    absolute_timeout_seconds: i64,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let idle_expiry = now + Duration::seconds(idle_timeout_seconds);
    let absolute_expiry = created_at + Duration::seconds(absolute_timeout_seconds);
    idle_expiry.min(absolute_expiry)
}
