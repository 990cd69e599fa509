//! Bug tracker domain models

pub mod bug;
pub mod role;
pub mod user;

use chrono::{DateTime, Duration, Utc};

// Re-export for convenience
pub use bug::{
    Bug, BugCriteria, BugDetails, NewBug, Priority, SearchableBugField, Status, UnknownVariant,
};
pub use role::Role;
pub use user::{NewUser, ProfileUpdate, UpdateUser, User};

/// Timestamp for a mutation of a record last touched at `previous`
///
/// Always strictly later than `previous`, even if the clock has not
/// advanced since.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_timestamp_is_strictly_later() {
        let future = Utc::now() + Duration::seconds(60);
        assert!(next_timestamp(future) > future);

        let past = Utc::now() - Duration::seconds(60);
        assert!(next_timestamp(past) > past);
    }
}
