//! Entity id generation.
//!
//! Every record (user, skill, message, slot, session, rating) gets a UUID v7.
//! The timestamp prefix is load-bearing here, not cosmetic: message listings
//! and per-user skill lists order by a TEXT timestamp column and tie-break on
//! id, so an id minted later has to sort later. Ids derived from collection
//! length or short random strings would also collide after deletions or
//! across restarts; v7 ids cannot.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Mint the id for a new record.
pub fn generate_id() -> Uuid {
    Uuid::now_v7()
}

/// Recover the creation instant embedded in a v7 id (millisecond precision).
/// Returns `None` for id versions that carry no timestamp.
pub fn extract_timestamp(id: Uuid) -> Option<DateTime<Utc>> {
    let (secs, nanos) = id.get_timestamp()?.to_unix();
    DateTime::from_timestamp(secs as i64, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_mint_in_sortable_order() {
        let earlier = generate_id();
        std::thread::sleep(std::time::Duration::from_millis(3));
        let later = generate_id();
        assert!(earlier < later);
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn timestamp_survives_the_round_trip() {
        let before = Utc::now() - chrono::Duration::milliseconds(1);
        let id = generate_id();
        let after = Utc::now() + chrono::Duration::milliseconds(1);

        let minted = extract_timestamp(id).expect("v7 ids carry a timestamp");
        assert!(minted >= before && minted <= after);
    }

    #[test]
    fn random_ids_carry_no_timestamp() {
        assert_eq!(extract_timestamp(Uuid::new_v4()), None);
    }
}
