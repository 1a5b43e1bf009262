//! Synthetic user datasets
//!
//! Deterministic for a given seed, so fixtures can be regenerated.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::user::User;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Ann", "Bo", "Carla", "Dmitri", "Elena", "Femi", "Grace", "Hugo", "Ines",
    "John", "Johanna", "Kenji", "Lena", "Marco", "Nadia", "Omar", "Priya", "Rosa", "Sven",
    "Tara", "Umar", "Vera", "Wen", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Berg", "Costa", "Dubois", "Evans", "Fischer", "Garcia", "Hughes", "Ito", "Johnson",
    "Kowalski", "Larsen", "Moreau", "Nakamura", "Okafor", "Petrov", "Quinn", "Rossi", "Silva",
    "Tanaka", "Urban", "Vidal", "Weber", "Young",
];

/// Generates `count` users from `seed`.
///
/// Birth dates span 1950-01-01 to 2015-12-31; roughly one user in ten has
/// no phone number.
pub fn generate_users(count: usize, seed: u64) -> Vec<User> {
    let mut rng = StdRng::seed_from_u64(seed);
    let earliest = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or_default();
    let span_days = 66 * 365;

    (0..count)
        .map(|i| {
            let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Ann");
            let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Adams");

            let phone = if rng.gen_ratio(1, 10) {
                None
            } else {
                Some(format!(
                    "+1 ({:03}) {:03}-{:04}",
                    rng.gen_range(200..1000),
                    rng.gen_range(0..1000),
                    rng.gen_range(0..10000)
                ))
            };

            User {
                id: i as u64 + 1,
                first_name: first.to_string(),
                last_name: last.to_string(),
                phone,
                date_of_birth: Some(earliest + Duration::days(rng.gen_range(0..span_days))),
                is_active: rng.gen_bool(0.6),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        assert_eq!(generate_users(50, 7), generate_users(50, 7));
        assert_ne!(generate_users(50, 7), generate_users(50, 8));
    }

    #[test]
    fn test_generate_ids_and_dates() {
        let users = generate_users(200, 1);
        assert_eq!(users.len(), 200);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[199].id, 200);

        let latest = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        assert!(users
            .iter()
            .all(|u| u.date_of_birth.map_or(false, |d| d < latest)));
    }
}
