//! Dashboard statistics

use serde::Serialize;
use std::collections::BTreeSet;

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_places: usize,
    pub active_places: usize,
    pub total_users: i64,
    /// Distinct non-empty cities
    pub cities: usize,
}

impl DashboardStats {
    /// Fold the three independent reads into the dashboard numbers
    pub fn compute(active_flags: &[bool], total_users: i64, cities: &[Option<String>]) -> Self {
        let distinct_cities: BTreeSet<&str> = cities
            .iter()
            .filter_map(|city| city.as_deref())
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .collect();

        Self {
            total_places: active_flags.len(),
            active_places: active_flags.iter().filter(|active| **active).count(),
            total_users,
            cities: distinct_cities.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute() {
        let cities = vec![
            Some("Miami".to_string()),
            Some("Lisbon".to_string()),
            Some("Miami".to_string()),
            Some("  ".to_string()),
            None,
        ];

        let stats = DashboardStats::compute(&[true, false, true, true, false], 12, &cities);

        assert_eq!(
            stats,
            DashboardStats {
                total_places: 5,
                active_places: 3,
                total_users: 12,
                cities: 2,
            }
        );
    }

    #[test]
    fn test_compute_empty() {
        assert_eq!(DashboardStats::compute(&[], 0, &[]), DashboardStats::default());
    }
}
