//! Deterministic sample shops served when neither the research API nor the
//! cache can answer a search in time.

use crate::shop::Shop;

const SAMPLE_SHOPS: [(&str, &str, &str, f64, u32, &str); 4] = [
    ("Precision Auto Body", "+1-555-010-0101", "1200 Main Street", 4.8, 312, "collision repair"),
    ("Main Street Collision Center", "+1-555-010-0102", "455 Oak Avenue", 4.6, 198, "dent removal"),
    ("QuickFix Auto Repair", "+1-555-010-0103", "78 Industrial Way", 4.4, 87, "bumper replacement"),
    ("Elite Paint & Body", "+1-555-010-0104", "990 Market Boulevard", 4.7, 241, "paint matching"),
];

/// The fixed fallback dataset. Never empty.
pub fn fallback_shops() -> Vec<Shop> {
    SAMPLE_SHOPS
        .iter()
        .map(|&(name, phone, address, rating, reviews, specialty)| Shop {
            rating: Some(rating),
            review_count: Some(reviews),
            specialties: vec![specialty.to_owned()],
            ..Shop::new(name, phone, address)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_non_empty_and_stable() {
        let first = fallback_shops();
        assert!(!first.is_empty());
        assert_eq!(first, fallback_shops());
        assert!(first.iter().all(Shop::has_phone));
    }
}
