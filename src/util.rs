use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

pub fn closest_id<'a>(query: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default().ignore_case();
    candidates
        .iter()
        .filter_map(|candidate| {
            let score = matcher
                .fuzzy_match(candidate, query)
                .or_else(|| matcher.fuzzy_match(query, candidate))?;
            Some((score, *candidate))
        })
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)))
        .map(|(_, candidate)| candidate)
}

pub fn format_flux(value: f64) -> String {
    if value != 0.0 && (value.abs() >= 1e4 || value.abs() < 1e-3) {
        format!("{value:.3e}")
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_pair_is_bounded_and_repeatable() {
        let (x, y) = stable_pair("PGI");
        assert!((-1.0..=1.0).contains(&x));
        assert!((-1.0..=1.0).contains(&y));
        assert_eq!(stable_pair("PGI"), (x, y));
    }

    #[test]
    fn closest_id_prefers_the_best_match() {
        let known = ["PGI", "PFK", "HEX1", "EX_glc__D_e"];
        assert_eq!(closest_id("hex", &known), Some("HEX1"));
        assert_eq!(closest_id("EX_glc", &known), Some("EX_glc__D_e"));
        assert_eq!(closest_id("zzz", &known), None);
    }

    #[test]
    fn flux_formatting() {
        assert_eq!(format_flux(0.0), "0.0000");
        assert_eq!(format_flux(0.8739), "0.8739");
        assert_eq!(format_flux(1e-5), "1.000e-5");
    }
}
