use anyhow::{Result, ensure};
use indexmap::IndexMap;

/// Fluxes at or below this magnitude get no overlay.
pub const ZERO: f64 = 1e-9;

pub const DEFAULT_WIDTH_MIN: f32 = 5.0;
pub const DEFAULT_WIDTH_MAX: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidthRange {
    min: f32,
    max: f32,
}

impl WidthRange {
    pub fn new(min: f32, max: f32) -> Result<Self> {
        ensure!(
            min.is_finite() && max.is_finite(),
            "edge width bounds must be finite, got {min}..{max}"
        );
        ensure!(min >= 0.0, "minimum edge width must not be negative, got {min}");
        ensure!(min <= max, "minimum edge width {min} exceeds maximum {max}");
        Ok(Self { min, max })
    }

    pub fn min(self) -> f32 {
        self.min
    }

    pub fn max(self) -> f32 {
        self.max
    }
}

impl Default for WidthRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_WIDTH_MIN,
            max: DEFAULT_WIDTH_MAX,
        }
    }
}

/// Maps flux magnitudes onto `range` by min-max normalization.
///
/// Only fluxes with `|flux| > ZERO` appear in the result. When every kept flux
/// has the same magnitude they all get `range.max()`.
pub fn scale_fluxes<'a>(
    fluxes: impl IntoIterator<Item = (&'a str, f64)>,
    range: WidthRange,
) -> IndexMap<String, f32> {
    let nonzero = fluxes
        .into_iter()
        .map(|(id, flux)| (id, flux.abs()))
        .filter(|(_, magnitude)| *magnitude > ZERO)
        .collect::<Vec<_>>();

    let Some(min) = nonzero.iter().map(|(_, magnitude)| *magnitude).reduce(f64::min) else {
        return IndexMap::new();
    };
    let max = nonzero
        .iter()
        .map(|(_, magnitude)| *magnitude)
        .fold(min, f64::max);

    let span = f64::from(range.max - range.min);
    nonzero
        .into_iter()
        .map(|(id, magnitude)| {
            let width = if max != min {
                f64::from(range.min) + span * (magnitude - min) / (max - min)
            } else {
                f64::from(range.max)
            };
            (id.to_owned(), width as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(fluxes: &[(&'static str, f64)]) -> IndexMap<String, f32> {
        scale_fluxes(fluxes.iter().copied(), WidthRange::default())
    }

    #[test]
    fn spreads_over_the_width_range() {
        let scaled = widths(&[("A", 2.0), ("B", 4.0), ("C", 2.0)]);
        assert_eq!(scaled.get("A"), Some(&5.0));
        assert_eq!(scaled.get("B"), Some(&15.0));
        assert_eq!(scaled.get("C"), Some(&5.0));
    }

    #[test]
    fn equal_fluxes_take_the_maximum_width() {
        let scaled = widths(&[("A", 3.0), ("B", 3.0)]);
        assert_eq!(scaled.get("A"), Some(&15.0));
        assert_eq!(scaled.get("B"), Some(&15.0));
    }

    #[test]
    fn near_zero_fluxes_are_dropped() {
        let scaled = widths(&[("A", 1e-10), ("B", -1e-9), ("C", 1.0)]);
        assert!(!scaled.contains_key("A"));
        assert!(!scaled.contains_key("B"));
        assert_eq!(scaled.get("C"), Some(&15.0));
    }

    #[test]
    fn empty_input_gives_empty_mapping() {
        assert!(widths(&[]).is_empty());
        assert!(widths(&[("A", 0.0)]).is_empty());
    }

    #[test]
    fn negative_fluxes_scale_by_magnitude() {
        let scaled = widths(&[("fwd", 1.0), ("rev", -3.0), ("mid", 2.0)]);
        assert_eq!(scaled.get("fwd"), Some(&5.0));
        assert_eq!(scaled.get("rev"), Some(&15.0));
        assert_eq!(scaled.get("mid"), Some(&10.0));
    }

    #[test]
    fn result_does_not_depend_on_input_order() {
        let forward = widths(&[("A", 1.0), ("B", 5.0), ("C", 3.0)]);
        let backward = widths(&[("C", 3.0), ("B", 5.0), ("A", 1.0)]);
        for (id, width) in &forward {
            assert_eq!(backward.get(id), Some(width));
        }
    }

    #[test]
    fn custom_range_is_respected() {
        let range = WidthRange::new(1.0, 3.0).unwrap();
        let scaled = scale_fluxes([("A", 10.0), ("B", 20.0)], range);
        assert_eq!(scaled.get("A"), Some(&1.0));
        assert_eq!(scaled.get("B"), Some(&3.0));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(WidthRange::new(15.0, 5.0).is_err());
        assert!(WidthRange::new(f32::NAN, 5.0).is_err());
    }
}
