//! Age-banded nap table.

use serde::Serialize;

/// Nap expectations for one age band.
///
/// `wake_windows` has one more entry than `nap_durations`: the last window
/// runs from the final nap to bedtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBand {
    /// Inclusive upper bound in months; `None` for the open-ended last band.
    pub max_age_months: Option<u32>,
    pub recommended_naps: u8,
    pub wake_windows: &'static [u32],
    pub nap_durations: &'static [u32],
}

pub const AGE_BANDS: [AgeBand; 5] = [
    AgeBand {
        max_age_months: Some(3),
        recommended_naps: 4,
        wake_windows: &[60, 75, 75, 90, 90],
        nap_durations: &[60, 45, 45, 30],
    },
    AgeBand {
        max_age_months: Some(5),
        recommended_naps: 3,
        wake_windows: &[105, 120, 120, 135],
        nap_durations: &[75, 60, 45],
    },
    AgeBand {
        max_age_months: Some(8),
        recommended_naps: 2,
        wake_windows: &[150, 180, 195],
        nap_durations: &[90, 75],
    },
    AgeBand {
        max_age_months: Some(14),
        recommended_naps: 2,
        wake_windows: &[165, 210, 225],
        nap_durations: &[90, 75],
    },
    AgeBand {
        max_age_months: None,
        recommended_naps: 1,
        wake_windows: &[300, 330],
        nap_durations: &[120],
    },
];

/// The band covering `age_months`. Bands do not overlap.
pub fn band_for_age(age_months: u32) -> &'static AgeBand {
    AGE_BANDS
        .iter()
        .find(|b| b.max_age_months.map_or(true, |max| age_months <= max))
        .unwrap_or(&AGE_BANDS[AGE_BANDS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_shapes_are_consistent() {
        for band in &AGE_BANDS {
            assert_eq!(band.nap_durations.len(), band.recommended_naps as usize);
            assert_eq!(band.wake_windows.len(), band.recommended_naps as usize + 1);
        }
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(band_for_age(0).recommended_naps, 4);
        assert_eq!(band_for_age(3).recommended_naps, 4);
        assert_eq!(band_for_age(4).recommended_naps, 3);
        assert_eq!(band_for_age(5).recommended_naps, 3);
        assert_eq!(band_for_age(6).recommended_naps, 2);
        assert_eq!(band_for_age(14).max_age_months, Some(14));
        assert_eq!(band_for_age(15).recommended_naps, 1);
        assert_eq!(band_for_age(240).recommended_naps, 1);
    }
}
