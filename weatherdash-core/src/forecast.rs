//! Daily forecast aggregation.
//!
//! Collapses the provider's flat 3-hour forecast listing into at most
//! five per-day summaries: mean temperature, the most common icon and
//! description, and mean humidity/wind where the samples carry them.

use chrono::{DateTime, Local, TimeZone};

use crate::model::{DaySummary, ForecastSample};

/// Upper bound on emitted day summaries. The provider's forecast horizon
/// is five days at 3-hour resolution (up to 40 samples); the last
/// calendar day is typically partial and is still summarized.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Aggregate forecast samples into daily summaries, grouping by the
/// calendar date in the caller's local timezone.
pub fn aggregate(samples: &[ForecastSample]) -> Vec<DaySummary> {
    aggregate_in(samples, &Local)
}

/// Timezone-explicit variant of [`aggregate`]. Fully deterministic given
/// the input and `tz`.
///
/// Samples are grouped by the `YYYY-MM-DD` date their timestamp falls on
/// in `tz`, preserving first-seen day order (chronological for provider
/// input), then truncated to [`MAX_FORECAST_DAYS`] groups.
pub fn aggregate_in<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<DaySummary>
where
    Tz::Offset: std::fmt::Display,
{
    let mut days: Vec<DayGroup> = Vec::new();

    for sample in samples {
        let Some(utc) = DateTime::from_timestamp(sample.timestamp, 0) else {
            tracing::debug!(timestamp = sample.timestamp, "skipping out-of-range timestamp");
            continue;
        };
        let local = utc.with_timezone(tz);
        let day_key = local.format("%Y-%m-%d").to_string();

        match days.iter().position(|g| g.day_key == day_key) {
            Some(i) => days[i].push(sample),
            None => {
                let mut group = DayGroup::new(
                    day_key,
                    local.format("%a").to_string(),
                    local.format("%b %-d").to_string(),
                );
                group.push(sample);
                days.push(group);
            }
        }
    }

    days.truncate(MAX_FORECAST_DAYS);
    days.into_iter().map(DayGroup::summarize).collect()
}

/// All samples of one calendar day, collected before summarizing.
struct DayGroup {
    day_key: String,
    label: String,
    display_date: String,
    temps: Vec<f64>,
    icons: Vec<String>,
    descriptions: Vec<String>,
    humidity: Vec<f64>,
    wind: Vec<f64>,
}

impl DayGroup {
    fn new(day_key: String, label: String, display_date: String) -> Self {
        Self {
            day_key,
            label,
            display_date,
            temps: Vec::new(),
            icons: Vec::new(),
            descriptions: Vec::new(),
            humidity: Vec::new(),
            wind: Vec::new(),
        }
    }

    fn push(&mut self, sample: &ForecastSample) {
        self.temps.push(sample.temperature_c);
        self.icons.push(sample.icon.clone());
        self.descriptions.push(sample.description.clone());
        if let Some(h) = sample.humidity_pct {
            self.humidity.push(f64::from(h));
        }
        if let Some(w) = sample.wind_speed_mps {
            self.wind.push(w);
        }
    }

    fn summarize(self) -> DaySummary {
        let icon = mode_first(&self.icons).unwrap_or_default().to_string();
        let description = mode_first(&self.descriptions).unwrap_or_default().to_string();

        DaySummary {
            day_key: self.day_key,
            label: self.label,
            display_date: self.display_date,
            // f64::round ties away from zero.
            mean_temp_c: mean(&self.temps).round() as i32,
            icon,
            description,
            mean_humidity_pct: (!self.humidity.is_empty())
                .then(|| mean(&self.humidity).round() as u8),
            mean_wind_speed_mps: (!self.wind.is_empty())
                .then(|| (mean(&self.wind) * 10.0).round() / 10.0),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Most frequent value; ties go to the value whose first occurrence is
/// earliest. Icon selection is visually load-bearing, so the tie-break
/// must stay stable by input order, not lexicographic.
fn mode_first(values: &[String]) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (i, value) in values.iter().enumerate() {
        if values[..i].contains(value) {
            continue;
        }
        let count = values.iter().filter(|v| *v == value).count();
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// 2023-06-01 00:00:00 UTC.
    const DAY_ONE: i64 = 1_685_577_600;
    const THREE_HOURS: i64 = 3 * 3600;
    const ONE_DAY: i64 = 24 * 3600;

    fn sample(timestamp: i64, temp: f64, icon: &str, description: &str) -> ForecastSample {
        ForecastSample {
            timestamp,
            temperature_c: temp,
            humidity_pct: None,
            wind_speed_mps: None,
            icon: icon.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_in(&[], &Utc).is_empty());
    }

    #[test]
    fn groups_two_days_and_averages_each() {
        let samples = vec![
            sample(DAY_ONE, 10.0, "01d", "clear sky"),
            sample(DAY_ONE + THREE_HOURS, 12.0, "01d", "clear sky"),
            sample(DAY_ONE + 2 * THREE_HOURS, 14.0, "01d", "clear sky"),
            sample(DAY_ONE + ONE_DAY, 20.0, "02d", "few clouds"),
            sample(DAY_ONE + ONE_DAY + THREE_HOURS, 22.0, "02d", "few clouds"),
        ];

        let days = aggregate_in(&samples, &Utc);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_key, "2023-06-01");
        assert_eq!(days[0].mean_temp_c, 12);
        assert_eq!(days[1].day_key, "2023-06-02");
        assert_eq!(days[1].mean_temp_c, 21);
    }

    #[test]
    fn day_labels_follow_grouping_timezone() {
        let days = aggregate_in(&[sample(DAY_ONE, 18.0, "01d", "clear sky")], &Utc);
        assert_eq!(days[0].label, "Thu");
        assert_eq!(days[0].display_date, "Jun 1");
    }

    #[test]
    fn mode_tie_breaks_by_first_occurrence() {
        let samples = vec![
            sample(DAY_ONE, 10.0, "a", "x"),
            sample(DAY_ONE + THREE_HOURS, 10.0, "b", "y"),
            sample(DAY_ONE + 2 * THREE_HOURS, 10.0, "a", "y"),
            sample(DAY_ONE + 3 * THREE_HOURS, 10.0, "b", "x"),
        ];

        let days = aggregate_in(&samples, &Utc);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].icon, "a");
        assert_eq!(days[0].description, "x");
    }

    #[test]
    fn icon_and_description_modes_are_independent() {
        let samples = vec![
            sample(DAY_ONE, 10.0, "10d", "light rain"),
            sample(DAY_ONE + THREE_HOURS, 10.0, "10d", "overcast clouds"),
            sample(DAY_ONE + 2 * THREE_HOURS, 10.0, "04d", "overcast clouds"),
        ];

        let days = aggregate_in(&samples, &Utc);
        assert_eq!(days[0].icon, "10d");
        assert_eq!(days[0].description, "overcast clouds");
    }

    #[test]
    fn truncates_to_five_days_keeping_the_earliest() {
        let samples: Vec<_> = (0..6)
            .map(|d| sample(DAY_ONE + d * ONE_DAY, 15.0, "01d", "clear sky"))
            .collect();

        let days = aggregate_in(&samples, &Utc);
        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        assert_eq!(days[0].day_key, "2023-06-01");
        assert_eq!(days[4].day_key, "2023-06-05");
    }

    #[test]
    fn output_is_bounded_by_distinct_days() {
        let samples: Vec<_> = (0..8)
            .map(|i| sample(DAY_ONE + i * THREE_HOURS, 15.0, "01d", "clear sky"))
            .collect();

        let days = aggregate_in(&samples, &Utc);
        assert!(days.len() <= MAX_FORECAST_DAYS);
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn mean_temperature_rounds_half_away_from_zero() {
        let warm = aggregate_in(
            &[
                sample(DAY_ONE, 12.0, "01d", "clear sky"),
                sample(DAY_ONE + THREE_HOURS, 13.0, "01d", "clear sky"),
            ],
            &Utc,
        );
        assert_eq!(warm[0].mean_temp_c, 13);

        let cold = aggregate_in(
            &[
                sample(DAY_ONE, -12.0, "13d", "snow"),
                sample(DAY_ONE + THREE_HOURS, -13.0, "13d", "snow"),
            ],
            &Utc,
        );
        assert_eq!(cold[0].mean_temp_c, -13);
    }

    #[test]
    fn humidity_and_wind_average_over_carrying_samples_only() {
        let mut first = sample(DAY_ONE, 10.0, "01d", "clear sky");
        first.humidity_pct = Some(60);
        first.wind_speed_mps = Some(3.0);
        let mut second = sample(DAY_ONE + THREE_HOURS, 10.0, "01d", "clear sky");
        second.humidity_pct = Some(71);
        let third = sample(DAY_ONE + 2 * THREE_HOURS, 10.0, "01d", "clear sky");

        let days = aggregate_in(&[first, second, third], &Utc);
        assert_eq!(days[0].mean_humidity_pct, Some(66));
        assert_eq!(days[0].mean_wind_speed_mps, Some(3.0));
    }

    #[test]
    fn wind_mean_keeps_one_decimal() {
        let mut first = sample(DAY_ONE, 10.0, "01d", "clear sky");
        first.wind_speed_mps = Some(3.2);
        let mut second = sample(DAY_ONE + THREE_HOURS, 10.0, "01d", "clear sky");
        second.wind_speed_mps = Some(3.4);

        let days = aggregate_in(&[first, second], &Utc);
        assert_eq!(days[0].mean_wind_speed_mps, Some(3.3));
    }

    #[test]
    fn fields_absent_when_no_sample_carries_them() {
        let days = aggregate_in(&[sample(DAY_ONE, 10.0, "01d", "clear sky")], &Utc);
        assert_eq!(days[0].mean_humidity_pct, None);
        assert_eq!(days[0].mean_wind_speed_mps, None);
    }

    #[test]
    fn grouping_timezone_shifts_day_boundaries() {
        use chrono::FixedOffset;

        // 23:00 UTC is already the next day at UTC+5.
        let late = sample(DAY_ONE + 23 * 3600, 10.0, "01d", "clear sky");
        let next = sample(DAY_ONE + ONE_DAY + 3600, 12.0, "01d", "clear sky");

        let utc_days = aggregate_in(&[late.clone(), next.clone()], &Utc);
        assert_eq!(utc_days.len(), 2);

        let plus_five = FixedOffset::east_opt(5 * 3600).expect("valid offset");
        let shifted = aggregate_in(&[late, next], &plus_five);
        assert_eq!(shifted.len(), 1);
        assert_eq!(shifted[0].day_key, "2023-06-02");
    }

    #[test]
    fn group_means_weighted_by_count_reconstruct_overall_mean() {
        let samples: Vec<_> = (0..10)
            .map(|i| {
                sample(
                    DAY_ONE + i * THREE_HOURS,
                    10.0 + i as f64 * 1.7,
                    "01d",
                    "clear sky",
                )
            })
            .collect();
        let overall = samples.iter().map(|s| s.temperature_c).sum::<f64>() / samples.len() as f64;

        let days = aggregate_in(&samples, &Utc);
        let counts: Vec<f64> = days
            .iter()
            .map(|d| {
                samples
                    .iter()
                    .filter(|s| {
                        DateTime::from_timestamp(s.timestamp, 0)
                            .expect("valid timestamp")
                            .format("%Y-%m-%d")
                            .to_string()
                            == d.day_key
                    })
                    .count() as f64
            })
            .collect();
        let total: f64 = counts.iter().sum();
        let weighted: f64 = days
            .iter()
            .zip(&counts)
            .map(|(d, c)| f64::from(d.mean_temp_c) * c)
            .sum::<f64>()
            / total;

        // Each group mean is rounded to an integer, so the reconstruction
        // can be off by at most half a degree.
        assert!((weighted - overall).abs() <= 0.5);
    }
}
