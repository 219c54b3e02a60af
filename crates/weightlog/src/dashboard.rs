//! Dashboard views built from typed records.
//!
//! These are the summaries shown by `wlog dashboard`, `wlog trend` and
//! `wlog journal`: weight trends, logging consistency, nutrient balance and
//! the meal photo journal.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::records::{MealRecord, PhotoRecord, WeightRecord, WeightUnit};

/// Weekday labels for heatmap rows.
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A single point of a weight trend, in the trend's unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Day of the measurement.
    pub date: NaiveDate,
    /// Weight in the trend's unit.
    pub weight: f64,
    /// Waist in centimetres.
    pub waist_cm: Option<f64>,
}

/// Weight trend over the most recent entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTrend {
    /// Unit of every weight in the trend.
    pub unit: WeightUnit,
    /// Points in chronological order.
    pub points: Vec<TrendPoint>,
    /// Most recent weight.
    pub current: f64,
    /// Oldest weight in the window.
    pub start: f64,
    /// `current - start`.
    pub total_change: f64,
    /// Mean of the most recent entries.
    pub moving_average: Option<f64>,
}

impl WeightTrend {
    /// Build a trend over the last `window` entries.
    ///
    /// Entries are ordered by date (ties keep file order) and converted to
    /// `unit`. `moving_average` is the mean of the last `average_over`
    /// entries. Returns `None` when there are no entries or `window` is 0.
    #[must_use]
    pub fn from_records(
        records: &[WeightRecord],
        unit: WeightUnit,
        window: usize,
        average_over: usize,
    ) -> Option<Self> {
        let mut sorted: Vec<&WeightRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.date);

        let skip = sorted.len().saturating_sub(window);
        let points: Vec<TrendPoint> = sorted
            .into_iter()
            .skip(skip)
            .map(|r| TrendPoint {
                date: r.date,
                weight: r.weight_in(unit),
                waist_cm: r.waist_cm,
            })
            .collect();

        let current = points.last()?.weight;
        let start = points.first()?.weight;
        let weights: Vec<f64> = points.iter().rev().map(|p| p.weight).collect();

        Some(Self {
            unit,
            current,
            start,
            total_change: current - start,
            moving_average: moving_average(&weights, average_over),
            points,
        })
    }
}

/// Mean of the first `n` values (most recent first), or `None` if there are
/// none.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn moving_average(values: &[f64], n: usize) -> Option<f64> {
    if values.is_empty() || n == 0 {
        return None;
    }
    let count = values.len().min(n);
    let sum: f64 = values.iter().take(count).sum();
    Some(sum / count as f64)
}

/// Number of distinct days with at least one meal.
#[must_use]
pub fn days_with_logs(meals: &[MealRecord]) -> usize {
    meals.iter().map(|m| m.date).collect::<BTreeSet<_>>().len()
}

/// Meal counts per ISO week and weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyHeatmap {
    /// `(iso_year, iso_week)` of each column, in order.
    pub weeks: Vec<(i32, u32)>,
    /// Per column, meal counts Monday through Sunday.
    pub counts: Vec<[u32; 7]>,
}

impl ConsistencyHeatmap {
    /// Count meals into week columns.
    #[must_use]
    pub fn from_meals(meals: &[MealRecord]) -> Self {
        let mut grid: BTreeMap<(i32, u32), [u32; 7]> = BTreeMap::new();
        for meal in meals {
            let week = meal.date.iso_week();
            let day = meal.date.weekday().num_days_from_monday() as usize;
            grid.entry((week.year(), week.week())).or_default()[day] += 1;
        }

        let (weeks, counts) = grid.into_iter().unzip();
        Self { weeks, counts }
    }

    /// Check if no meals were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Count for a given week column and weekday (0 = Monday).
    #[must_use]
    pub fn count(&self, iso_year: i32, iso_week: u32, weekday: usize) -> u32 {
        self.weeks
            .iter()
            .position(|&w| w == (iso_year, iso_week))
            .and_then(|i| self.counts[i].get(weekday).copied())
            .unwrap_or(0)
    }

    /// Render as a text grid: one row per weekday, one column per week.
    ///
    /// Cells show the meal count, or `.` for none; counts above 9 show `+`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("    ");
        for (_, week) in &self.weeks {
            let _ = write!(out, " W{week:02}");
        }
        out.push('\n');

        for (day, label) in WEEKDAYS.iter().enumerate() {
            out.push_str(label);
            out.push(' ');
            for column in &self.counts {
                let cell = match column[day] {
                    0 => ".".to_string(),
                    n @ 1..=9 => n.to_string(),
                    _ => "+".to_string(),
                };
                let _ = write!(out, " {cell:>3}");
            }
            out.push('\n');
        }
        out
    }
}

/// Protein and fiber eaten on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientDay {
    /// The day.
    pub date: NaiveDate,
    /// Protein in grams.
    pub protein_g: f64,
    /// Fiber in grams.
    pub fiber_g: f64,
}

/// Daily protein and fiber totals in date order.
#[must_use]
pub fn nutrient_balance(meals: &[MealRecord]) -> Vec<NutrientDay> {
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for meal in meals {
        let totals = days.entry(meal.date).or_default();
        totals.0 += meal.protein_g;
        totals.1 += meal.fiber_g;
    }
    days.into_iter()
        .map(|(date, (protein_g, fiber_g))| NutrientDay {
            date,
            protein_g,
            fiber_g,
        })
        .collect()
}

/// One entry of the meal photo journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    /// Day of the meal.
    pub date: NaiveDate,
    /// `"<meal> - <date> (<portion>)"`.
    pub caption: String,
    /// Hosted URL or local path of the meal's photo.
    pub photo: Option<String>,
}

/// Meals newest first, joined with their photo locations.
///
/// Newest means last appended. Meals whose photo was never uploaded have no
/// location.
#[must_use]
pub fn photo_journal(meals: &[MealRecord], photos: &[PhotoRecord]) -> Vec<JournalEntry> {
    let locations: HashMap<&str, &str> = photos
        .iter()
        .filter_map(|p| p.url.as_deref().map(|url| (p.photo_ref.as_str(), url)))
        .collect();

    meals
        .iter()
        .rev()
        .map(|meal| JournalEntry {
            date: meal.date,
            caption: meal.caption(),
            photo: meal
                .photo_ref
                .as_deref()
                .and_then(|r| locations.get(r))
                .map(|url| (*url).to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weight(d: &str, w: f64, unit: WeightUnit) -> WeightRecord {
        WeightRecord::new(date(d), w, unit).unwrap()
    }

    fn meal(d: &str, name: &str) -> MealRecord {
        MealRecord::new(date(d), name, 400).unwrap()
    }

    #[test]
    fn test_trend_of_no_entries_is_none() {
        assert!(WeightTrend::from_records(&[], WeightUnit::Kg, 90, 7).is_none());
        let one = [weight("2024-01-01", 80.0, WeightUnit::Kg)];
        assert!(WeightTrend::from_records(&one, WeightUnit::Kg, 0, 7).is_none());
    }

    #[test]
    fn test_trend_scenario_in_pounds() {
        let records = [
            weight("2024-01-01", 180.0, WeightUnit::Lb),
            weight("2024-01-02", 178.0, WeightUnit::Lb),
        ];
        let trend = WeightTrend::from_records(&records, WeightUnit::Lb, 90, 7).unwrap();
        let values: Vec<f64> = trend.points.iter().map(|p| p.weight).collect();
        assert_eq!(values, vec![180.0, 178.0]);
        assert!((trend.total_change + 2.0).abs() < 1e-9);
        assert!((trend.moving_average.unwrap() - 179.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_sorts_and_windows() {
        let records = [
            weight("2024-01-03", 79.0, WeightUnit::Kg),
            weight("2024-01-01", 81.0, WeightUnit::Kg),
            weight("2024-01-02", 80.0, WeightUnit::Kg),
        ];
        let trend = WeightTrend::from_records(&records, WeightUnit::Kg, 2, 7).unwrap();
        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.points[0].date, date("2024-01-02"));
        assert!((trend.start - 80.0).abs() < f64::EPSILON);
        assert!((trend.current - 79.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trend_converts_mixed_units() {
        let records = [
            weight("2024-01-01", 100.0, WeightUnit::Kg),
            weight("2024-01-02", 220.0, WeightUnit::Lb),
        ];
        let trend = WeightTrend::from_records(&records, WeightUnit::Kg, 90, 7).unwrap();
        assert!((trend.current - 99.790_321_4).abs() < 1e-6);
        assert_eq!(trend.unit, WeightUnit::Kg);
    }

    #[test]
    fn test_moving_average_uses_most_recent() {
        assert_eq!(moving_average(&[], 7), None);
        assert_eq!(moving_average(&[1.0], 0), None);
        assert_eq!(moving_average(&[3.0, 1.0, 100.0], 2), Some(2.0));
    }

    #[test]
    fn test_days_with_logs() {
        assert_eq!(days_with_logs(&[]), 0);
        let meals = [
            meal("2024-01-01", "a"),
            meal("2024-01-01", "b"),
            meal("2024-01-05", "c"),
        ];
        assert_eq!(days_with_logs(&meals), 2);
    }

    #[test]
    fn test_heatmap_counts() {
        // 2024-01-01 is a Monday in ISO week 1; 2024-01-10 is a Wednesday in week 2.
        let meals = [
            meal("2024-01-01", "a"),
            meal("2024-01-01", "b"),
            meal("2024-01-10", "c"),
        ];
        let heatmap = ConsistencyHeatmap::from_meals(&meals);
        assert_eq!(heatmap.weeks, vec![(2024, 1), (2024, 2)]);
        assert_eq!(heatmap.count(2024, 1, 0), 2);
        assert_eq!(heatmap.count(2024, 2, 2), 1);
        assert_eq!(heatmap.count(2024, 2, 0), 0);
        assert_eq!(heatmap.count(2023, 52, 0), 0);
    }

    #[test]
    fn test_heatmap_render() {
        let heatmap = ConsistencyHeatmap::from_meals(&[meal("2024-01-01", "a")]);
        let text = heatmap.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains("W01"));
        assert!(lines[1].starts_with("Mon"));
        assert!(lines[1].trim_end().ends_with('1'));
        assert!(lines[2].trim_end().ends_with('.'));
    }

    #[test]
    fn test_empty_heatmap() {
        let heatmap = ConsistencyHeatmap::from_meals(&[]);
        assert!(heatmap.is_empty());
    }

    #[test]
    fn test_nutrient_balance() {
        let meals = [
            meal("2024-01-02", "a").with_nutrients(30.0, 5.0),
            meal("2024-01-01", "b").with_nutrients(10.0, 2.0),
            meal("2024-01-02", "c").with_nutrients(20.0, 1.0),
        ];
        let days = nutrient_balance(&meals);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date("2024-01-01"));
        assert!((days[1].protein_g - 50.0).abs() < f64::EPSILON);
        assert!((days[1].fiber_g - 6.0).abs() < f64::EPSILON);
        assert!(nutrient_balance(&[]).is_empty());
    }

    #[test]
    fn test_photo_journal_newest_first_with_locations() {
        let hash = "c".repeat(64);
        let meals = [
            meal("2024-01-01", "Oats"),
            meal("2024-01-02", "Salad").with_photo_ref(hash.clone()),
            meal("2024-01-03", "Soup").with_photo_ref("d".repeat(64)),
        ];
        let photos = [
            PhotoRecord::new(
                date("2024-01-02"),
                hash,
                Some("https://img.example/salad.jpg".to_string()),
                "Salad",
            )
            .unwrap(),
            PhotoRecord::new(date("2024-01-03"), "d".repeat(64), None, "Soup").unwrap(),
        ];

        let journal = photo_journal(&meals, &photos);
        assert_eq!(journal.len(), 3);
        assert_eq!(journal[0].caption, "Soup - 2024-01-03 (Medium)");
        assert_eq!(journal[0].photo, None);
        assert_eq!(
            journal[1].photo.as_deref(),
            Some("https://img.example/salad.jpg")
        );
        assert_eq!(journal[2].photo, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_moving_average_equals_mean_of_recent(
            values in prop::collection::vec(20.0f64..300.0, 1..50),
            n in 1usize..20
        ) {
            let avg = moving_average(&values, n).unwrap();
            let count = values.len().min(n);
            #[allow(clippy::cast_precision_loss)]
            let expected = values.iter().take(count).sum::<f64>() / count as f64;
            prop_assert!((avg - expected).abs() < 1e-9);
        }
    }
}
