//! Record types for weightlog.
//!
//! Each record kind is a flat struct whose fields map one-to-one, in order,
//! onto the columns of its CSV file. Records are validated when they are
//! constructed and again before the store writes them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of a hex-encoded BLAKE3 hash.
const PHOTO_REF_LEN: usize = 64;

/// The kinds of records kept by the store, one CSV file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Meals and snacks.
    Meal,
    /// Weight and waist measurements.
    Weight,
    /// Photo metadata linked to meals.
    Photo,
    /// Daily habit check-ins.
    Habit,
}

impl RecordKind {
    /// All record kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Meal, Self::Weight, Self::Photo, Self::Habit];

    /// File name of this kind's log inside the data directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Meal => "meal_logs.csv",
            Self::Weight => "weight_logs.csv",
            Self::Photo => "photo_logs.csv",
            Self::Habit => "habit_logs.csv",
        }
    }

    /// Canonical column names, in file order.
    #[must_use]
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Meal => &[
                "date",
                "meal",
                "portion",
                "calories",
                "photo_ref",
                "food_quality",
                "protein_g",
                "fiber_g",
                "mood_before",
                "mood_after",
                "hunger_before",
                "hunger_after",
            ],
            Self::Weight => &["date", "weight", "unit", "waist_cm"],
            Self::Photo => &["date", "photo_ref", "url", "meal"],
            Self::Habit => &["date", "walk", "water", "fruit", "custom_habit", "reflection"],
        }
    }

    /// Columns that can be reduced numerically.
    ///
    /// Boolean habit columns count as 0 or 1.
    #[must_use]
    pub fn numeric_columns(self) -> &'static [&'static str] {
        match self {
            Self::Meal => &[
                "calories",
                "protein_g",
                "fiber_g",
                "hunger_before",
                "hunger_after",
            ],
            Self::Weight => &["weight", "waist_cm"],
            Self::Photo => &[],
            Self::Habit => &["walk", "water", "fruit"],
        }
    }

    /// Check whether `column` belongs to this kind's schema.
    #[must_use]
    pub fn has_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Parse and validate one raw CSV row as this kind's typed record.
    ///
    /// `headers` must be the canonical header of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if a cell does not parse or the
    /// resulting record fails validation.
    pub fn check_row(self, headers: &csv::StringRecord, row: &csv::StringRecord) -> Result<()> {
        match self {
            Self::Meal => parse_row::<MealRecord>(headers, row).map(drop),
            Self::Weight => parse_row::<WeightRecord>(headers, row).map(drop),
            Self::Photo => parse_row::<PhotoRecord>(headers, row).map(drop),
            Self::Habit => parse_row::<HabitRecord>(headers, row).map(drop),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meal => write!(f, "meal"),
            Self::Weight => write!(f, "weight"),
            Self::Photo => write!(f, "photo"),
            Self::Habit => write!(f, "habit"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meal" | "meals" => Ok(Self::Meal),
            "weight" | "weights" => Ok(Self::Weight),
            "photo" | "photos" => Ok(Self::Photo),
            "habit" | "habits" => Ok(Self::Habit),
            _ => Err(format!("unknown record kind: {s}")),
        }
    }
}

/// A typed record stored in one of the CSV logs.
pub trait Record: Serialize + DeserializeOwned + fmt::Debug {
    /// The kind this record belongs to.
    const KIND: RecordKind;

    /// The date the entry was logged for.
    fn date(&self) -> NaiveDate;

    /// Check the record's field values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] describing the first bad field.
    fn validate(&self) -> Result<()>;
}

fn parse_row<R: Record>(headers: &csv::StringRecord, row: &csv::StringRecord) -> Result<R> {
    let record: R = row
        .deserialize(Some(headers))
        .map_err(|e| Error::invalid_record(R::KIND, e.to_string()))?;
    record.validate()?;
    Ok(record)
}

fn check_quantity(kind: RecordKind, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_record(
            kind,
            format!("{field} must be a non-negative number, got {value}"),
        ));
    }
    Ok(())
}

fn check_photo_ref(kind: RecordKind, photo_ref: &str) -> Result<()> {
    if photo_ref.len() != PHOTO_REF_LEN || !photo_ref.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::invalid_record(
            kind,
            format!("photo_ref must be a {PHOTO_REF_LEN}-character hex hash, got '{photo_ref}'"),
        ));
    }
    Ok(())
}

// ============================================================================
// Meals
// ============================================================================

/// Portion size estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Portion {
    /// Small portion.
    Small,
    /// Medium portion.
    #[default]
    Medium,
    /// Large portion.
    Large,
}

impl fmt::Display for Portion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "Small"),
            Self::Medium => write!(f, "Medium"),
            Self::Large => write!(f, "Large"),
        }
    }
}

/// How processed the food was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodQuality {
    /// Whole food.
    #[default]
    WholeFood,
    /// Minimally processed.
    MinimallyProcessed,
    /// Ultra-processed.
    UltraProcessed,
}

impl fmt::Display for FoodQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WholeFood => write!(f, "Whole food"),
            Self::MinimallyProcessed => write!(f, "Minimally processed"),
            Self::UltraProcessed => write!(f, "Ultra-processed"),
        }
    }
}

/// A logged meal or snack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    /// Day the meal was eaten.
    pub date: NaiveDate,
    /// Free-text description.
    pub meal: String,
    /// Portion estimate.
    pub portion: Portion,
    /// Calorie estimate.
    pub calories: u32,
    /// BLAKE3 hash of the attached photo, if any.
    pub photo_ref: Option<String>,
    /// Processing level.
    pub food_quality: FoodQuality,
    /// Protein in grams.
    pub protein_g: f64,
    /// Fiber in grams.
    pub fiber_g: f64,
    /// Mood before eating.
    pub mood_before: String,
    /// Mood after eating.
    pub mood_after: String,
    /// Hunger before eating, 1-10.
    pub hunger_before: u8,
    /// Hunger after eating, 1-10.
    pub hunger_after: u8,
}

impl MealRecord {
    /// Create a meal with default portion, quality and hunger levels.
    ///
    /// # Errors
    ///
    /// Returns an error if the description is blank.
    pub fn new(date: NaiveDate, meal: impl Into<String>, calories: u32) -> Result<Self> {
        let record = Self {
            date,
            meal: meal.into(),
            portion: Portion::default(),
            calories,
            photo_ref: None,
            food_quality: FoodQuality::default(),
            protein_g: 0.0,
            fiber_g: 0.0,
            mood_before: String::new(),
            mood_after: String::new(),
            hunger_before: 5,
            hunger_after: 5,
        };
        record.validate()?;
        Ok(record)
    }

    /// Set the portion estimate.
    #[must_use]
    pub fn with_portion(mut self, portion: Portion) -> Self {
        self.portion = portion;
        self
    }

    /// Set the food quality.
    #[must_use]
    pub fn with_quality(mut self, quality: FoodQuality) -> Self {
        self.food_quality = quality;
        self
    }

    /// Set protein and fiber grams.
    #[must_use]
    pub fn with_nutrients(mut self, protein_g: f64, fiber_g: f64) -> Self {
        self.protein_g = protein_g;
        self.fiber_g = fiber_g;
        self
    }

    /// Set mood before and after.
    #[must_use]
    pub fn with_mood(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.mood_before = before.into();
        self.mood_after = after.into();
        self
    }

    /// Set hunger before and after.
    #[must_use]
    pub fn with_hunger(mut self, before: u8, after: u8) -> Self {
        self.hunger_before = before;
        self.hunger_after = after;
        self
    }

    /// Link a photo by its hash.
    #[must_use]
    pub fn with_photo_ref(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }

    /// Caption used by the photo journal.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{} - {} ({})", self.meal, self.date, self.portion)
    }
}

impl Record for MealRecord {
    const KIND: RecordKind = RecordKind::Meal;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn validate(&self) -> Result<()> {
        if self.meal.trim().is_empty() {
            return Err(Error::invalid_record(Self::KIND, "meal description is empty"));
        }
        check_quantity(Self::KIND, "protein_g", self.protein_g)?;
        check_quantity(Self::KIND, "fiber_g", self.fiber_g)?;
        for (field, value) in [
            ("hunger_before", self.hunger_before),
            ("hunger_after", self.hunger_after),
        ] {
            if !(1..=10).contains(&value) {
                return Err(Error::invalid_record(
                    Self::KIND,
                    format!("{field} must be between 1 and 10, got {value}"),
                ));
            }
        }
        if let Some(photo_ref) = &self.photo_ref {
            check_photo_ref(Self::KIND, photo_ref)?;
        }
        Ok(())
    }
}

// ============================================================================
// Weights
// ============================================================================

/// Unit a weight was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms.
    #[default]
    Kg,
    /// Pounds.
    Lb,
}

impl WeightUnit {
    const KG_PER_LB: f64 = 0.453_592_37;

    /// Convert a value in this unit to kilograms.
    #[must_use]
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            Self::Kg => value,
            Self::Lb => value * Self::KG_PER_LB,
        }
    }

    /// Convert kilograms to this unit.
    #[must_use]
    pub fn from_kg(self, kg: f64) -> f64 {
        match self {
            Self::Kg => kg,
            Self::Lb => kg / Self::KG_PER_LB,
        }
    }

    /// Convert a value from `from` into this unit.
    #[must_use]
    pub fn convert(self, value: f64, from: Self) -> f64 {
        if self == from {
            value
        } else {
            self.from_kg(from.to_kg(value))
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kg => write!(f, "kg"),
            Self::Lb => write!(f, "lb"),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(Self::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(Self::Lb),
            _ => Err(format!("unknown weight unit: {s}")),
        }
    }
}

/// A weight (and optional waist) measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Day of the measurement.
    pub date: NaiveDate,
    /// Body weight in `unit`.
    pub weight: f64,
    /// Unit of `weight`.
    pub unit: WeightUnit,
    /// Waist circumference in centimetres.
    pub waist_cm: Option<f64>,
}

impl WeightRecord {
    /// Create a weight measurement.
    ///
    /// # Errors
    ///
    /// Returns an error if the weight is not positive or the waist is negative.
    pub fn new(date: NaiveDate, weight: f64, unit: WeightUnit) -> Result<Self> {
        let record = Self {
            date,
            weight,
            unit,
            waist_cm: None,
        };
        record.validate()?;
        Ok(record)
    }

    /// Attach a waist measurement.
    #[must_use]
    pub fn with_waist(mut self, waist_cm: f64) -> Self {
        self.waist_cm = Some(waist_cm);
        self
    }

    /// The weight expressed in `unit`.
    #[must_use]
    pub fn weight_in(&self, unit: WeightUnit) -> f64 {
        unit.convert(self.weight, self.unit)
    }
}

impl Record for WeightRecord {
    const KIND: RecordKind = RecordKind::Weight;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(Error::invalid_record(
                Self::KIND,
                format!("weight must be positive, got {}", self.weight),
            ));
        }
        if let Some(waist) = self.waist_cm {
            check_quantity(Self::KIND, "waist_cm", waist)?;
        }
        Ok(())
    }
}

// ============================================================================
// Photos
// ============================================================================

/// Metadata for a meal photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Day the photo was logged.
    pub date: NaiveDate,
    /// BLAKE3 hash of the image bytes; matches the meal's `photo_ref`.
    pub photo_ref: String,
    /// Hosted URL or local path; empty when the upload was skipped or failed.
    pub url: Option<String>,
    /// Description of the associated meal.
    pub meal: String,
}

impl PhotoRecord {
    /// Create photo metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if `photo_ref` is not a BLAKE3 hex hash.
    pub fn new(
        date: NaiveDate,
        photo_ref: impl Into<String>,
        url: Option<String>,
        meal: impl Into<String>,
    ) -> Result<Self> {
        let record = Self {
            date,
            photo_ref: photo_ref.into(),
            url: url.filter(|u| !u.is_empty()),
            meal: meal.into(),
        };
        record.validate()?;
        Ok(record)
    }
}

impl Record for PhotoRecord {
    const KIND: RecordKind = RecordKind::Photo;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn validate(&self) -> Result<()> {
        check_photo_ref(Self::KIND, &self.photo_ref)
    }
}

// ============================================================================
// Habits
// ============================================================================

/// A daily habit check-in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HabitRecord {
    /// Day of the check-in.
    pub date: NaiveDate,
    /// Took a 10-minute walk.
    pub walk: bool,
    /// Drank 2L of water.
    pub water: bool,
    /// Ate 2+ servings of fruit.
    pub fruit: bool,
    /// A user-defined habit.
    pub custom_habit: String,
    /// Free-form reflection.
    pub reflection: String,
}

impl Record for HabitRecord {
    const KIND: RecordKind = RecordKind::Habit;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
