//! Logging meals together with their photos.
//!
//! A meal with a photo touches two tables: the photo is stored through the
//! image host, its metadata goes to the photo log and the meal row carries the
//! same `photo_ref`. Photo hosting is best effort; the meal is always saved.

use tracing::info;

use crate::error::Result;
use crate::photos::{publish, ImageHost, PhotoUpload};
use crate::records::{MealRecord, PhotoRecord, RecordKind};
use crate::store::RecordStore;

/// What [`log_meal`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedMeal {
    /// The saved meal, with `photo_ref` set when a photo was attached.
    pub meal: MealRecord,
    /// The saved photo metadata, if a photo was attached.
    pub photo: Option<PhotoRecord>,
}

/// Store a photo for `meal` and build its metadata record.
///
/// Links the meal to the photo by setting its `photo_ref`. An upload failure
/// leaves the record's `url` empty.
///
/// # Errors
///
/// Returns an error only if the metadata record cannot be built.
pub async fn attach_photo(
    host: Option<&dyn ImageHost>,
    meal: &mut MealRecord,
    photo: &PhotoUpload,
) -> Result<PhotoRecord> {
    let url = publish(host, photo).await;
    meal.photo_ref = Some(photo.photo_ref().to_string());
    PhotoRecord::new(meal.date, photo.photo_ref(), url, meal.meal.clone())
}

/// Save a meal, attaching `photo` when given.
///
/// The photo log is read before the upload, so a photo log that cannot be
/// appended to fails the call with nothing uploaded or written. The meal row is
/// then written, followed by the photo metadata row.
///
/// # Errors
///
/// Returns an error if either log is unreadable or has the wrong header, or if
/// a row cannot be saved. Upload failures are not errors.
pub async fn log_meal(
    store: &RecordStore,
    host: Option<&dyn ImageHost>,
    meal: &MealRecord,
    photo: Option<&PhotoUpload>,
) -> Result<LoggedMeal> {
    let mut meal = meal.clone();
    let photo = match photo {
        Some(upload) => {
            store.load(RecordKind::Photo)?;
            Some(attach_photo(host, &mut meal, upload).await?)
        }
        None => None,
    };

    store.append(&meal)?;
    if let Some(record) = &photo {
        store.append(record)?;
    }

    info!(
        "Logged meal '{}' on {}{}",
        meal.meal,
        meal.date,
        if photo.is_some() { " with photo" } else { "" }
    );
    Ok(LoggedMeal { meal, photo })
}
