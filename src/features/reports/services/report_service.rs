use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    CreateReport, NewReport, PhotoUpload, Report, ReportSubmission,
};
use crate::features::reports::stores::ReportStore;
use crate::modules::storage::BlobStore;
use crate::modules::vision::{ImageInput, RefinedLocation, SiteClassification, VisionAssistant};
use crate::shared::constants::MAX_PHOTO_SIZE;
use crate::shared::geo::haversine_distance;
use crate::shared::types::{Coordinates, PaginationQuery};
use crate::shared::validation::{is_image_content_type, sanitize_file_name, sanitize_text};

/// Hex characters of the content hash kept in photo keys
const PHOTO_HASH_PREFIX_LEN: usize = 16;

fn validate_photo(photo: &PhotoUpload) -> Result<()> {
    if photo.data.is_empty() {
        return Err(AppError::Validation("Photo is empty".to_string()));
    }
    if photo.data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::PayloadTooLarge(format!(
            "Photo too large. Maximum size is {} MB",
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }
    if !is_image_content_type(&photo.content_type) {
        return Err(AppError::Validation(format!(
            "Only images are accepted, got '{}'",
            photo.content_type
        )));
    }
    Ok(())
}

/// `{prefix}/reports/{YYYYMMDD}/{hash}-{name}`
fn photo_key(public_prefix: &str, photo: &PhotoUpload, now: DateTime<Utc>) -> String {
    let digest = hex::encode(Sha256::digest(&photo.data));
    let path = format!(
        "reports/{}/{}-{}",
        now.format("%Y%m%d"),
        &digest[..PHOTO_HASH_PREFIX_LEN],
        sanitize_file_name(&photo.file_name)
    );

    if public_prefix.is_empty() {
        path
    } else {
        format!("{}/{}", public_prefix, path)
    }
}

fn validate_location(coordinates: &Coordinates) -> Result<()> {
    coordinates.validate().map_err(AppError::Validation)
}

/// Service for report creation and photo intake
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    blob_store: Arc<dyn BlobStore>,
    vision: Option<Arc<dyn VisionAssistant>>,
    max_refinement_meters: f64,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        blob_store: Arc<dyn BlobStore>,
        vision: Option<Arc<dyn VisionAssistant>>,
        max_refinement_meters: f64,
    ) -> Self {
        Self {
            store,
            blob_store,
            vision,
            max_refinement_meters,
        }
    }

    pub fn vision_enabled(&self) -> bool {
        self.vision.is_some()
    }

    /// Create a report whose photo, if any, is already uploaded.
    ///
    /// The label is parsed strictly and its weight frozen onto the report.
    pub async fn create(&self, input: NewReport) -> Result<Report> {
        validate_location(&input.coordinates)?;

        let photo_url = input
            .photo_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let report = CreateReport::from_label(
            input.coordinates,
            &input.criticality,
            sanitize_text(&input.description),
            photo_url,
        )?;

        self.store.save(report).await
    }

    /// Validate, optionally refine, upload and store a photo report
    pub async fn submit(&self, submission: ReportSubmission) -> Result<Report> {
        validate_photo(&submission.photo)?;
        validate_location(&submission.coordinates)?;
        if sanitize_text(&submission.details.street_address).is_empty() {
            return Err(AppError::Validation(
                "Street address is required".to_string(),
            ));
        }
        let mut report = CreateReport::from_label(
            submission.coordinates,
            &submission.criticality,
            String::new(),
            None,
        )?;

        let key = photo_key(self.blob_store.public_prefix(), &submission.photo, Utc::now());
        let image = ImageInput {
            data: submission.photo.data,
            mime_type: submission.photo.content_type,
        };

        let refined = if submission.refine_location {
            self.refine_location(&image, submission.coordinates).await
        } else {
            None
        };
        if let Some(refined) = refined {
            report.coordinates = refined.coordinates;
        }

        let stored = self
            .blob_store
            .put(&key, image.data, &image.mime_type)
            .await?;

        // Segments are capped one by one, the joined line needs its own cap
        report.description = sanitize_text(
            &submission
                .details
                .compose(refined.map(|r| r.confidence)),
        );
        report.photo_url = Some(stored.public_url);

        self.store.save(report).await
    }

    /// Best effort: any failure keeps the user's point
    async fn refine_location(
        &self,
        image: &ImageInput,
        marked: Coordinates,
    ) -> Option<RefinedLocation> {
        let vision = self.vision.as_ref()?;

        let refined = match vision.refine_location(image, marked).await {
            Ok(refined) => refined,
            Err(e) => {
                tracing::warn!("Location refinement failed, keeping user location: {}", e);
                return None;
            }
        };

        if let Err(e) = refined.coordinates.validate() {
            tracing::warn!("Discarding refined location: {}", e);
            return None;
        }

        let moved = haversine_distance(marked, refined.coordinates);
        if moved > self.max_refinement_meters {
            tracing::warn!(
                "Discarding refined location {:.1}m away (limit {:.0}m)",
                moved,
                self.max_refinement_meters
            );
            return None;
        }

        tracing::info!(
            "Location refined by {:.1}m (confidence {:.2})",
            moved,
            refined.confidence
        );
        Some(refined)
    }

    /// Ask the vision assistant what the photo shows
    pub async fn classify_photo(&self, photo: PhotoUpload) -> Result<SiteClassification> {
        let vision = self.vision.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("AI photo analysis is not configured".to_string())
        })?;
        validate_photo(&photo)?;

        let image = ImageInput {
            data: photo.data,
            mime_type: photo.content_type,
        };
        Ok(vision.classify_site(&image).await?)
    }

    /// One page of reports, most recent first, plus the total count
    pub async fn list(&self, pagination: &PaginationQuery) -> Result<(Vec<Report>, i64)> {
        self.store
            .list_page(pagination.offset() as i64, pagination.limit())
            .await
    }
}
