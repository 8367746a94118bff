use crate::error::{DeidError, Result};
use dicom_object::{FileDicomObject, InMemDicomObject};
use dicom_pixeldata::PixelDecoder;
use log::debug;
use std::path::Path;

/// Writes the first frame of a de-identified record as a PNG
///
/// # Errors
///
/// Any decode or write failure is reported as [`DeidError::PersistFailure`].
pub fn write_preview(obj: &FileDicomObject<InMemDicomObject>, path: &Path) -> Result<()> {
    let persist = |reason: String| DeidError::PersistFailure {
        path: path.to_path_buf(),
        reason,
    };

    let pixels = obj.decode_pixel_data().map_err(|e| persist(e.to_string()))?;
    let image = pixels
        .to_dynamic_image(0)
        .map_err(|e| persist(e.to_string()))?;
    image.save(path).map_err(|e| persist(e.to_string()))?;

    debug!("Wrote preview {}", path.display());
    Ok(())
}
