//! Image file loading for image Q&A.

use std::path::Path;

use gemchat_ai::ImageInput;
use gemchat_common::GemchatError;

/// Mime type for a supported image file extension.
pub fn mime_for_path(path: &Path) -> Result<&'static str, GemchatError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        "heic" => Ok("image/heic"),
        "" => Err(GemchatError::Image(format!(
            "cannot tell image type of {} (no extension)",
            path.display()
        ))),
        other => Err(GemchatError::Image(format!(
            "unsupported image extension: {other}"
        ))),
    }
}

/// Read an image file for submission.
pub fn load_image(path: &Path) -> Result<ImageInput, GemchatError> {
    let mime_type = mime_for_path(path)?;
    let data = std::fs::read(path)?;
    if data.is_empty() {
        return Err(GemchatError::Image(format!("{} is empty", path.display())));
    }
    Ok(ImageInput::new(data, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("a.png")).unwrap(), "image/png");
        assert_eq!(mime_for_path(Path::new("a.JPG")).unwrap(), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("dir/a.jpeg")).unwrap(), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.webp")).unwrap(), "image/webp");
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = mime_for_path(Path::new("a.bmp")).unwrap_err();
        assert_eq!(err.to_string(), "image error: unsupported image extension: bmp");
        assert!(mime_for_path(Path::new("noext")).is_err());
    }

    #[test]
    fn loads_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn missing_and_empty_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_image(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(missing, GemchatError::Io(_)));

        let empty = dir.path().join("empty.gif");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(load_image(&empty), Err(GemchatError::Image(_))));
    }
}
