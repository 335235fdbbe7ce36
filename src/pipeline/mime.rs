//! Content-type detection for queued images.
//!
//! Extension-based: ingestion hands us a filename and raw bytes, and the
//! vision service only needs a plausible MIME tag for the data URI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Image content types the ingestion surface accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageContentType {
    #[default]
    Jpeg,
    Png,
    Bmp,
}

impl ImageContentType {
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
        }
    }
}

impl fmt::Display for ImageContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_mime())
    }
}

/// Map a filename to a content type by the substring after its last `.`,
/// case-insensitive. Total: anything unrecognized, including a missing
/// extension, falls back to JPEG.
pub fn detect(filename: &str) -> ImageContentType {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return ImageContentType::Jpeg,
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => ImageContentType::Jpeg,
        "png" => ImageContentType::Png,
        "bmp" => ImageContentType::Bmp,
        _ => ImageContentType::Jpeg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_their_type() {
        assert_eq!(detect("card.jpg"), ImageContentType::Jpeg);
        assert_eq!(detect("card.jpeg"), ImageContentType::Jpeg);
        assert_eq!(detect("card.png"), ImageContentType::Png);
        assert_eq!(detect("card.bmp"), ImageContentType::Bmp);
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(detect("CARD.JPG"), ImageContentType::Jpeg);
        assert_eq!(detect("card.PnG"), ImageContentType::Png);
        assert_eq!(detect("card.BMP"), ImageContentType::Bmp);
    }

    #[test]
    fn unknown_or_missing_extension_defaults_to_jpeg() {
        assert_eq!(detect("card.tiff"), ImageContentType::Jpeg);
        assert_eq!(detect("card.webp"), ImageContentType::Jpeg);
        assert_eq!(detect("card"), ImageContentType::Jpeg);
        assert_eq!(detect(""), ImageContentType::Jpeg);
        assert_eq!(detect("card."), ImageContentType::Jpeg);
    }

    #[test]
    fn only_the_last_extension_counts() {
        assert_eq!(detect("export.png.bmp"), ImageContentType::Bmp);
        assert_eq!(detect("archive.tar.png"), ImageContentType::Png);
    }

    #[test]
    fn mime_strings_round_trip_through_display() {
        assert_eq!(ImageContentType::Jpeg.to_string(), "image/jpeg");
        assert_eq!(ImageContentType::Png.to_string(), "image/png");
        assert_eq!(ImageContentType::Bmp.to_string(), "image/bmp");
    }
}
