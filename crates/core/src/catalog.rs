//! Catalog and subscription vocabulary.
//!
//! Content types and video quality tiers are stored as TEXT with CHECK
//! constraints; these constants must match the migrations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

pub const CONTENT_TYPE_MOVIE: &str = "movie";
pub const CONTENT_TYPE_SERIES: &str = "series";

/// Kind of catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Movie, ContentType::Series];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Movie => CONTENT_TYPE_MOVIE,
            ContentType::Series => CONTENT_TYPE_SERIES,
        }
    }
}

/// Streaming quality tier granted by a subscription plan, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoQuality {
    Sd,
    Hd,
    FullHd,
    UltraHd,
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 4] = [
        VideoQuality::Sd,
        VideoQuality::Hd,
        VideoQuality::FullHd,
        VideoQuality::UltraHd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VideoQuality::Sd => "sd",
            VideoQuality::Hd => "hd",
            VideoQuality::FullHd => "full_hd",
            VideoQuality::UltraHd => "ultra_hd",
        }
    }
}

/// Error returned when parsing an unknown vocabulary value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for ContentType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownValue {
                kind: "content type",
                value: s.to_string(),
            })
    }
}

impl FromStr for VideoQuality {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoQuality::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| UnknownValue {
                kind: "video quality",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `validator` rule: value must name a [`ContentType`].
pub fn validate_content_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<ContentType>().map(|_| ()).map_err(|_| {
        ValidationError::new("content_type").with_message("Must be one of: movie, series".into())
    })
}

/// `validator` rule: value must name a [`VideoQuality`].
pub fn validate_video_quality(value: &str) -> Result<(), ValidationError> {
    value.parse::<VideoQuality>().map(|_| ()).map_err(|_| {
        ValidationError::new("video_quality")
            .with_message("Must be one of: sd, hd, full_hd, ultra_hd".into())
    })
}

/// `validator` rule: three upper-case ASCII letters (ISO-4217 shape).
pub fn validate_currency(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("currency")
            .with_message("Must be a three-letter ISO-4217 code such as USD".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parses_known_values() {
        assert_eq!("movie".parse::<ContentType>(), Ok(ContentType::Movie));
        assert_eq!("series".parse::<ContentType>(), Ok(ContentType::Series));
        assert!("documentary".parse::<ContentType>().is_err());
    }

    #[test]
    fn video_quality_is_ordered_by_tier() {
        assert!(VideoQuality::Sd < VideoQuality::UltraHd);
        assert_eq!("full_hd".parse::<VideoQuality>(), Ok(VideoQuality::FullHd));
    }

    #[test]
    fn vocabulary_rules() {
        assert!(validate_content_type("series").is_ok());
        assert!(validate_content_type("Series").is_err());
        assert!(validate_video_quality("hd").is_ok());
        assert!(validate_video_quality("8k").is_err());
        assert!(validate_currency("EUR").is_ok());
        assert!(validate_currency("eur").is_err());
        assert!(validate_currency("EURO").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&VideoQuality::UltraHd).unwrap();
        assert_eq!(json, "\"ultra_hd\"");
    }
}
