use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Closed enumeration of publishable content categories.
///
/// The content type determines which metadata attributes are required and
/// where the uploaded file and index record are stored. New categories are
/// a schema change, not a runtime value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Photo gallery entry.
    Gallery,
    /// Department event (talk, workshop, fest).
    Event,
    /// Faculty profile.
    Faculty,
    /// Placement record (company, position, package).
    Placement,
    /// Student or department achievement.
    Achievement,
}

impl ContentType {
    /// All content types, in declaration order.
    pub const ALL: [ContentType; 5] = [
        Self::Gallery,
        Self::Event,
        Self::Faculty,
        Self::Placement,
        Self::Achievement,
    ];

    /// Canonical lowercase name, used in storage keys and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Event => "event",
            Self::Faculty => "faculty",
            Self::Placement => "placement",
            Self::Achievement => "achievement",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gallery" => Ok(Self::Gallery),
            "event" => Ok(Self::Event),
            "faculty" => Ok(Self::Faculty),
            "placement" => Ok(Self::Placement),
            "achievement" => Ok(Self::Achievement),
            other => Err(TypeError::UnknownContentType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_names() {
        for ct in ContentType::ALL {
            let parsed: ContentType = ct.as_str().parse().unwrap();
            assert_eq!(parsed, ct);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "newsletter".parse::<ContentType>().unwrap_err();
        assert!(matches!(err, TypeError::UnknownContentType(_)));
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&ContentType::Placement).unwrap();
        assert_eq!(json, "\"placement\"");

        let back: ContentType = serde_json::from_str("\"gallery\"").unwrap();
        assert_eq!(back, ContentType::Gallery);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ContentType::Faculty.to_string(), "faculty");
    }
}
