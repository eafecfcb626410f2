//! Verification service types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The third-party eligibility programs a user can spend points on.
///
/// Each variant corresponds to one `verify{,2,3,4,5}` command slot and one
/// independently configured verifier capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Gemini One Pro (`verify`).
    GeminiOnePro,
    /// ChatGPT Teacher K-12 (`verify2`).
    ChatgptTeacherK12,
    /// Spotify Student (`verify3`).
    SpotifyStudent,
    /// Bolt.new Teacher (`verify4`).
    BoltTeacher,
    /// YouTube Student Premium (`verify5`).
    YoutubeStudent,
}

impl ServiceType {
    /// All service types, in command-slot order.
    pub const ALL: [ServiceType; 5] = [
        ServiceType::GeminiOnePro,
        ServiceType::ChatgptTeacherK12,
        ServiceType::SpotifyStudent,
        ServiceType::BoltTeacher,
        ServiceType::YoutubeStudent,
    ];

    /// Stable key used in attempt records and configuration tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::GeminiOnePro => "gemini_one_pro",
            ServiceType::ChatgptTeacherK12 => "chatgpt_teacher_k12",
            ServiceType::SpotifyStudent => "spotify_student",
            ServiceType::BoltTeacher => "bolt_teacher",
            ServiceType::YoutubeStudent => "youtube_student",
        }
    }

    /// Human-facing program name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceType::GeminiOnePro => "Gemini One Pro",
            ServiceType::ChatgptTeacherK12 => "ChatGPT Teacher K12",
            ServiceType::SpotifyStudent => "Spotify Student",
            ServiceType::BoltTeacher => "Bolt.new Teacher",
            ServiceType::YoutubeStudent => "YouTube Student Premium",
        }
    }

    /// Command slot number (1 = `verify`, 2 = `verify2`, ...).
    pub fn slot(&self) -> u8 {
        match self {
            ServiceType::GeminiOnePro => 1,
            ServiceType::ChatgptTeacherK12 => 2,
            ServiceType::SpotifyStudent => 3,
            ServiceType::BoltTeacher => 4,
            ServiceType::YoutubeStudent => 5,
        }
    }

    /// Resolve a command slot number back to a service type.
    pub fn from_slot(slot: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.slot() == slot)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = UnknownServiceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownServiceType(s.to_string()))
    }
}

/// Error returned when a service-type key does not match any known program.
#[derive(Debug, thiserror::Error)]
#[error("unknown service type: {0}")]
pub struct UnknownServiceType(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_unique_and_round_trip() {
        for service in ServiceType::ALL {
            assert_eq!(ServiceType::from_slot(service.slot()), Some(service));
        }
        assert_eq!(ServiceType::from_slot(0), None);
        assert_eq!(ServiceType::from_slot(6), None);
    }

    #[test]
    fn keys_round_trip() {
        for service in ServiceType::ALL {
            assert_eq!(service.as_str().parse::<ServiceType>().unwrap(), service);
        }
        assert!("netflix_student".parse::<ServiceType>().is_err());
    }

    /// Config tables key on the serde representation, so it must agree
    /// with `as_str`.
    #[test]
    fn serde_keys_match_as_str() {
        for service in ServiceType::ALL {
            let json = serde_json::to_string(&service).unwrap();
            assert_eq!(json, format!("\"{}\"", service.as_str()));
        }
    }
}
