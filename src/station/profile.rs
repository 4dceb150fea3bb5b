use serde::{Deserialize, Serialize};

/// Public identity of the station. Persisted as its own document,
/// independent of playback state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub social: SocialLinks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub youtube: String,
}

impl Default for StationProfile {
    fn default() -> Self {
        Self {
            name: "Rustacast".to_string(),
            description: String::new(),
            logo: String::new(),
            website: String::new(),
            email: String::new(),
            social: SocialLinks::default(),
        }
    }
}
