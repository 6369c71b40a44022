//! Curated site categories for bulk block-list additions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Social,
    Entertainment,
    News,
    Shopping,
}

impl PresetCategory {
    pub fn sites(self) -> &'static [&'static str] {
        match self {
            PresetCategory::Social => &[
                "facebook.com",
                "twitter.com",
                "instagram.com",
                "linkedin.com",
                "snapchat.com",
                "tiktok.com",
                "pinterest.com",
                "tumblr.com",
            ],
            PresetCategory::Entertainment => &[
                "youtube.com",
                "netflix.com",
                "twitch.tv",
                "hulu.com",
                "disney.com",
                "primevideo.com",
                "spotify.com",
                "soundcloud.com",
            ],
            PresetCategory::News => &[
                "cnn.com",
                "bbc.com",
                "reuters.com",
                "nytimes.com",
                "theguardian.com",
                "washingtonpost.com",
                "foxnews.com",
                "npr.org",
            ],
            PresetCategory::Shopping => &[
                "amazon.com",
                "ebay.com",
                "aliexpress.com",
                "etsy.com",
                "walmart.com",
                "target.com",
                "bestbuy.com",
                "alibaba.com",
            ],
        }
    }
}

impl fmt::Display for PresetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PresetCategory::Social => "social",
            PresetCategory::Entertainment => "entertainment",
            PresetCategory::News => "news",
            PresetCategory::Shopping => "shopping",
        };
        f.write_str(name)
    }
}

impl FromStr for PresetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "social" => Ok(PresetCategory::Social),
            "entertainment" => Ok(PresetCategory::Entertainment),
            "news" => Ok(PresetCategory::News),
            "shopping" => Ok(PresetCategory::Shopping),
            other => Err(format!(
                "unknown preset '{other}' (expected social, entertainment, news or shopping)"
            )),
        }
    }
}
