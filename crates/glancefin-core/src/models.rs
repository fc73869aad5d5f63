//! Wire models for the media server's session and item endpoints.
//!
//! Field names follow the server's PascalCase JSON; everything the server may
//! omit is `Option` so a sparse payload never fails deserialization.

use std::collections::HashMap;

use serde::Deserialize;

/// A live playback context reported by the server.
///
/// Sessions without a [`NowPlayingItem`] are idle (paused clients, menus) and
/// produce no overlay card.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "UserName")]
    pub user_name: Option<String>,

    #[serde(rename = "NowPlayingItem")]
    pub now_playing_item: Option<NowPlayingItem>,
}

/// The summary of the item a session is currently playing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NowPlayingItem {
    #[serde(rename = "Id")]
    pub id: Option<String>,

    #[serde(rename = "Name")]
    pub name: Option<String>,

    #[serde(rename = "Type")]
    pub item_type: Option<String>,

    #[serde(rename = "Overview")]
    pub overview: Option<String>,

    #[serde(rename = "SeriesName")]
    pub series_name: Option<String>,

    #[serde(rename = "SeasonNumber")]
    pub season_number: Option<i32>,

    #[serde(rename = "EpisodeNumber")]
    pub episode_number: Option<i32>,
}

impl NowPlayingItem {
    /// Whether this item is an episode of a series (vs. a movie or other).
    pub fn is_episode(&self) -> bool {
        self.item_type.as_deref() == Some("Episode")
    }
}

/// Extended metadata from `GET /Items/{id}`.
///
/// Overlaid onto the session's embedded summary: detail values win when
/// present and non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDetail {
    #[serde(rename = "Overview")]
    pub overview: Option<String>,

    #[serde(rename = "SeriesName")]
    pub series_name: Option<String>,

    #[serde(rename = "SeasonNumber")]
    pub season_number: Option<i32>,

    #[serde(rename = "EpisodeNumber")]
    pub episode_number: Option<i32>,

    #[serde(rename = "SeasonId")]
    pub season_id: Option<String>,

    #[serde(rename = "SeriesId")]
    pub series_id: Option<String>,

    #[serde(rename = "ImageTags", default)]
    pub image_tags: HashMap<String, String>,
}

impl ItemDetail {
    /// Whether the server reports an image of the given kind for this item.
    pub fn has_image(&self, kind: ImageKind) -> bool {
        self.image_tags.contains_key(kind.as_str())
    }
}

/// Image kinds the overlay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Primary,
    Logo,
}

impl ImageKind {
    /// The server's `ImageTags` key / image endpoint path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Logo => "Logo",
        }
    }
}
