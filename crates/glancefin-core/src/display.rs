//! Derivation of the records the overlay renders, plus the endpoint and
//! asset paths they reference.

use crate::models::ImageKind;

/// Fallback thumbnail shipped with the web client.
pub const PLACEHOLDER_THUMBNAIL: &str = "/web/assets/img/banner-light.png";

/// Fixed description when neither summary nor detail carries an overview.
pub const DEFAULT_OVERVIEW: &str = "No description available";

/// List entry shown when no session is playing anything.
pub const EMPTY_STATE: &str = "No items are currently playing";

/// Error panel body when the credential blob yields no token.
pub const NO_TOKEN_MESSAGE: &str = "No access token found. Please log in to Jellyfin.";

/// Error panel body for session-fetch or parse failures.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load currently playing information";

/// Maximum rendered description length, ellipsis included.
const OVERVIEW_LIMIT: usize = 150;

/// Everything the renderer needs for one card. Derived per overlay open,
/// never persisted; the underlying wire models are not mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub title: TitleBlock,
    /// Already truncated to [`OVERVIEW_LIMIT`].
    pub description: String,
    /// Resolved primary image, or [`PLACEHOLDER_THUMBNAIL`].
    pub thumbnail_url: String,
    /// Resolved via the episode → season → series fallback chain.
    pub logo_url: Option<String>,
    pub user_name: Option<String>,
    /// Host-application details route, or `None` when the item has no id.
    pub details_href: Option<String>,
    /// Alt-text base for the card's images.
    pub item_name: String,
}

/// The card's title lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleBlock {
    /// Series name, optional "S{n} E{m}" line, episode title.
    Episode {
        series_name: String,
        season_episode: Option<String>,
        episode_title: String,
    },
    /// Single title line (movies and everything else).
    Single { title: String },
}

impl TitleBlock {
    /// Compose the title lines for an item.
    ///
    /// Episodes fall back to a single-line title when no series name is
    /// known; the season/episode line needs both numbers.
    pub fn compose(
        is_episode: bool,
        name: &str,
        series_name: Option<&str>,
        season_number: Option<i32>,
        episode_number: Option<i32>,
    ) -> Self {
        match series_name.filter(|_| is_episode) {
            Some(series) => {
                let season_episode = match (season_number, episode_number) {
                    (Some(season), Some(episode)) => Some(format!("S{season} E{episode}")),
                    _ => None,
                };
                Self::Episode {
                    series_name: series.to_string(),
                    season_episode,
                    episode_title: name.to_string(),
                }
            }
            None => Self::Single {
                title: name.to_string(),
            },
        }
    }
}

/// Truncate an overview for display: overviews longer than 150 characters
/// become their first 147 characters plus "...".
pub fn truncate_overview(overview: &str) -> String {
    if overview.chars().count() <= OVERVIEW_LIMIT {
        return overview.to_string();
    }
    let mut truncated: String = overview.chars().take(OVERVIEW_LIMIT - 3).collect();
    truncated.push_str("...");
    truncated
}

// ── Endpoint builders ───────────────────────────────────────────

/// `GET /Items/{id}` with the access token as a query credential.
pub fn item_detail_path(id: &str, token: &str) -> String {
    format!("/Items/{id}?api_key={token}")
}

/// Image endpoint for an item (referenced by the overlay, not fetched).
pub fn image_path(id: &str, kind: ImageKind, token: &str) -> String {
    format!("/Items/{id}/Images/{}?api_key={token}", kind.as_str())
}

/// The web client's details route for an item.
pub fn details_href(id: &str) -> String {
    format!("/web/index.html#!/details?id={id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_overview_unchanged() {
        assert_eq!(truncate_overview("brief"), "brief");
        let exactly_150 = "x".repeat(150);
        assert_eq!(truncate_overview(&exactly_150), exactly_150);
    }

    #[test]
    fn test_long_overview_truncated() {
        let long = "a".repeat(200);
        let truncated = truncate_overview(&long);
        assert_eq!(truncated.chars().count(), 150);
        assert_eq!(truncated, format!("{}...", "a".repeat(147)));
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let long = "é".repeat(151);
        let truncated = truncate_overview(&long);
        assert_eq!(truncated.chars().count(), 150);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_episode_title_block() {
        let title = TitleBlock::compose(true, "Pilot", Some("Severance"), Some(1), Some(1));
        assert_eq!(
            title,
            TitleBlock::Episode {
                series_name: "Severance".into(),
                season_episode: Some("S1 E1".into()),
                episode_title: "Pilot".into(),
            }
        );
    }

    #[test]
    fn test_episode_without_numbers_drops_line() {
        let title = TitleBlock::compose(true, "Pilot", Some("Severance"), Some(1), None);
        assert_eq!(
            title,
            TitleBlock::Episode {
                series_name: "Severance".into(),
                season_episode: None,
                episode_title: "Pilot".into(),
            }
        );
    }

    #[test]
    fn test_episode_without_series_name_is_single() {
        let title = TitleBlock::compose(true, "Pilot", None, Some(1), Some(1));
        assert_eq!(title, TitleBlock::Single { title: "Pilot".into() });
    }

    #[test]
    fn test_movie_title_block() {
        let title = TitleBlock::compose(false, "Heat", None, None, None);
        assert_eq!(title, TitleBlock::Single { title: "Heat".into() });
    }

    #[test]
    fn test_user_facing_strings() {
        assert_eq!(EMPTY_STATE, "No items are currently playing");
        assert_eq!(DEFAULT_OVERVIEW, "No description available");
    }

    #[test]
    fn test_endpoint_builders() {
        assert_eq!(item_detail_path("42", "tok"), "/Items/42?api_key=tok");
        assert_eq!(
            image_path("42", ImageKind::Logo, "tok"),
            "/Items/42/Images/Logo?api_key=tok"
        );
        assert_eq!(
            image_path("42", ImageKind::Primary, "tok"),
            "/Items/42/Images/Primary?api_key=tok"
        );
        assert_eq!(details_href("42"), "/web/index.html#!/details?id=42");
    }
}
