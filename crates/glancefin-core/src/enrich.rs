//! Enrichment pipeline: session list in, display records out.
//!
//! Each playing item gets a detail fetch, a field-overlay merge, and a logo
//! lookup along the episode → season → series fallback chain. Failures are
//! isolated per item: a dead detail endpoint degrades that one card to its
//! summary-derived defaults and never aborts the batch.

use futures::stream::{self, StreamExt};

use crate::display::{
    details_href, image_path, truncate_overview, DisplayRecord, TitleBlock, DEFAULT_OVERVIEW,
    PLACEHOLDER_THUMBNAIL,
};
use crate::gateway::MediaGateway;
use crate::models::{ImageKind, ItemDetail, Session};

/// Concurrent detail fetches in flight at once. Output order stays the
/// session-list order regardless.
const DETAIL_FAN_OUT: usize = 4;

/// Runs the enrichment pipeline against a [`MediaGateway`].
pub struct Enricher<'a, G> {
    gateway: &'a G,
    token: &'a str,
}

impl<'a, G: MediaGateway> Enricher<'a, G> {
    pub fn new(gateway: &'a G, token: &'a str) -> Self {
        Self { gateway, token }
    }

    /// Enrich every session that is playing something, in session-list order.
    ///
    /// Detail fetches fan out up to [`DETAIL_FAN_OUT`] at a time; `buffered`
    /// reassembles results in input order.
    pub async fn enrich_sessions(&self, sessions: Vec<Session>) -> Vec<DisplayRecord> {
        stream::iter(
            sessions
                .into_iter()
                .filter(|session| session.now_playing_item.is_some()),
        )
        .map(|session| self.enrich_session(session))
        .buffered(DETAIL_FAN_OUT)
        .collect()
        .await
    }

    /// Build the display record for one playing session. Infallible: every
    /// fetch error degrades to defaults.
    async fn enrich_session(&self, session: Session) -> DisplayRecord {
        let item = session.now_playing_item.unwrap_or_default();
        let name = item.name.clone().unwrap_or_default();

        let detail = match item.id.as_deref() {
            Some(id) => match self.gateway.item_detail(id).await {
                Ok(detail) => detail,
                Err(err) => {
                    tracing::warn!(item = %id, error = %err, "item detail fetch failed");
                    ItemDetail::default()
                }
            },
            None => ItemDetail::default(),
        };

        let mut thumbnail_url = PLACEHOLDER_THUMBNAIL.to_string();
        let mut logo_url = None;
        if let Some(id) = item.id.as_deref() {
            if detail.has_image(ImageKind::Primary) {
                thumbnail_url = image_path(id, ImageKind::Primary, self.token);
            }
            logo_url = self.resolve_logo(id, item.is_episode(), &detail).await;
        }

        let overview = first_non_empty(detail.overview.clone(), item.overview.clone())
            .unwrap_or_else(|| DEFAULT_OVERVIEW.to_string());
        let series_name = first_non_empty(detail.series_name.clone(), item.series_name.clone());
        let season_number = detail.season_number.or(item.season_number);
        let episode_number = detail.episode_number.or(item.episode_number);

        DisplayRecord {
            title: TitleBlock::compose(
                item.is_episode(),
                &name,
                series_name.as_deref(),
                season_number,
                episode_number,
            ),
            description: truncate_overview(&overview),
            thumbnail_url,
            logo_url,
            user_name: session.user_name,
            details_href: item.id.as_deref().map(details_href),
            item_name: name,
        }
    }

    /// Resolve a logo URL for an item, stopping at the first available tag.
    ///
    /// Non-episodes only ever use their own tag. Episodes fall back to the
    /// season's and then the series' logo; a failed nested lookup is logged
    /// and the chain continues, leaving the logo unresolved at worst.
    async fn resolve_logo(
        &self,
        item_id: &str,
        is_episode: bool,
        detail: &ItemDetail,
    ) -> Option<String> {
        if detail.has_image(ImageKind::Logo) {
            return Some(image_path(item_id, ImageKind::Logo, self.token));
        }
        if !is_episode {
            return None;
        }

        if let Some(season_id) = detail.season_id.as_deref() {
            match self.gateway.item_detail(season_id).await {
                Ok(season) if season.has_image(ImageKind::Logo) => {
                    return Some(image_path(season_id, ImageKind::Logo, self.token));
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(season = %season_id, error = %err, "season detail fetch failed");
                }
            }
        }

        if let Some(series_id) = detail.series_id.as_deref() {
            match self.gateway.item_detail(series_id).await {
                Ok(series) if series.has_image(ImageKind::Logo) => {
                    return Some(image_path(series_id, ImageKind::Logo, self.token));
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(series = %series_id, error = %err, "series detail fetch failed");
                }
            }
        }

        None
    }
}

/// Detail-over-summary merge: a value wins only when present and non-empty.
fn first_non_empty(detail: Option<String>, summary: Option<String>) -> Option<String> {
    detail
        .filter(|value| !value.is_empty())
        .or(summary.filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use futures::executor::block_on;

    use super::*;
    use crate::error::GlancefinError;
    use crate::models::NowPlayingItem;

    /// In-memory gateway: detail responses keyed by item id, plus a log of
    /// every id fetched.
    struct StubGateway {
        details: HashMap<String, ItemDetail>,
        failing: Vec<String>,
        calls: RefCell<Vec<String>>,
    }

    impl StubGateway {
        fn new() -> Self {
            Self {
                details: HashMap::new(),
                failing: Vec::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn with_detail(mut self, id: &str, detail: ItemDetail) -> Self {
            self.details.insert(id.to_string(), detail);
            self
        }

        fn with_failure(mut self, id: &str) -> Self {
            self.failing.push(id.to_string());
            self
        }
    }

    impl MediaGateway for StubGateway {
        type Error = GlancefinError;

        async fn sessions(&self) -> Result<Vec<Session>, Self::Error> {
            Ok(Vec::new())
        }

        async fn item_detail(&self, id: &str) -> Result<ItemDetail, Self::Error> {
            self.calls.borrow_mut().push(id.to_string());
            if self.failing.iter().any(|f| f == id) {
                return Err(GlancefinError::Http(500));
            }
            Ok(self.details.get(id).cloned().unwrap_or_default())
        }
    }

    fn detail_with_tags(tags: &[&str]) -> ItemDetail {
        ItemDetail {
            image_tags: tags
                .iter()
                .map(|kind| (kind.to_string(), "tag".to_string()))
                .collect(),
            ..Default::default()
        }
    }

    fn episode_session(id: &str, name: &str) -> Session {
        Session {
            user_name: Some("alice".into()),
            now_playing_item: Some(NowPlayingItem {
                id: Some(id.into()),
                name: Some(name.into()),
                item_type: Some("Episode".into()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_idle_sessions_produce_no_record() {
        let gateway = StubGateway::new();
        let enricher = Enricher::new(&gateway, "tok");
        let sessions = vec![
            Session {
                user_name: Some("bob".into()),
                now_playing_item: None,
            },
            episode_session("e1", "Pilot"),
        ];
        let records = block_on(enricher.enrich_sessions(sessions));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_name, "Pilot");
        assert!(gateway.calls.borrow().iter().all(|id| id == "e1"));
    }

    #[test]
    fn test_all_idle_sessions_yield_empty_batch() {
        let gateway = StubGateway::new();
        let enricher = Enricher::new(&gateway, "tok");
        let sessions = vec![
            Session {
                user_name: Some("bob".into()),
                now_playing_item: None,
            },
            Session {
                user_name: None,
                now_playing_item: None,
            },
        ];
        // The renderer's single-placeholder entry keys off an empty batch.
        let records = block_on(enricher.enrich_sessions(sessions));
        assert!(records.is_empty());
        assert!(gateway.calls.borrow().is_empty());
    }

    #[test]
    fn test_season_logo_fallback() {
        let gateway = StubGateway::new()
            .with_detail(
                "e1",
                ItemDetail {
                    season_id: Some("sea1".into()),
                    series_id: Some("ser1".into()),
                    ..Default::default()
                },
            )
            .with_detail("sea1", detail_with_tags(&["Logo"]));
        let enricher = Enricher::new(&gateway, "tok");
        let records = block_on(enricher.enrich_sessions(vec![episode_session("e1", "Pilot")]));
        assert_eq!(
            records[0].logo_url.as_deref(),
            Some("/Items/sea1/Images/Logo?api_key=tok")
        );
        // Chain stopped at the season; the series was never fetched.
        assert_eq!(*gateway.calls.borrow(), vec!["e1", "sea1"]);
    }

    #[test]
    fn test_series_logo_after_failed_season_lookup() {
        let gateway = StubGateway::new()
            .with_detail(
                "e1",
                ItemDetail {
                    season_id: Some("sea1".into()),
                    series_id: Some("ser1".into()),
                    ..Default::default()
                },
            )
            .with_failure("sea1")
            .with_detail("ser1", detail_with_tags(&["Logo"]));
        let enricher = Enricher::new(&gateway, "tok");
        let records = block_on(enricher.enrich_sessions(vec![episode_session("e1", "Pilot")]));
        assert_eq!(
            records[0].logo_url.as_deref(),
            Some("/Items/ser1/Images/Logo?api_key=tok")
        );
    }

    #[test]
    fn test_no_logo_anywhere() {
        let gateway = StubGateway::new().with_detail(
            "e1",
            ItemDetail {
                season_id: Some("sea1".into()),
                series_id: Some("ser1".into()),
                ..Default::default()
            },
        );
        let enricher = Enricher::new(&gateway, "tok");
        let records = block_on(enricher.enrich_sessions(vec![episode_session("e1", "Pilot")]));
        assert_eq!(records[0].logo_url, None);
        assert_eq!(*gateway.calls.borrow(), vec!["e1", "sea1", "ser1"]);
    }

    #[test]
    fn test_own_logo_skips_fallback_chain() {
        let mut detail = detail_with_tags(&["Logo", "Primary"]);
        detail.season_id = Some("sea1".into());
        let gateway = StubGateway::new().with_detail("e1", detail);
        let enricher = Enricher::new(&gateway, "tok");
        let records = block_on(enricher.enrich_sessions(vec![episode_session("e1", "Pilot")]));
        assert_eq!(
            records[0].logo_url.as_deref(),
            Some("/Items/e1/Images/Logo?api_key=tok")
        );
        assert_eq!(
            records[0].thumbnail_url,
            "/Items/e1/Images/Primary?api_key=tok"
        );
        assert_eq!(*gateway.calls.borrow(), vec!["e1"]);
    }

    #[test]
    fn test_movie_never_consults_season_or_series() {
        let mut detail = ItemDetail::default();
        detail.season_id = Some("sea1".into());
        let gateway = StubGateway::new().with_detail("m1", detail);
        let enricher = Enricher::new(&gateway, "tok");
        let session = Session {
            user_name: None,
            now_playing_item: Some(NowPlayingItem {
                id: Some("m1".into()),
                name: Some("Heat".into()),
                item_type: Some("Movie".into()),
                ..Default::default()
            }),
        };
        let records = block_on(enricher.enrich_sessions(vec![session]));
        assert_eq!(records[0].logo_url, None);
        assert_eq!(*gateway.calls.borrow(), vec!["m1"]);
    }

    #[test]
    fn test_detail_failure_degrades_to_summary() {
        let gateway = StubGateway::new().with_failure("e1");
        let enricher = Enricher::new(&gateway, "tok");
        let session = Session {
            user_name: Some("carol".into()),
            now_playing_item: Some(NowPlayingItem {
                id: Some("e1".into()),
                name: Some("Pilot".into()),
                item_type: Some("Episode".into()),
                overview: Some("summary text".into()),
                series_name: Some("Severance".into()),
                season_number: Some(1),
                episode_number: Some(2),
                ..Default::default()
            }),
        };
        let records = block_on(enricher.enrich_sessions(vec![session]));
        let record = &records[0];
        assert_eq!(record.description, "summary text");
        assert_eq!(record.thumbnail_url, PLACEHOLDER_THUMBNAIL);
        assert_eq!(record.logo_url, None);
        assert_eq!(
            record.title,
            TitleBlock::Episode {
                series_name: "Severance".into(),
                season_episode: Some("S1 E2".into()),
                episode_title: "Pilot".into(),
            }
        );
        assert_eq!(record.user_name.as_deref(), Some("carol"));
    }

    #[test]
    fn test_detail_overrides_summary_when_non_empty() {
        let gateway = StubGateway::new().with_detail(
            "e1",
            ItemDetail {
                overview: Some("detail text".into()),
                series_name: Some("".into()),
                ..Default::default()
            },
        );
        let enricher = Enricher::new(&gateway, "tok");
        let session = Session {
            user_name: None,
            now_playing_item: Some(NowPlayingItem {
                id: Some("e1".into()),
                name: Some("Pilot".into()),
                item_type: Some("Episode".into()),
                overview: Some("summary text".into()),
                series_name: Some("Severance".into()),
                ..Default::default()
            }),
        };
        let records = block_on(enricher.enrich_sessions(vec![session]));
        assert_eq!(records[0].description, "detail text");
        // Empty detail series name does not clobber the summary value.
        assert!(matches!(
            &records[0].title,
            TitleBlock::Episode { series_name, .. } if series_name == "Severance"
        ));
    }

    #[test]
    fn test_default_description_when_no_overview() {
        let gateway = StubGateway::new();
        let enricher = Enricher::new(&gateway, "tok");
        let records = block_on(enricher.enrich_sessions(vec![episode_session("e1", "Pilot")]));
        assert_eq!(records[0].description, DEFAULT_OVERVIEW);
    }

    #[test]
    fn test_long_overview_truncated_in_record() {
        let gateway = StubGateway::new().with_detail(
            "e1",
            ItemDetail {
                overview: Some("b".repeat(200)),
                ..Default::default()
            },
        );
        let enricher = Enricher::new(&gateway, "tok");
        let records = block_on(enricher.enrich_sessions(vec![episode_session("e1", "Pilot")]));
        assert_eq!(records[0].description, format!("{}...", "b".repeat(147)));
    }

    #[test]
    fn test_item_without_id_uses_defaults() {
        let gateway = StubGateway::new();
        let enricher = Enricher::new(&gateway, "tok");
        let session = Session {
            user_name: None,
            now_playing_item: Some(NowPlayingItem {
                name: Some("Mystery".into()),
                ..Default::default()
            }),
        };
        let records = block_on(enricher.enrich_sessions(vec![session]));
        let record = &records[0];
        assert_eq!(record.thumbnail_url, PLACEHOLDER_THUMBNAIL);
        assert_eq!(record.details_href, None);
        assert!(gateway.calls.borrow().is_empty());
    }

    #[test]
    fn test_fan_out_preserves_session_order() {
        let mut gateway = StubGateway::new();
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        for name in names {
            gateway = gateway.with_detail(name, ItemDetail::default());
        }
        let enricher = Enricher::new(&gateway, "tok");
        let sessions = names
            .iter()
            .copied()
            .map(|name| episode_session(name, name))
            .collect();
        let records = block_on(enricher.enrich_sessions(sessions));
        let rendered: Vec<&str> = records.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(rendered, names);
    }
}
