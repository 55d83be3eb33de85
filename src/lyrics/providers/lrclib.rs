use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::api::lrclib::{LrclibApi, LrclibTrack};
use crate::api::ApiResult;
use crate::lyrics::{LyricsProvider, LyricsQuery, LyricsResult};
use crate::utils::LrcParser;

/// LRCLIB 歌词提供者（主歌词源）
pub struct LrclibProvider {
    api: Arc<dyn LrclibApi>,
}

impl LrclibProvider {
    /// 创建新的 LRCLIB 歌词提供者
    pub fn new(api: Arc<dyn LrclibApi>) -> Self {
        Self { api }
    }

    /// 先取同步歌词，解析为空时退回纯文本
    fn extract(track: &LrclibTrack) -> Option<LyricsResult> {
        if let Some(synced) = track.synced_lyrics.as_deref().filter(|s| !s.is_empty()) {
            if let Some(result) = LyricsResult::synced(LrcParser::parse(synced)) {
                return Some(result);
            }
            debug!("LRCLIB同步歌词解析结果为空，尝试纯文本歌词");
        }

        track.plain_lyrics.as_deref().and_then(LyricsResult::plain)
    }

    fn log_hit(stage: &str, track: &LrclibTrack) {
        debug!(
            "LRCLIB{}命中: ID {:?}, {} - {}, 专辑: {}, 时长: {:?}s",
            stage,
            track.id,
            track.artist_name.as_deref().unwrap_or_default(),
            track.track_name.as_deref().unwrap_or_default(),
            track.album_name.as_deref().unwrap_or_default(),
            track.duration
        );
    }

    /// 字段缺失视为空串
    fn field_contains(field: Option<&str>, needle: &str) -> bool {
        field.unwrap_or_default().to_lowercase().contains(needle)
    }

    async fn lookup(&self, query: &LyricsQuery) -> ApiResult<Option<LyricsResult>> {
        // 1. 精确匹配
        if let Some(track) = self.api.get(&query.artist, &query.title).await? {
            if let Some(result) = Self::extract(&track) {
                Self::log_hit("精确匹配", &track);
                return Ok(Some(result));
            }
        }

        // 2. 全文搜索
        let keyword = format!("{} {}", query.title, query.artist);
        let rows = self.api.search(&keyword).await?;
        debug!("LRCLIB搜索结果数量: {}", rows.len());

        // 3. 歌名和歌手都包含查询词的结果优先
        let title = query.title.to_lowercase();
        let artist = query.artist.to_lowercase();
        let matched = rows
            .iter()
            .filter(|row| {
                Self::field_contains(row.track_name.as_deref(), &title)
                    && Self::field_contains(row.artist_name.as_deref(), &artist)
            })
            .find_map(|row| Self::extract(row).map(|result| (row, result)));
        if let Some((row, result)) = matched {
            Self::log_hit("搜索匹配", row);
            return Ok(Some(result));
        }

        // 4. 退回第一条有歌词的结果
        let fallback = rows
            .iter()
            .find_map(|row| Self::extract(row).map(|result| (row, result)));
        Ok(fallback.map(|(row, result)| {
            Self::log_hit("搜索首条", row);
            result
        }))
    }
}

#[async_trait]
impl LyricsProvider for LrclibProvider {
    fn name(&self) -> &str {
        "lrclib"
    }

    async fn fetch_lyrics(&self, query: &LyricsQuery) -> Result<Option<LyricsResult>> {
        match self.lookup(query).await {
            Ok(Some(result)) => {
                info!("成功获取LRCLIB歌词: {} - {}", query.artist, query.title);
                Ok(Some(result))
            }
            Ok(None) => {
                debug!("LRCLIB未找到歌词: {} - {}", query.artist, query.title);
                Ok(None)
            }
            Err(e) => {
                warn!("LRCLIB获取歌词失败: {}", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reqwest::StatusCode;

    use super::*;
    use crate::api::ApiError;
    use crate::lyrics::LyricLine;

    #[derive(Default)]
    struct FakeLrclib {
        exact: Option<LrclibTrack>,
        exact_malformed: bool,
        search_rows: Vec<LrclibTrack>,
        search_status: Option<StatusCode>,
        search_queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LrclibApi for FakeLrclib {
        async fn get(&self, _artist: &str, _title: &str) -> ApiResult<Option<LrclibTrack>> {
            if self.exact_malformed {
                let malformed = serde_json::from_str::<LrclibTrack>("{").unwrap_err();
                return Err(ApiError::Json(malformed));
            }
            Ok(self.exact.clone())
        }

        async fn search(&self, query: &str) -> ApiResult<Vec<LrclibTrack>> {
            self.search_queries.lock().unwrap().push(query.to_string());
            if let Some(status) = self.search_status {
                return Err(ApiError::Status(status));
            }
            Ok(self.search_rows.clone())
        }
    }

    fn row(track: &str, artist: &str, synced: Option<&str>, plain: Option<&str>) -> LrclibTrack {
        LrclibTrack {
            track_name: Some(track.to_string()),
            artist_name: Some(artist.to_string()),
            synced_lyrics: synced.map(str::to_string),
            plain_lyrics: plain.map(str::to_string),
            ..Default::default()
        }
    }

    async fn fetch(api: FakeLrclib, artist: &str, title: &str) -> (Option<LyricsResult>, Vec<String>) {
        let api = Arc::new(api);
        let provider = LrclibProvider::new(api.clone());
        let result = provider
            .fetch_lyrics(&LyricsQuery::new(artist, title))
            .await
            .unwrap();
        let queries = api.search_queries.lock().unwrap().clone();
        (result, queries)
    }

    #[tokio::test]
    async fn test_exact_match_synced() {
        let api = FakeLrclib {
            exact: Some(row("Hey Jude", "The Beatles", Some("[00:01.00]Hello\n[00:02.50]World"), Some("plain"))),
            ..Default::default()
        };

        let (result, queries) = fetch(api, "The Beatles", "Hey Jude").await;

        assert_eq!(
            result,
            Some(LyricsResult::Synced {
                lines: vec![LyricLine::new(1.0, "Hello"), LyricLine::new(2.5, "World")]
            })
        );
        assert!(queries.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_synced_falls_back_to_plain() {
        let api = FakeLrclib {
            exact: Some(row("Hey Jude", "The Beatles", Some("[ti:Hey Jude]"), Some("Hey Jude, don't make it bad"))),
            ..Default::default()
        };

        let (result, _) = fetch(api, "The Beatles", "Hey Jude").await;

        assert_eq!(
            result,
            Some(LyricsResult::Plain {
                text: "Hey Jude, don't make it bad".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_search_prefers_name_match() {
        let api = FakeLrclib {
            search_rows: vec![
                row("Hey Jude (Cover)", "Someone Else", Some("[00:05.00]cover"), None),
                row("Hey Jude - Remastered 2015", "The Beatles", None, None),
                row("HEY JUDE", "the beatles", None, Some("original")),
            ],
            ..Default::default()
        };

        let (result, queries) = fetch(api, "The Beatles", "Hey Jude").await;

        assert_eq!(queries, vec!["Hey Jude The Beatles".to_string()]);
        assert_eq!(
            result,
            Some(LyricsResult::Plain {
                text: "original".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_search_falls_back_to_first_row_with_lyrics() {
        let api = FakeLrclib {
            search_rows: vec![
                row("Something", "Nobody", None, Some("")),
                row("Other", "Nobody", Some("[00:05.00]first with lyrics"), None),
                row("Another", "Nobody", None, Some("later")),
            ],
            ..Default::default()
        };

        let (result, _) = fetch(api, "The Beatles", "Hey Jude").await;

        assert_eq!(
            result,
            Some(LyricsResult::Synced {
                lines: vec![LyricLine::new(5.0, "first with lyrics")]
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_exact_response_skips_search() {
        let api = FakeLrclib {
            exact_malformed: true,
            search_rows: vec![row("Hey Jude", "The Beatles", None, Some("never reached"))],
            ..Default::default()
        };

        let (result, queries) = fetch(api, "The Beatles", "Hey Jude").await;

        assert_eq!(result, None);
        assert!(queries.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_is_not_found() {
        let api = FakeLrclib {
            search_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            ..Default::default()
        };

        let (result, queries) = fetch(api, "Unknown Artist", "Unknown Title").await;

        assert_eq!(result, None);
        assert_eq!(queries.len(), 1);
    }
}
