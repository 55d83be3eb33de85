use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::musixmatch::MusixmatchApi;
use crate::api::{ApiError, ApiResult};
use crate::lyrics::{LyricLine, LyricWord, LyricsProvider, LyricsQuery, LyricsResult};
use crate::utils::{contains_either, normalize_name, LrcParser};

// 响应头中表示触发了验证码/封禁的状态码
const BLOCKED_STATUS_CODE: i64 = 401;
// 免费接口在歌词正文后追加的版权声明分隔符
const LYRICS_END_MARKER: &str = "*******";

/// 搜索结果中的一首候选歌曲
#[derive(Debug, Clone, PartialEq)]
struct ProviderCandidate {
    track_title: String,
    track_artist: String,
    track_id: i64,
    has_lyrics: bool,
}

impl ProviderCandidate {
    /// 从 `track_list` 的一项构造，缺少 `track_id` 的条目无法取歌词，直接丢弃
    fn from_item(item: &Value) -> Option<Self> {
        let track = item.get("track")?;
        let text = |key: &str| {
            track
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Some(Self {
            track_title: text("track_name"),
            track_artist: text("artist_name"),
            track_id: track.get("track_id").and_then(Value::as_i64)?,
            has_lyrics: track.get("has_lyrics").and_then(Value::as_i64) == Some(1),
        })
    }

    /// `title`/`artist` 为已清理并转小写的查询词
    fn matches(&self, title: &str, artist: &str) -> bool {
        let track_title = self.track_title.to_lowercase();
        let track_artist = self.track_artist.to_lowercase();

        let title_match = contains_either(title, &track_title);
        // 歌手名有时写在歌名里
        let artist_match = contains_either(artist, &track_artist) || track_title.contains(artist);

        title_match && (artist_match || artist.is_empty())
    }
}

/// 逐字歌词中的一行
#[derive(Debug, Deserialize)]
struct RichSyncLine {
    ts: f64,
    te: Option<f64>,
    #[serde(default)]
    l: Vec<RichSyncWord>,
    #[serde(default)]
    x: String,
}

#[derive(Debug, Deserialize)]
struct RichSyncWord {
    #[serde(default)]
    c: String,
    #[serde(default)]
    o: f64,
}

impl From<RichSyncLine> for LyricLine {
    fn from(line: RichSyncLine) -> Self {
        Self {
            timestamp_seconds: line.ts,
            end_seconds: line.te,
            text: line.x,
            words: line
                .l
                .into_iter()
                .map(|word| LyricWord {
                    text: word.c,
                    offset_seconds: word.o,
                })
                .collect(),
        }
    }
}

/// 字幕格式（mxm）中的一行
#[derive(Debug, Deserialize)]
struct SubtitleLine {
    #[serde(default)]
    text: String,
    #[serde(default)]
    time: SubtitleTime,
}

#[derive(Debug, Default, Deserialize)]
struct SubtitleTime {
    #[serde(default)]
    total: f64,
}

impl From<SubtitleLine> for LyricLine {
    fn from(line: SubtitleLine) -> Self {
        LyricLine::new(line.time.total, line.text)
    }
}

/// 取出嵌套的字符串字段，空串视为没有内容
fn body_text<'a>(response: &'a Value, pointer: &'static str) -> ApiResult<Option<&'a str>> {
    let text = response
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or(ApiError::MissingField(pointer))?;
    Ok(Some(text).filter(|t| !t.is_empty()))
}

/// 生成去重后的搜索关键词，大小写不敏感，保留首次出现的顺序
fn search_queries(query: &LyricsQuery, title: &str, artist: &str) -> Vec<String> {
    let candidates = [
        format!("{} {}", title, artist),
        format!("{} {}", query.title, query.artist),
        title.to_string(),
        query.title.clone(),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|q| seen.insert(q.to_lowercase()))
        .collect()
}

/// Musixmatch 歌词提供者（备用歌词源）
pub struct MusixmatchProvider {
    api: Option<Arc<dyn MusixmatchApi>>,
}

impl MusixmatchProvider {
    /// 创建新的 Musixmatch 歌词提供者，`api` 为空时提供者不可用
    pub fn new(api: Option<Arc<dyn MusixmatchApi>>) -> Self {
        Self { api }
    }

    pub fn is_available(&self) -> bool {
        self.api.is_some()
    }

    async fn search(&self, api: &dyn MusixmatchApi, keyword: &str) -> ApiResult<Vec<ProviderCandidate>> {
        let response = api.search_tracks(keyword).await?;

        let status = response
            .pointer("/message/header/status_code")
            .and_then(Value::as_i64);
        if status == Some(BLOCKED_STATUS_CODE) {
            return Err(ApiError::AccessBlocked);
        }

        Ok(response
            .pointer("/message/body/track_list")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(ProviderCandidate::from_item).collect())
            .unwrap_or_default())
    }

    async fn fetch_richsync(&self, api: &dyn MusixmatchApi, track_id: i64) -> ApiResult<Option<LyricsResult>> {
        let response = api.get_track_richsync(track_id).await?;
        let Some(body) = body_text(&response, "/message/body/richsync/richsync_body")? else {
            return Ok(None);
        };

        let lines: Vec<RichSyncLine> = serde_json::from_str(body)?;
        Ok(LyricsResult::synced(lines.into_iter().map(LyricLine::from).collect()))
    }

    async fn fetch_subtitle(&self, api: &dyn MusixmatchApi, track_id: i64) -> ApiResult<Option<LyricsResult>> {
        let response = api.get_track_subtitle(track_id).await?;
        let Some(body) = body_text(&response, "/message/body/subtitle/subtitle_body")? else {
            return Ok(None);
        };

        let lines: Vec<LyricLine> = match serde_json::from_str::<Vec<SubtitleLine>>(body) {
            Ok(lines) => lines.into_iter().map(LyricLine::from).collect(),
            Err(e) => {
                debug!("Musixmatch字幕不是JSON格式({})，按LRC解析", e);
                LrcParser::parse(body)
            }
        };
        Ok(LyricsResult::synced(lines))
    }

    async fn fetch_plain(&self, api: &dyn MusixmatchApi, track_id: i64) -> ApiResult<Option<LyricsResult>> {
        let response = api.get_track_lyrics(track_id).await?;
        let Some(body) = body_text(&response, "/message/body/lyrics/lyrics_body")? else {
            return Ok(None);
        };

        let text = body.split(LYRICS_END_MARKER).next().unwrap_or_default().trim();
        Ok(LyricsResult::plain(text))
    }

    /// 依次尝试逐字歌词、字幕、纯文本，任一步失败只影响该步
    async fn extract(&self, api: &dyn MusixmatchApi, candidate: &ProviderCandidate) -> Option<LyricsResult> {
        let id = candidate.track_id;

        match self.fetch_richsync(api, id).await {
            Ok(Some(result)) => return Some(result),
            Ok(None) => debug!("Musixmatch逐字歌词为空: {}", id),
            Err(e) => debug!("Musixmatch逐字歌词获取失败: {}, 错误: {}", id, e),
        }

        match self.fetch_subtitle(api, id).await {
            Ok(Some(result)) => return Some(result),
            Ok(None) => debug!("Musixmatch字幕为空: {}", id),
            Err(e) => debug!("Musixmatch字幕获取失败: {}, 错误: {}", id, e),
        }

        if candidate.has_lyrics {
            match self.fetch_plain(api, id).await {
                Ok(Some(result)) => return Some(result),
                Ok(None) => debug!("Musixmatch纯文本歌词为空: {}", id),
                Err(e) => debug!("Musixmatch纯文本歌词获取失败: {}, 错误: {}", id, e),
            }
        }

        None
    }
}

#[async_trait]
impl LyricsProvider for MusixmatchProvider {
    fn name(&self) -> &str {
        "musixmatch"
    }

    async fn fetch_lyrics(&self, query: &LyricsQuery) -> Result<Option<LyricsResult>> {
        let Some(api) = self.api.as_deref() else {
            debug!("Musixmatch客户端不可用，跳过");
            return Ok(None);
        };

        let title = normalize_name(&query.title);
        let artist = normalize_name(&query.artist);
        let title_lower = title.to_lowercase();
        let artist_lower = artist.to_lowercase();

        for keyword in search_queries(query, &title, &artist) {
            debug!("Musixmatch搜索关键词: '{}'", keyword);
            let candidates = match self.search(api, &keyword).await {
                Ok(candidates) => candidates,
                Err(ApiError::AccessBlocked) => {
                    warn!("Musixmatch搜索被拦截，尝试下一个关键词: '{}'", keyword);
                    continue;
                }
                Err(e) => {
                    warn!("Musixmatch搜索失败: '{}', 错误: {}", keyword, e);
                    continue;
                }
            };

            debug!("Musixmatch搜索结果数量: {}", candidates.len());

            for candidate in candidates
                .iter()
                .filter(|c| c.matches(&title_lower, &artist_lower))
            {
                debug!(
                    "Musixmatch候选: {} - {} (ID: {})",
                    candidate.track_artist, candidate.track_title, candidate.track_id
                );
                if let Some(result) = self.extract(api, candidate).await {
                    info!(
                        "成功获取Musixmatch歌词: {} - {}, 类型: {}",
                        query.artist,
                        query.title,
                        result.kind()
                    );
                    return Ok(Some(result));
                }
            }
        }

        debug!("Musixmatch未找到歌词: {} - {}", query.artist, query.title);
        Ok(None)
    }
}
