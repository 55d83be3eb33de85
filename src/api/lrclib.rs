//! LRCLIB 接口
//!
//! 文档: https://lrclib.net/docs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{ApiError, ApiResult};

pub const DEFAULT_BASE_URL: &str = "https://lrclib.net/api";

/// LRCLIB 返回的一条歌词记录，所有字段都可能缺失
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LrclibTrack {
    pub id: Option<i64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub duration: Option<f64>,
    pub synced_lyrics: Option<String>,
    pub plain_lyrics: Option<String>,
}

/// LRCLIB 查询接口
#[async_trait]
pub trait LrclibApi: Send + Sync {
    /// 按歌手和歌名精确查询，非 2xx 响应返回 `Ok(None)`
    async fn get(&self, artist: &str, title: &str) -> ApiResult<Option<LrclibTrack>>;

    /// 全文搜索，非 2xx 响应返回 `Err(ApiError::Status)`
    async fn search(&self, query: &str) -> ApiResult<Vec<LrclibTrack>>;
}

/// 基于 reqwest 的 LRCLIB 客户端
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}/search?q={}", self.base_url, urlencoding::encode(query))
    }
}

#[async_trait]
impl LrclibApi for LrclibClient {
    async fn get(&self, artist: &str, title: &str) -> ApiResult<Option<LrclibTrack>> {
        let url = format!("{}/get", self.base_url);
        debug!("LRCLIB精确查询: {} - {}", artist, title);

        let resp = self
            .client
            .get(&url)
            .query(&[("artist_name", artist), ("track_name", title)])
            .send()
            .await?;

        let status = resp.status();
        if !has_exact_match(status) {
            debug!("LRCLIB精确查询无结果: HTTP {}", status);
            return Ok(None);
        }

        let bytes = resp.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn search(&self, query: &str) -> ApiResult<Vec<LrclibTrack>> {
        let url = self.search_url(query);
        debug!("LRCLIB搜索关键词: '{}'", query);

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let bytes = resp.bytes().await?;
        let data: Value = serde_json::from_slice(&bytes)?;
        Ok(tracks_from_search(data))
    }
}

/// `/get` 找不到时返回 404，任何非 2xx 都按无结果处理
fn has_exact_match(status: StatusCode) -> bool {
    status.is_success()
}

/// 搜索结果应为数组，其他形状视为无结果
fn tracks_from_search(data: Value) -> Vec<LrclibTrack> {
    match data {
        Value::Array(rows) => rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect(),
        _ => Vec::new(),
    }
}
