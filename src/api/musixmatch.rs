//! Musixmatch 桌面端接口
//!
//! 所有方法返回原始 JSON 信封（`message.header` / `message.body`），
//! 由调用方按需提取字段。

use async_trait::async_trait;
use reqwest::header::COOKIE;
use serde_json::Value;
use tracing::debug;

use super::{check_status, ApiResult};

pub const DEFAULT_BASE_URL: &str = "https://apic-desktop.musixmatch.com/ws/1.1";
const APP_ID: &str = "web-desktop-app-v1.0";
const SEARCH_PAGE_SIZE: &str = "100";

/// Musixmatch 查询接口
#[async_trait]
pub trait MusixmatchApi: Send + Sync {
    async fn search_tracks(&self, query: &str) -> ApiResult<Value>;

    async fn get_track_richsync(&self, track_id: i64) -> ApiResult<Value>;

    async fn get_track_subtitle(&self, track_id: i64) -> ApiResult<Value>;

    async fn get_track_lyrics(&self, track_id: i64) -> ApiResult<Value>;
}

/// 基于 reqwest 的 Musixmatch 客户端，使用固定的 usertoken
#[derive(Debug, Clone)]
pub struct MusixmatchClient {
    client: reqwest::Client,
    base_url: String,
    usertoken: String,
}

impl MusixmatchClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        usertoken: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            usertoken: usertoken.into(),
        }
    }

    async fn call(&self, method: &str, params: &[(&str, &str)]) -> ApiResult<Value> {
        let url = format!("{}/{}", self.base_url, method);
        debug!("Musixmatch请求: {} {:?}", method, params);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("app_id", APP_ID),
                ("format", "json"),
                ("usertoken", self.usertoken.as_str()),
            ])
            .query(params)
            .header(COOKIE, format!("x-mxm-token-guid={}", self.usertoken))
            .send()
            .await?;

        check_status(resp.status())?;

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl MusixmatchApi for MusixmatchClient {
    async fn search_tracks(&self, query: &str) -> ApiResult<Value> {
        self.call(
            "track.search",
            &[("q", query), ("page_size", SEARCH_PAGE_SIZE), ("page", "1")],
        )
        .await
    }

    async fn get_track_richsync(&self, track_id: i64) -> ApiResult<Value> {
        let track_id = track_id.to_string();
        self.call("track.richsync.get", &[("track_id", track_id.as_str())])
            .await
    }

    async fn get_track_subtitle(&self, track_id: i64) -> ApiResult<Value> {
        let track_id = track_id.to_string();
        self.call(
            "track.subtitle.get",
            &[("track_id", track_id.as_str()), ("subtitle_format", "mxm")],
        )
        .await
    }

    async fn get_track_lyrics(&self, track_id: i64) -> ApiResult<Value> {
        let track_id = track_id.to_string();
        self.call("track.lyrics.get", &[("track_id", track_id.as_str())])
            .await
    }
}
