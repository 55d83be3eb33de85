mod resolver;
pub mod providers;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

pub use resolver::{LyricsResolver, NOT_FOUND_REASON};

/// 歌词查询条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    /// 艺术家
    pub artist: String,
    /// 歌曲标题
    pub title: String,
}

impl LyricsQuery {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }
}

/// 表示单行歌词
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricLine {
    /// 开始时间（秒）
    #[serde(rename = "ts")]
    pub timestamp_seconds: f64,
    /// 结束时间（秒，仅逐字歌词提供）
    #[serde(rename = "te", skip_serializing_if = "Option::is_none")]
    pub end_seconds: Option<f64>,
    /// 歌词文本
    #[serde(rename = "x")]
    pub text: String,
    /// 逐字时间信息
    #[serde(rename = "l", skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<LyricWord>,
}

impl LyricLine {
    pub fn new(timestamp_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp_seconds,
            end_seconds: None,
            text: text.into(),
            words: Vec::new(),
        }
    }
}

/// 逐字歌词中的一个片段
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricWord {
    #[serde(rename = "c")]
    pub text: String,
    /// 相对于所在行开始时间的偏移（秒）
    #[serde(rename = "o")]
    pub offset_seconds: f64,
}

/// 歌词查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum LyricsResult {
    /// 带时间轴的歌词，`lines` 保证非空
    Synced { lines: Vec<LyricLine> },
    /// 纯文本歌词
    Plain { text: String },
    /// 未找到
    NotFound { reason: String },
}

impl LyricsResult {
    /// 构造同步歌词结果，空歌词返回 `None`
    pub fn synced(lines: Vec<LyricLine>) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self::Synced { lines })
        }
    }

    /// 构造纯文本歌词结果，空文本返回 `None`
    pub fn plain(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self::Plain { text })
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Synced { .. } => "synced",
            Self::Plain { .. } => "plain",
            Self::NotFound { .. } => "not_found",
        }
    }
}

/// 歌词提供者接口
///
/// 实现方应在内部消化网络和解析错误，找不到时返回 `Ok(None)`，
/// 以便解析器继续尝试下一个提供者。
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取歌词
    async fn fetch_lyrics(&self, query: &LyricsQuery) -> Result<Option<LyricsResult>>;
}
