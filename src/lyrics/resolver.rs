use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::lyrics::{providers, LyricsProvider, LyricsQuery, LyricsResult};

/// 所有提供者都失败时返回的原因
pub const NOT_FOUND_REASON: &str = "Lyrics not found";

/// 歌词解析器，按优先级依次尝试各个提供者
#[derive(Clone)]
pub struct LyricsResolver {
    providers: Arc<Vec<Arc<dyn LyricsProvider>>>,
}

impl LyricsResolver {
    /// 使用给定顺序的提供者创建解析器
    pub fn new(providers: Vec<Arc<dyn LyricsProvider>>) -> Self {
        Self {
            providers: Arc::new(providers),
        }
    }

    /// 根据配置创建解析器
    pub fn from_config(config: &Config) -> Self {
        Self::new(providers::get_enabled_providers(config))
    }

    /// 获取歌词，找不到时返回 `NotFound`
    pub async fn resolve(&self, artist: &str, title: &str) -> LyricsResult {
        self.resolve_query(&LyricsQuery::new(artist, title)).await
    }

    pub async fn resolve_query(&self, query: &LyricsQuery) -> LyricsResult {
        for provider in self.providers.iter() {
            debug!("尝试从 {} 获取歌词", provider.name());
            match provider.fetch_lyrics(query).await {
                Ok(Some(result)) => {
                    info!(
                        "成功获取歌词: {} - {}, 来源: {}, 类型: {}",
                        query.artist,
                        query.title,
                        provider.name(),
                        result.kind()
                    );
                    return result;
                }
                Ok(None) => {
                    debug!("{} 未找到歌词，尝试下一个提供者", provider.name());
                }
                Err(e) => {
                    warn!("{} 获取歌词失败: {}", provider.name(), e);
                }
            }
        }

        info!("未找到歌词: {} - {}", query.artist, query.title);
        LyricsResult::NotFound {
            reason: NOT_FOUND_REASON.to_string(),
        }
    }
}
