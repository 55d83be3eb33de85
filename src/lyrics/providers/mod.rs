mod lrclib;
mod musixmatch;

use std::sync::Arc;

use crate::api::lrclib::LrclibClient;
use crate::api::musixmatch::{MusixmatchApi, MusixmatchClient};
use crate::api::build_http_client;
use crate::config::Config;
use crate::lyrics::LyricsProvider;
use tracing::{debug, error, info, warn};

pub use lrclib::LrclibProvider;
pub use musixmatch::MusixmatchProvider;

/// 获取所有启用的歌词提供者，顺序即优先级
pub fn get_enabled_providers(config: &Config) -> Vec<Arc<dyn LyricsProvider>> {
    let mut providers: Vec<Arc<dyn LyricsProvider>> = Vec::new();
    let client = match build_http_client(&config.http) {
        Ok(client) => client,
        Err(e) => {
            error!("创建HTTP客户端失败，所有歌词源不可用: {}", e);
            return providers;
        }
    };

    debug!("加载启用的歌词提供者，配置的源: {:?}", config.lyrics_sources);

    for source in &config.lyrics_sources {
        match source.as_str() {
            "lrclib" => {
                if let Some(lrclib_config) = &config.sources.lrclib {
                    info!("启用LRCLIB歌词源: {}", lrclib_config.base_url);
                    let api = LrclibClient::new(client.clone(), lrclib_config.base_url.as_str());
                    providers.push(Arc::new(LrclibProvider::new(Arc::new(api))));
                } else {
                    warn!("已启用LRCLIB歌词源，但未找到相关配置");
                }
            }
            "musixmatch" | "mxm" => {
                // 没有 usertoken 时仍然注册，提供者自身返回未找到
                let api = config.sources.musixmatch.as_ref().and_then(|mxm_config| {
                    let token = mxm_config.usertoken()?;
                    let api = MusixmatchClient::new(client.clone(), mxm_config.base_url.as_str(), token);
                    Some(Arc::new(api) as Arc<dyn MusixmatchApi>)
                });
                let provider = MusixmatchProvider::new(api);
                if provider.is_available() {
                    info!("启用Musixmatch歌词源");
                } else {
                    warn!("未配置Musixmatch usertoken，Musixmatch歌词源不可用");
                }
                providers.push(Arc::new(provider));
            }
            _ => {
                warn!("未知的歌词源: {}", source);
            }
        }
    }

    info!("成功加载 {} 个歌词提供者", providers.len());
    for (i, provider) in providers.iter().enumerate() {
        debug!("歌词提供者 #{}: {}", i + 1, provider.name());
    }

    providers
}
