use serde_json::Value;
use tracing::debug;

use super::output::{render_error, render_result};
use crate::config::Config;
use crate::lyrics::{LyricsResolver, LyricsResult};

pub const MISSING_ARGS_ERROR: &str = "Missing artist or title";

/// 一次执行的输出和退出码
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub body: Value,
    pub exit_code: u8,
}

pub struct App {
    resolver: LyricsResolver,
}

impl App {
    /// 创建新应用实例
    pub fn new(resolver: LyricsResolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(LyricsResolver::from_config(config))
    }

    /// 查询歌词，参数缺失时返回错误对象和非零退出码
    pub async fn run(&self, artist: Option<&str>, title: Option<&str>) -> Outcome {
        let (Some(artist), Some(title)) = (artist, title) else {
            return Outcome {
                body: render_error(MISSING_ARGS_ERROR),
                exit_code: 1,
            };
        };

        debug!("开始查询歌词: {} - {}", artist, title);
        let result = self.resolver.resolve(artist, title).await;
        if let LyricsResult::NotFound { reason } = &result {
            debug!("查询结束: {}", reason);
        }

        Outcome {
            body: render_result(&result),
            exit_code: 0,
        }
    }
}
