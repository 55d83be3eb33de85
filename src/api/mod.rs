use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::HttpSettings;

pub mod lrclib;
pub mod musixmatch;

/// 歌词接口调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 连接失败、超时等网络错误
    #[error("请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP状态异常: {0}")]
    Status(StatusCode),

    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 服务端识别为自动化访问（验证码、封禁）
    #[error("访问被拒绝")]
    AccessBlocked,

    #[error("JSON中缺少字段: {0}")]
    MissingField(&'static str),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 按配置创建共享的HTTP客户端
pub fn build_http_client(settings: &HttpSettings) -> ApiResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(settings.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// 401/403 视为访问被拒绝，其余非 2xx 为状态错误
pub(crate) fn check_status(status: StatusCode) -> ApiResult<()> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::AccessBlocked);
    }
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    Ok(())
}
