use serde_json::{json, Value};

use crate::lyrics::LyricsResult;

/// 将查询结果转换为输出的 JSON 对象
pub fn render_result(result: &LyricsResult) -> Value {
    match result {
        LyricsResult::Synced { lines } => json!({ "lyrics": lines, "type": "synced" }),
        LyricsResult::Plain { text } => json!({ "lyrics": text, "type": "plain" }),
        LyricsResult::NotFound { reason } => render_error(reason),
    }
}

pub fn render_error(message: &str) -> Value {
    json!({ "error": message })
}
