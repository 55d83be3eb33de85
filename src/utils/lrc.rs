use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::lyrics::LyricLine;

// 时间标签: [mm:ss.xx]，秒必须带小数部分
static TIME_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([0-9]+):([0-9]+\.[0-9]+)\](.*)").expect("valid LRC regex"));

/// LRC歌词解析器，用于解析 `[mm:ss.xx]歌词` 格式
pub struct LrcParser;

impl LrcParser {
    /// 解析LRC格式的歌词
    ///
    /// 不符合时间标签格式的行（元数据、空行等）直接跳过。
    /// 输出保持原始行顺序，不排序也不去重。
    pub fn parse(content: &str) -> Vec<LyricLine> {
        let mut lines = Vec::new();

        for raw_line in content.split('\n') {
            let Some(cap) = TIME_TAG_REGEX.captures(raw_line) else {
                continue;
            };

            // 正则保证了数字格式，这里解析失败只可能是数值溢出
            let (Ok(mins), Ok(secs)) = (cap[1].parse::<f64>(), cap[2].parse::<f64>()) else {
                debug!("LRC解析: 跳过无法解析的时间标签 '{}'", raw_line);
                continue;
            };

            lines.push(LyricLine::new(mins * 60.0 + secs, cap[3].trim()));
        }

        lines
    }
}
