use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHESES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*?\)").expect("valid parentheses regex"));
static BRACKETS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]").expect("valid brackets regex"));
// 从第一个噪声词开始截断到行尾
static NOISE_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:ft\.|feat\.|official video|lyrics|audio|video|full version|remix).*")
        .expect("valid noise suffix regex")
});
static SPECIAL_CHARS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid special chars regex"));

/// 清理歌手/歌名，用于搜索和匹配
///
/// 依次移除括号内容、方括号内容、`feat.`/`remix` 等噪声词及其之后的内容，
/// 最后去掉标点符号和首尾空白。不改变大小写。
pub fn normalize_name(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let name = PARENTHESES_REGEX.replace_all(raw, "");
    let name = BRACKETS_REGEX.replace_all(&name, "");
    let name = NOISE_SUFFIX_REGEX.replace_all(&name, "");
    let name = SPECIAL_CHARS_REGEX.replace_all(&name, "");

    name.trim().to_string()
}

/// 任意一方包含另一方即视为匹配（空串被任何字符串包含）
pub fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
