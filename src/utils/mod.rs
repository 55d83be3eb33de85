// 工具模块
mod lrc;
mod string;

pub use lrc::LrcParser;
pub use string::{contains_either, normalize_name};
