//! Go 风格时长解析（`5m`、`90s`、`1h30m`、`500ms`）

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

fn segment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)(ms|h|m|s)").expect("valid duration regex"))
}

/// 解析时长字符串，格式不合法时返回 None
pub fn parse_go_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let mut total = 0f64;
    let mut consumed = 0;

    for caps in segment_regex().captures_iter(input) {
        let whole = caps.get(0)?;
        // 各段必须首尾相接，不允许夹杂其它字符
        if whole.start() != consumed {
            return None;
        }
        consumed = whole.end();

        let value: f64 = caps[1].parse().ok()?;
        total += match &caps[2] {
            "h" => value * 3600.0,
            "m" => value * 60.0,
            "s" => value,
            "ms" => value / 1000.0,
            _ => return None,
        };
    }

    if consumed != input.len() {
        return None;
    }

    // 超出 Duration 范围的值视为不合法
    Duration::try_from_secs_f64(total).ok()
}
