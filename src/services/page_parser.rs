//! 选号页面解析 - 业务能力层
//!
//! 只负责从 HTML 中读出令牌、判断验证码是否答错、提取车牌列表，
//! 站点改版时只需修改本模块。

use std::sync::OnceLock;

use scraper::{Html, Selector};

use crate::models::{Plate, ResultSet};

/// 站点提示验证码错误时页面中出现的文字
pub const WRONG_ANSWER_MARKER: &str = "驗證數字輸入錯誤";

fn token_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("input[name='CSRFToken']").expect("valid token selector"))
}

fn plate_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| {
        Selector::parse("#countList .number_cell .number").expect("valid plate selector")
    })
}

/// 提取表单中的防伪令牌
///
/// 取第一个 `CSRFToken` 隐藏字段的 value，字段不存在或 value 为空时返回 None。
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(token_selector())
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// 判断查询结果页是否为"验证码输入错误"
pub fn is_wrong_answer(html: &str) -> bool {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .collect::<String>()
        .contains(WRONG_ANSWER_MARKER)
}

/// 提取结果列表中的所有车牌号码
///
/// 号码去掉首尾空白，空白单元格忽略，重复号码合并。
pub fn extract_plates(html: &str) -> ResultSet {
    let document = Html::parse_document(html);
    document
        .select(plate_selector())
        .map(|cell| cell.text().collect::<String>())
        .filter_map(|text| {
            let number = text.trim();
            (!number.is_empty()).then(|| Plate::new(number))
        })
        .collect()
}
