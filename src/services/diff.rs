//! 新增车牌计算

use crate::models::{Plate, ResultSet};

/// 返回 `current` 中不在 `previous` 里的车牌，按号码升序
///
/// 只报告新增，消失的车牌不在结果中。
pub fn new_plates(current: &ResultSet, previous: &ResultSet) -> Vec<Plate> {
    // ResultSet 迭代本身有序且无重复
    current
        .iter()
        .filter(|plate| !previous.contains(plate))
        .cloned()
        .collect()
}
