use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 车牌号码
///
/// 以号码字符串比较和排序，构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Plate {
    number: String,
}

impl Plate {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }

    /// 号码文本
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.number)
    }
}

/// 一次成功查询得到的车牌集合
///
/// 重复号码会被合并。内部使用有序集合，迭代顺序即号码的字典序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    plates: BTreeSet<Plate>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, plate: &Plate) -> bool {
        self.plates.contains(plate)
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plate> {
        self.plates.iter()
    }

    /// 号码列表（升序）
    pub fn numbers(&self) -> Vec<&str> {
        self.plates.iter().map(Plate::number).collect()
    }
}

impl FromIterator<Plate> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Plate>>(iter: I) -> Self {
        Self {
            plates: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for ResultSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Plate::new).collect()
    }
}

impl IntoIterator for ResultSet {
    type Item = Plate;
    type IntoIter = std::collections::btree_set::IntoIter<Plate>;

    fn into_iter(self) -> Self::IntoIter {
        self.plates.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Plate;
    type IntoIter = std::collections::btree_set::Iter<'a, Plate>;

    fn into_iter(self) -> Self::IntoIter {
        self.plates.iter()
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.numbers().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let set: ResultSet = ["ABC-1234", "ABC-1234", "XYZ-5678"].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iteration_is_sorted_by_number() {
        let set: ResultSet = ["BBB-0002", "AAA-0001", "CCC-0003"].into_iter().collect();
        assert_eq!(set.numbers(), vec!["AAA-0001", "BBB-0002", "CCC-0003"]);
    }

    #[test]
    fn plate_serializes_with_number_field() {
        let json = serde_json::to_string(&Plate::new("ABC-1234")).unwrap();
        assert_eq!(json, r#"{"number":"ABC-1234"}"#);
    }

    #[test]
    fn display_lists_numbers() {
        let set: ResultSet = ["XYZ-5678", "ABC-1234"].into_iter().collect();
        assert_eq!(set.to_string(), "[ABC-1234, XYZ-5678]");
    }
}
