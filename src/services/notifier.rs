//! 新车牌通知 - 业务能力层

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::models::Plate;

/// 通知接收方
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// 发送新车牌通知
    ///
    /// # 参数
    /// - `plates`: 按号码排序的新车牌，调用方保证非空
    /// - `summary`: 给人看的摘要文字
    async fn notify(&self, plates: &[Plate], summary: &str) -> Result<(), NotifyError>;
}

/// 生成通知摘要
pub fn summary(plates: &[Plate]) -> String {
    let numbers: Vec<&str> = plates.iter().map(Plate::number).collect();
    format!("新車牌釋出: {}", numbers.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_joins_numbers() {
        let plates = vec![Plate::new("AAA-0001"), Plate::new("BBB-0002")];
        assert_eq!(summary(&plates), "新車牌釋出: AAA-0001, BBB-0002");
    }
}
