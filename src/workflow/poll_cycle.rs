//! 单轮查询流程 - 流程层
//!
//! 流程顺序：
//! 1. 读取上一轮结果
//! 2. 查询当前结果（含重试）
//! 3. 计算新增车牌
//! 4. 保存当前结果
//! 5. 有新增时发送通知

use std::sync::Arc;

use tracing::{error, info};

use crate::error::PollError;
use crate::models::{Plate, ResultSet};
use crate::services::{new_plates, notifier, NotificationSink, StateStore};
use crate::workflow::retry_controller::RetryController;

/// 一轮查询的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// 上一轮保存的结果
    pub previous: ResultSet,
    /// 本轮查询结果
    pub current: ResultSet,
    /// 新增车牌（按号码升序）
    pub new_plates: Vec<Plate>,
    /// 是否成功发送了通知
    pub notified: bool,
    /// 本轮结果是否已保存
    pub saved: bool,
}

/// 单轮查询流程
///
/// - 不持有 HTTP 资源，只依赖注入的能力
/// - 保存或通知失败只记录日志，不影响本轮结果
pub struct PollCycle {
    pattern: String,
    controller: RetryController,
    store: Arc<dyn StateStore>,
    sink: Option<Arc<dyn NotificationSink>>,
}

impl PollCycle {
    pub fn new(
        pattern: impl Into<String>,
        controller: RetryController,
        store: Arc<dyn StateStore>,
        sink: Option<Arc<dyn NotificationSink>>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            controller,
            store,
            sink,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 执行一轮查询
    pub async fn run(&self) -> Result<CycleReport, PollError> {
        let previous = self.store.load().await;
        info!("last={}", previous);

        let current = self.controller.run(&self.pattern).await?;
        info!("current={}", current);

        let added = new_plates(&current, &previous);
        info!("new={:?}", added.iter().map(Plate::number).collect::<Vec<_>>());

        let saved = match self.store.save(&current).await {
            Ok(()) => true,
            Err(e) => {
                error!("❌ 保存本轮结果失败: {}", e);
                false
            }
        };

        let notified = self.notify(&added).await;

        Ok(CycleReport {
            previous,
            current,
            new_plates: added,
            notified,
            saved,
        })
    }

    async fn notify(&self, added: &[Plate]) -> bool {
        if added.is_empty() {
            return false;
        }
        let Some(sink) = &self.sink else {
            return false;
        };

        let summary = notifier::summary(added);
        info!("📣 发送通知: {}", summary);
        match sink.notify(added, &summary).await {
            Ok(()) => true,
            Err(e) => {
                error!("❌ 发送通知失败: {}", e);
                false
            }
        }
    }
}
