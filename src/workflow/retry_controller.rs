//! 重试控制 - 流程层
//!
//! 验证码答错时换新的令牌和验证码重来，其它错误立即终止本轮。

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::PollError;
use crate::models::ResultSet;
use crate::services::{AttemptOutcome, QueryAttempt};

/// 默认最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// 重试控制器
pub struct RetryController {
    session: Arc<dyn QueryAttempt>,
    max_attempts: usize,
}

impl RetryController {
    pub fn new(session: Arc<dyn QueryAttempt>, max_attempts: usize) -> Self {
        Self {
            session,
            max_attempts,
        }
    }

    /// 查询直到拿到结果或尝试次数用尽
    pub async fn run(&self, pattern: &str) -> Result<ResultSet, PollError> {
        for attempt in 1..=self.max_attempts {
            info!(attempt, max_attempts = self.max_attempts, "开始查询");

            match self.session.attempt(pattern).await? {
                AttemptOutcome::Success(plates) => return Ok(plates),
                AttemptOutcome::WrongAnswer => {
                    warn!(attempt, max_attempts = self.max_attempts, "incorrect captcha");
                }
            }
        }

        Err(PollError::MaxRetriesReached {
            attempts: self.max_attempts,
        })
    }
}
