//! 单次选号查询 - 业务能力层
//!
//! 一次尝试严格按顺序执行：
//! 1. 获取查询页面
//! 2. 提取防伪令牌
//! 3. 获取验证码图片
//! 4. 识别验证码
//! 5. 提交查询
//! 6. 判断结果页
//!
//! 令牌和验证码答案只在一次尝试内有效，每次尝试都重新获取。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::PollError;
use crate::infrastructure::PlateSite;
use crate::models::{QueryForm, ResultSet, StationProfile};
use crate::services::captcha_solver::{CaptchaSolver, PLATE_CAPTCHA_LENGTH};
use crate::services::page_parser;

/// 一次尝试的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 查询成功，结果可能为空
    Success(ResultSet),
    /// 验证码答错，可以重试
    WrongAnswer,
}

/// 可重复执行的单次查询
#[async_trait]
pub trait QueryAttempt: Send + Sync {
    async fn attempt(&self, pattern: &str) -> Result<AttemptOutcome, PollError>;
}

/// 选号查询会话
///
/// 职责：
/// - 执行一次完整的"令牌 → 验证码 → 提交 → 判断"流程
/// - 不做重试，不关心上一轮结果
pub struct QuerySession {
    site: Arc<dyn PlateSite>,
    solver: Arc<dyn CaptchaSolver>,
    station: StationProfile,
}

impl QuerySession {
    pub fn new(
        site: Arc<dyn PlateSite>,
        solver: Arc<dyn CaptchaSolver>,
        station: StationProfile,
    ) -> Self {
        Self {
            site,
            solver,
            station,
        }
    }
}

#[async_trait]
impl QueryAttempt for QuerySession {
    async fn attempt(&self, pattern: &str) -> Result<AttemptOutcome, PollError> {
        let landing = self.site.fetch_landing().await?;

        let token = page_parser::extract_csrf_token(&landing)
            .ok_or_else(|| PollError::Protocol("token not found".to_string()))?;
        debug!("csrf token={}", token);

        let image = self.site.fetch_challenge().await?;

        let answer = self.solver.solve(&image, PLATE_CAPTCHA_LENGTH).await?;
        info!("captcha answer={}", answer);

        let form = QueryForm::new(&self.station, pattern, &answer, &token)?;
        let result_page = self.site.submit(&form).await?;

        if page_parser::is_wrong_answer(&result_page) {
            warn!("⚠️ 验证码输入错误");
            return Ok(AttemptOutcome::WrongAnswer);
        }

        let plates = page_parser::extract_plates(&result_page);
        info!("{} plates found", plates.len());
        Ok(AttemptOutcome::Success(plates))
    }
}
