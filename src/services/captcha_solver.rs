//! 验证码识别能力 - 业务能力层

use async_trait::async_trait;

use crate::error::SolverError;

/// 答案长度提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthHint {
    pub min: usize,
    pub max: usize,
}

impl LengthHint {
    /// 固定长度
    pub const fn exactly(len: usize) -> Self {
        Self { min: len, max: len }
    }
}

/// 选号站点的验证码固定为 4 位
pub const PLATE_CAPTCHA_LENGTH: LengthHint = LengthHint::exactly(4);

/// 验证码识别服务
///
/// 只负责一次识别，不做重试；重试由上层决定。
#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    async fn solve(&self, image: &[u8], hint: LengthHint) -> Result<String, SolverError>;
}
