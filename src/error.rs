use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// 被装箱的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 查询流程错误
    #[error("查询错误: {0}")]
    Poll(#[from] PollError),
    /// 通知发送错误
    #[error("通知错误: {0}")]
    Notify(#[from] NotifyError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 查询所处的阶段（仅用于错误信息）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    /// 获取查询页面
    Landing,
    /// 获取验证码图片
    Challenge,
    /// 提交查询表单
    Submit,
}

impl std::fmt::Display for QueryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QueryStage::Landing => "获取查询页面",
            QueryStage::Challenge => "获取验证码图片",
            QueryStage::Submit => "提交查询",
        };
        f.write_str(name)
    }
}

/// 一次轮询中的终止性错误
///
/// 验证码答错不在此列，它是 [`crate::services::AttemptOutcome::WrongAnswer`]。
#[derive(Debug, Error)]
pub enum PollError {
    /// 网络传输失败或超时
    #[error("网络请求失败 ({stage}): {source}")]
    Network {
        stage: QueryStage,
        #[source]
        source: BoxError,
    },
    /// 页面结构与预期不符
    #[error("页面结构异常: {0}")]
    Protocol(String),
    /// 验证码识别失败
    #[error("验证码识别失败: {0}")]
    Solver(#[from] SolverError),
    /// 验证码连续答错，达到最大尝试次数
    #[error("已达到最大重试次数 ({attempts})")]
    MaxRetriesReached { attempts: usize },
}

impl PollError {
    /// 创建网络错误
    pub fn network(stage: QueryStage, source: impl Into<BoxError>) -> Self {
        PollError::Network {
            stage,
            source: source.into(),
        }
    }
}

/// 验证码识别服务错误
#[derive(Debug, Error)]
pub enum SolverError {
    /// 无法连接识别服务
    #[error("无法连接识别服务: {0}")]
    Unreachable(#[source] BoxError),
    /// 识别服务拒绝了任务
    #[error("识别服务拒绝任务: {code}")]
    Rejected { code: String },
    /// 识别服务无法识别
    #[error("识别服务无法识别: {code}")]
    Unsolvable { code: String },
    /// 等待识别结果超时
    #[error("等待识别结果超时 ({waited:?})")]
    Timeout { waited: Duration },
    /// 识别服务返回无法解析的内容
    #[error("识别服务返回异常: {0}")]
    BadResponse(String),
}

/// 状态文件写入错误
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// 序列化失败
    #[error("序列化状态失败: {0}")]
    Serialize(#[from] serde_json::Error),
    /// 写入文件失败
    #[error("写入状态文件失败 ({}): {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 通知发送错误
#[derive(Debug, Error)]
pub enum NotifyError {
    /// 请求失败
    #[error("通知请求失败: {0}")]
    Request(#[from] reqwest::Error),
    /// 服务端返回非成功状态
    #[error("通知服务返回状态码 {status}")]
    Status { status: u16 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必需的配置项缺失
    #[error("{name} is required")]
    MissingVar { name: String },
    /// 配置值无法解析
    #[error("配置项 {name} 解析失败: 值 '{value}' 无法转换为 {expected}")]
    InvalidValue {
        name: String,
        value: String,
        expected: String,
    },
    /// 读取配置文件失败
    #[error("无法读取配置文件 ({}): {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 解析配置文件失败
    #[error("无法解析配置文件 ({}): {source}", .path.display())]
    FileParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_keeps_stage_and_source() {
        let err = PollError::network(
            QueryStage::Challenge,
            std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
        );
        let msg = err.to_string();
        assert!(msg.contains("获取验证码图片"));
        assert!(msg.contains("timed out"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn solver_error_converts_into_poll_error() {
        let err: PollError = SolverError::Unsolvable {
            code: "ERROR_CAPTCHA_UNSOLVABLE".to_string(),
        }
        .into();
        assert!(matches!(err, PollError::Solver(SolverError::Unsolvable { .. })));
    }

    #[test]
    fn missing_var_message_names_the_variable() {
        let err = ConfigError::MissingVar {
            name: "PLATE_PATTERN".to_string(),
        };
        assert_eq!(err.to_string(), "PLATE_PATTERN is required");
    }
}
