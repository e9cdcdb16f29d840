//! 编排层（Orchestration Layer）
//!
//! 负责应用生命周期：按配置组装各层能力，定时执行查询流程，处理退出信号。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (定时调度)
//!     ↓
//! workflow::PollCycle (读取 → 查询 → 对比 → 保存 → 通知)
//!     ↓
//! workflow::RetryController (验证码答错时重试)
//!     ↓
//! services::QuerySession (单次查询)
//!     ↓
//! infrastructure::MvdisClient / clients::TwoCaptchaClient
//! ```

pub mod scheduler;

pub use scheduler::{cancel_on_signal, App};
