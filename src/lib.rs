//! # Plate Watch
//!
//! 定时查询监理服务网的选号结果，发现新释出的车牌时推送通知
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有带 Cookie 的 HTTP 会话，只暴露请求能力
//! - `clients/` - 2Captcha 识别服务和 ntfy 推送服务的客户端
//!
//! ### ② 业务能力层（Services）
//! - `QuerySession` - 一次完整的"令牌 → 验证码 → 提交 → 判断"
//! - `page_parser` - 页面解析，站点改版时只改这里
//! - `StateStore` - 上一轮结果的读写
//! - `diff` - 新增车牌计算
//!
//! ### ③ 流程层（Workflow）
//! - `RetryController` - 验证码答错时重试
//! - `PollCycle` - 读取 → 查询 → 对比 → 保存 → 通知
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 组装依赖，定时执行，处理退出信号

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, PollError};
pub use models::{Plate, ResultSet};
pub use orchestrator::{cancel_on_signal, App};
pub use workflow::{CycleReport, PollCycle, RetryController};
