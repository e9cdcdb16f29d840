/// 日志工具模块
///
/// 提供启动和每轮查询的日志输出辅助函数
use std::time::Duration;

use tracing::info;

use crate::workflow::CycleReport;

/// 记录程序启动信息
///
/// # 参数
/// - `pattern`: 查询号码模式
/// - `interval`: 轮询间隔
/// - `topic`: 通知主题
pub fn log_startup(pattern: &str, interval: Duration, topic: Option<&str>) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始监控号码模式 {}，每 {:?} 查询一次", pattern, interval);
    match topic {
        Some(topic) => info!("🔔 新车牌将推送至主题: {}", topic),
        None => info!("🔕 未设置通知主题，仅记录日志"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录一轮查询开始
pub fn log_cycle_start(cycle: u64) {
    info!("\n{}", "─".repeat(60));
    info!(
        "🔍 第 {} 轮查询 - {}",
        cycle,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
}

/// 记录一轮查询结果
pub fn log_cycle_complete(cycle: u64, report: &CycleReport) {
    info!(
        "✓ 第 {} 轮完成: 当前 {} 个，新增 {} 个{}{}",
        cycle,
        report.current.len(),
        report.new_plates.len(),
        if report.notified { "，已通知" } else { "" },
        if report.saved { "" } else { "，状态未保存" },
    );
    info!("{}", "─".repeat(60));
}

/// 记录程序退出
pub fn log_shutdown(cycles: u64) {
    info!("\n{}", "=".repeat(60));
    info!("👋 收到退出信号，共完成 {} 轮查询", cycles);
    info!("{}", "=".repeat(60));
}
