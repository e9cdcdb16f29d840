use anyhow::Result;
use plate_watch::{cancel_on_signal, logger, App, Config};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::load()?;

    // 监听退出信号
    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    // 初始化并运行应用
    App::initialize(config)?.run(shutdown).await;

    Ok(())
}
