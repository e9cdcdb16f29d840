//! 定时轮询 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：按配置创建站点客户端、验证码客户端、状态存储和通知客户端
//! 2. **定时执行**：启动后立即查询一次，之后按间隔依次执行，不会重叠
//! 3. **退出处理**：收到退出信号后在下一个等待点停止，状态文件不会写坏
//! 4. **错误隔离**：单轮失败只记录日志，下一轮照常执行

use std::sync::Arc;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::clients::{NtfyClient, TwoCaptchaClient};
use crate::config::Config;
use crate::error::{AppResult, PollError};
use crate::infrastructure::MvdisClient;
use crate::services::{JsonFileStore, NotificationSink, QuerySession};
use crate::utils::logging::{log_cycle_complete, log_cycle_start, log_shutdown, log_startup};
use crate::workflow::{PollCycle, RetryController};

/// 应用主结构
pub struct App {
    config: Config,
    cycle: PollCycle,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;

        let site = Arc::new(MvdisClient::new(&config.mvdis_base_url, config.http_timeout)?);
        let solver = Arc::new(TwoCaptchaClient::new(&config).map_err(PollError::from)?);
        let session = QuerySession::new(site, solver, config.station.clone());
        let controller = RetryController::new(Arc::new(session), config.max_attempts);

        let store = Arc::new(JsonFileStore::new(&config.state_file));
        let sink = NtfyClient::from_config(&config)?
            .map(|client| Arc::new(client) as Arc<dyn NotificationSink>);

        let cycle = PollCycle::new(&config.plate_pattern, controller, store, sink);
        Ok(Self::with_cycle(config, cycle))
    }

    /// 使用自定义流程创建应用
    pub fn with_cycle(config: Config, cycle: PollCycle) -> Self {
        Self { config, cycle }
    }

    /// 运行直到收到退出信号，返回完成的轮数
    pub async fn run(&self, shutdown: CancellationToken) -> u64 {
        log_startup(
            self.cycle.pattern(),
            self.config.check_interval,
            self.config.ntfy_topic.as_deref(),
        );

        let mut ticker = tokio::time::interval(self.config.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let cycle_no = cycles + 1;
            log_cycle_start(cycle_no);

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    warn!("⚠️ 第 {} 轮查询被中断", cycle_no);
                    break;
                }
                result = self.cycle.run() => {
                    cycles = cycle_no;
                    match result {
                        Ok(report) => log_cycle_complete(cycle_no, &report),
                        Err(e) => error!("❌ 第 {} 轮查询失败: {}", cycle_no, e),
                    }
                }
            }
        }

        log_shutdown(cycles);
        cycles
    }
}

/// 等待 Ctrl+C 或 SIGTERM，然后取消 `token`
pub async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("无法监听 Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ConfigError, PersistenceError};
    use crate::models::ResultSet;
    use crate::services::{AttemptOutcome, QueryAttempt, StateStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// 第 N 次查询后取消
    struct CancelAfter {
        calls: AtomicUsize,
        limit: usize,
        token: CancellationToken,
        fail: bool,
    }

    #[async_trait]
    impl QueryAttempt for CancelAfter {
        async fn attempt(&self, _pattern: &str) -> Result<AttemptOutcome, PollError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.limit {
                self.token.cancel();
            }
            if self.fail {
                return Err(PollError::Protocol("token not found".to_string()));
            }
            Ok(AttemptOutcome::Success(ResultSet::new()))
        }
    }

    /// 通知已开始后一直挂起的查询
    struct Hang {
        started: Arc<Notify>,
    }

    #[async_trait]
    impl QueryAttempt for Hang {
        async fn attempt(&self, _pattern: &str) -> Result<AttemptOutcome, PollError> {
            self.started.notify_one();
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct CountingStore {
        saves: AtomicUsize,
    }

    #[async_trait]
    impl StateStore for CountingStore {
        async fn load(&self) -> ResultSet {
            ResultSet::new()
        }

        async fn save(&self, _plates: &ResultSet) -> Result<(), PersistenceError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn app(query: Arc<dyn QueryAttempt>, store: Arc<CountingStore>) -> App {
        let config = Config {
            plate_pattern: "RAA".to_string(),
            check_interval: Duration::from_millis(10),
            ..Config::default()
        };
        let cycle = PollCycle::new("RAA", RetryController::new(query, 3), store, None);
        App::with_cycle(config, cycle)
    }

    #[tokio::test]
    async fn runs_cycles_until_cancelled() {
        let token = CancellationToken::new();
        let query = Arc::new(CancelAfter {
            calls: AtomicUsize::new(0),
            limit: 3,
            token: token.clone(),
            fail: false,
        });

        let cycles = app(query.clone(), Arc::new(CountingStore::default())).run(token).await;
        assert_eq!(cycles, 3);
        assert_eq!(query.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failed_cycles_do_not_stop_the_loop() {
        let token = CancellationToken::new();
        let query = Arc::new(CancelAfter {
            calls: AtomicUsize::new(0),
            limit: 2,
            token: token.clone(),
            fail: true,
        });

        let cycles = app(query.clone(), Arc::new(CountingStore::default())).run(token).await;
        assert_eq!(cycles, 2);
    }

    #[tokio::test]
    async fn already_cancelled_runs_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let query = Arc::new(CancelAfter {
            calls: AtomicUsize::new(0),
            limit: 1,
            token: token.clone(),
            fail: false,
        });

        let cycles = app(query.clone(), Arc::new(CountingStore::default())).run(token).await;
        assert_eq!(cycles, 0);
        assert_eq!(query.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancel_during_cycle_stops_without_saving() {
        let started = Arc::new(Notify::new());
        let store = Arc::new(CountingStore::default());
        let runner = app(
            Arc::new(Hang {
                started: started.clone(),
            }),
            store.clone(),
        );

        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                started.notified().await;
                token.cancel();
            })
        };

        let cycles = tokio::time::timeout(Duration::from_secs(5), runner.run(token))
            .await
            .expect("run should return after cancellation");
        canceller.await.unwrap();

        assert_eq!(cycles, 0);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn initialize_rejects_incomplete_config() {
        let result = App::initialize(Config::default());
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingVar { ref name })) if name == "TWOCAPTCHA_API_KEY"
        ));
    }
}
