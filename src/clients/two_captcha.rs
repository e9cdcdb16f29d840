/// 2Captcha 客户端
///
/// 先上传图片创建任务，再按固定间隔轮询结果
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::Config;
use crate::error::SolverError;
use crate::services::{CaptchaSolver, LengthHint};

const NOT_READY: &str = "CAPCHA_NOT_READY";

/// 2Captcha 接口的统一响应
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: i64,
    request: String,
}

/// 2Captcha 客户端
pub struct TwoCaptchaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    timeout: Duration,
}

impl TwoCaptchaClient {
    /// 按配置创建客户端
    pub fn new(config: &Config) -> Result<Self, SolverError> {
        Self::with_options(
            &config.twocaptcha_base_url,
            &config.twocaptcha_api_key,
            config.http_timeout,
            config.solver_poll_interval,
            config.solver_timeout,
        )
    }

    /// 自定义地址和时间参数
    ///
    /// # 参数
    /// - `request_timeout`: 单个 HTTP 请求的超时
    /// - `poll_interval`: 两次查询结果之间的间隔
    /// - `timeout`: 等待识别结果的总时长
    pub fn with_options(
        base_url: &str,
        api_key: &str,
        request_timeout: Duration,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Self, SolverError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| SolverError::Unreachable(Box::new(e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            poll_interval,
            timeout,
        })
    }

    /// 上传图片，返回任务 ID
    async fn submit_task(&self, image: &[u8], hint: LengthHint) -> Result<String, SolverError> {
        let body = base64::engine::general_purpose::STANDARD.encode(image);
        let min_len = hint.min.to_string();
        let max_len = hint.max.to_string();
        let params = [
            ("key", self.api_key.as_str()),
            ("method", "base64"),
            ("body", body.as_str()),
            ("min_len", min_len.as_str()),
            ("max_len", max_len.as_str()),
            ("json", "1"),
        ];

        let response = self
            .client
            .post(format!("{}/in.php", self.base_url))
            .form(&params)
            .send()
            .await
            .map_err(|e| SolverError::Unreachable(Box::new(e)))?;
        let result = Self::parse(response).await?;

        if result.status != 1 {
            return Err(SolverError::Rejected {
                code: result.request,
            });
        }
        Ok(result.request)
    }

    /// 查询一次任务结果，未完成时返回 None
    async fn fetch_result(&self, task_id: &str) -> Result<Option<String>, SolverError> {
        let response = self
            .client
            .get(format!("{}/res.php", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("action", "get"),
                ("id", task_id),
                ("json", "1"),
            ])
            .send()
            .await
            .map_err(|e| SolverError::Unreachable(Box::new(e)))?;
        let result = Self::parse(response).await?;

        match result.status {
            1 => Ok(Some(result.request)),
            _ if result.request == NOT_READY => Ok(None),
            _ => Err(SolverError::Unsolvable {
                code: result.request,
            }),
        }
    }

    async fn parse(response: reqwest::Response) -> Result<ApiResponse, SolverError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SolverError::BadResponse(format!("HTTP {}", status)));
        }
        let text = response
            .text()
            .await
            .map_err(|e| SolverError::Unreachable(Box::new(e)))?;
        serde_json::from_str(&text).map_err(|_| SolverError::BadResponse(text))
    }
}

#[async_trait]
impl CaptchaSolver for TwoCaptchaClient {
    async fn solve(&self, image: &[u8], hint: LengthHint) -> Result<String, SolverError> {
        let task_id = self.submit_task(image, hint).await?;
        debug!("2Captcha 任务已创建: {}", task_id);

        let started = Instant::now();
        loop {
            sleep(self.poll_interval).await;

            if let Some(answer) = self.fetch_result(&task_id).await? {
                debug!("2Captcha 任务 {} 完成，用时 {:?}", task_id, started.elapsed());
                if answer.trim().is_empty() {
                    return Err(SolverError::BadResponse("空的识别结果".to_string()));
                }
                return Ok(answer);
            }

            if started.elapsed() >= self.timeout {
                return Err(SolverError::Timeout {
                    waited: started.elapsed(),
                });
            }
        }
    }
}
