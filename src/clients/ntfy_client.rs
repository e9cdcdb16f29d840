/// ntfy 推送客户端
///
/// 把新车牌摘要以纯文本推送到指定主题
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::NotifyError;
use crate::models::Plate;
use crate::services::NotificationSink;

/// ntfy 客户端
pub struct NtfyClient {
    client: reqwest::Client,
    base_url: String,
    topic: String,
}

impl NtfyClient {
    /// 按配置创建客户端，未设置主题时返回 None
    pub fn from_config(config: &Config) -> Result<Option<Self>, NotifyError> {
        match config.ntfy_topic.as_deref() {
            Some(topic) => Ok(Some(Self::new(
                &config.ntfy_base_url,
                topic,
                config.http_timeout,
            )?)),
            None => Ok(None),
        }
    }

    pub fn new(base_url: &str, topic: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl NotificationSink for NtfyClient {
    async fn notify(&self, plates: &[Plate], summary: &str) -> Result<(), NotifyError> {
        debug!("推送 {} 个新车牌到 {}", plates.len(), self.topic);

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, self.topic))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(summary.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_summary_to_topic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/plates"))
            .and(header("content-type", "text/plain"))
            .and(body_string("新車牌釋出: AAA-0001"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = NtfyClient::new(&server.uri(), "plates", Duration::from_secs(5)).unwrap();
        client
            .notify(&[Plate::new("AAA-0001")], "新車牌釋出: AAA-0001")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = NtfyClient::new(&server.uri(), "plates", Duration::from_secs(5)).unwrap();
        let err = client
            .notify(&[Plate::new("AAA-0001")], "x")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Status { status: 429 }));
    }

    #[test]
    fn no_topic_means_no_client() {
        let config = Config::default();
        assert!(NtfyClient::from_config(&config).unwrap().is_none());
    }
}
