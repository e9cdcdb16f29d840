//! 选号站点 HTTP 客户端 - 基础设施层
//!
//! 持有带 Cookie 的 HTTP 会话，只暴露"取页面、取图片、提交表单"的能力，
//! 不认识令牌、验证码答案和车牌。

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{PollError, QueryStage};
use crate::models::QueryForm;

const QUERY_PATH: &str = "/m3-emv-plate/webpickno/queryPickNo";
const CAPTCHA_PATH: &str = "/m3-emv-plate/captchaImg.jpg";

/// 选号站点的传输能力
#[async_trait]
pub trait PlateSite: Send + Sync {
    /// 获取查询表单页面
    async fn fetch_landing(&self) -> Result<String, PollError>;

    /// 获取验证码图片
    async fn fetch_challenge(&self) -> Result<Vec<u8>, PollError>;

    /// 提交查询表单，返回结果页 HTML
    async fn submit(&self, form: &QueryForm) -> Result<String, PollError>;
}

/// 监理服务网选号客户端
pub struct MvdisClient {
    client: reqwest::Client,
    base_url: String,
}

impl MvdisClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - `base_url`: 站点根地址
    /// - `timeout`: 每个请求的超时
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PollError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36")
            .build()
            .map_err(|e| PollError::network(QueryStage::Landing, e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_text(
        stage: QueryStage,
        response: reqwest::Response,
    ) -> Result<String, PollError> {
        let response = response
            .error_for_status()
            .map_err(|e| PollError::network(stage, e))?;
        response.text().await.map_err(|e| PollError::network(stage, e))
    }
}

#[async_trait]
impl PlateSite for MvdisClient {
    async fn fetch_landing(&self) -> Result<String, PollError> {
        let url = self.url(QUERY_PATH);
        debug!("获取查询页面: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PollError::network(QueryStage::Landing, e))?;
        Self::read_text(QueryStage::Landing, response).await
    }

    async fn fetch_challenge(&self) -> Result<Vec<u8>, PollError> {
        let url = self.url(CAPTCHA_PATH);
        debug!("获取验证码图片: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| PollError::network(QueryStage::Challenge, e))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PollError::network(QueryStage::Challenge, e))?;

        debug!("验证码图片大小: {} 字节", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn submit(&self, form: &QueryForm) -> Result<String, PollError> {
        let url = self.url(QUERY_PATH);
        debug!("提交查询: 号码模式 {}", form.query_no());

        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| PollError::network(QueryStage::Submit, e))?;
        Self::read_text(QueryStage::Submit, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationProfile;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn landing_and_challenge_share_cookies() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "JSESSIONID=abc123; Path=/")
                    .set_body_string("<html>landing</html>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(CAPTCHA_PATH))
            .and(header_exists("cookie"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xd8, 0xff]))
            .expect(1)
            .mount(&server)
            .await;

        let client = MvdisClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        assert_eq!(client.fetch_landing().await.unwrap(), "<html>landing</html>");
        assert_eq!(client.fetch_challenge().await.unwrap(), vec![0xff, 0xd8, 0xff]);
    }

    #[tokio::test]
    async fn submit_posts_form_encoded_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .and(body_string_contains("method=qryPickNo"))
            .and(body_string_contains("validateStr=AB12"))
            .and(body_string_contains("queryNo=RAA"))
            .and(body_string_contains("CSRFToken=tok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>result</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = MvdisClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let form = QueryForm::new(&StationProfile::default(), "RAA", "ab12", "tok").unwrap();
        assert_eq!(client.submit(&form).await.unwrap(), "<html>result</html>");
    }

    #[tokio::test]
    async fn slow_response_times_out_as_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = MvdisClient::new(server.uri(), Duration::from_millis(50)).unwrap();
        let err = client.fetch_landing().await.unwrap_err();
        assert!(matches!(
            err,
            PollError::Network {
                stage: QueryStage::Landing,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn server_error_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CAPTCHA_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = MvdisClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_challenge().await.unwrap_err();
        assert!(matches!(
            err,
            PollError::Network {
                stage: QueryStage::Challenge,
                ..
            }
        ));
    }
}
