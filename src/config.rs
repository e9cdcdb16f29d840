use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::StationProfile;
use crate::utils::duration::parse_go_duration;
use crate::workflow::DEFAULT_MAX_ATTEMPTS;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 查询号码模式
    pub plate_pattern: String,
    /// 轮询间隔
    pub check_interval: Duration,
    /// ntfy 主题，为空时不发送通知
    pub ntfy_topic: Option<String>,
    /// 上次结果的状态文件
    pub state_file: PathBuf,
    /// 每个 HTTP 请求的超时
    pub http_timeout: Duration,
    /// 每次轮询的最大尝试次数
    pub max_attempts: usize,
    /// 选号站点地址
    pub mvdis_base_url: String,
    /// 查询表单固定参数
    pub station: StationProfile,
    // --- 2Captcha 配置 ---
    pub twocaptcha_api_key: String,
    pub twocaptcha_base_url: String,
    pub solver_timeout: Duration,
    pub solver_poll_interval: Duration,
    // --- ntfy 配置 ---
    pub ntfy_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plate_pattern: String::new(),
            check_interval: Duration::from_secs(5 * 60),
            ntfy_topic: None,
            state_file: PathBuf::from("last.json"),
            http_timeout: Duration::from_secs(5),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            mvdis_base_url: "https://www.mvdis.gov.tw".to_string(),
            station: StationProfile::default(),
            twocaptcha_api_key: String::new(),
            twocaptcha_base_url: "https://2captcha.com".to_string(),
            solver_timeout: Duration::from_secs(120),
            solver_poll_interval: Duration::from_secs(5),
            ntfy_base_url: "https://ntfy.sh".to_string(),
        }
    }
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    plate_pattern: Option<String>,
    check_interval: Option<String>,
    ntfy_topic: Option<String>,
    state_file: Option<PathBuf>,
    http_timeout_secs: Option<u64>,
    max_attempts: Option<usize>,
    mvdis_base_url: Option<String>,
    twocaptcha_api_key: Option<String>,
    twocaptcha_base_url: Option<String>,
    solver_timeout_secs: Option<u64>,
    solver_poll_interval_secs: Option<u64>,
    ntfy_base_url: Option<String>,
    station: Option<StationProfile>,
}

impl Config {
    /// 加载配置：先读 `PLATE_WATCH_CONFIG` 指向的 TOML 文件（如果有），再用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = env_string("PLATE_WATCH_CONFIG") {
            config.apply_file(Path::new(&path))?;
        }
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::FileParse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(v) = file.plate_pattern {
            self.plate_pattern = v;
        }
        if let Some(v) = file.check_interval {
            self.check_interval = parse_interval("check_interval", &v)?;
        }
        if let Some(v) = file.ntfy_topic {
            self.ntfy_topic = non_empty(v);
        }
        if let Some(v) = file.state_file {
            self.state_file = v;
        }
        if let Some(v) = file.http_timeout_secs {
            self.http_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file.max_attempts {
            self.max_attempts = v;
        }
        if let Some(v) = file.mvdis_base_url {
            self.mvdis_base_url = v;
        }
        if let Some(v) = file.twocaptcha_api_key {
            self.twocaptcha_api_key = v;
        }
        if let Some(v) = file.twocaptcha_base_url {
            self.twocaptcha_base_url = v;
        }
        if let Some(v) = file.solver_timeout_secs {
            self.solver_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file.solver_poll_interval_secs {
            self.solver_poll_interval = Duration::from_secs(v);
        }
        if let Some(v) = file.ntfy_base_url {
            self.ntfy_base_url = v;
        }
        if let Some(v) = file.station {
            self.station = v;
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(v) = get("TWOCAPTCHA_API_KEY") {
            self.twocaptcha_api_key = v;
        }
        if let Some(v) = get("PLATE_PATTERN") {
            self.plate_pattern = v;
        }
        if let Some(v) = get("CHECK_INTERVAL") {
            self.check_interval = parse_interval("CHECK_INTERVAL", &v)?;
        }
        if let Some(v) = get("NTFY_TOPIC") {
            self.ntfy_topic = Some(v);
        }
        if let Some(v) = get("STATE_FILE") {
            self.state_file = PathBuf::from(v);
        }
        if let Some(v) = get("HTTP_TIMEOUT_SECS") {
            self.http_timeout = Duration::from_secs(parse_number("HTTP_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = get("MAX_ATTEMPTS") {
            self.max_attempts = parse_number("MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = get("SOLVER_TIMEOUT_SECS") {
            self.solver_timeout = Duration::from_secs(parse_number("SOLVER_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = get("SOLVER_POLL_INTERVAL_SECS") {
            self.solver_poll_interval =
                Duration::from_secs(parse_number("SOLVER_POLL_INTERVAL_SECS", &v)?);
        }
        if let Some(v) = get("MVDIS_BASE_URL") {
            self.mvdis_base_url = v;
        }
        if let Some(v) = get("TWOCAPTCHA_BASE_URL") {
            self.twocaptcha_base_url = v;
        }
        if let Some(v) = get("NTFY_BASE_URL") {
            self.ntfy_base_url = v;
        }
        Ok(())
    }

    /// 检查必需项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.twocaptcha_api_key.is_empty() {
            return Err(ConfigError::MissingVar {
                name: "TWOCAPTCHA_API_KEY".to_string(),
            });
        }
        if self.plate_pattern.is_empty() {
            return Err(ConfigError::MissingVar {
                name: "PLATE_PATTERN".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_ATTEMPTS".to_string(),
                value: "0".to_string(),
                expected: "正整数".to_string(),
            });
        }
        if self.check_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "CHECK_INTERVAL".to_string(),
                value: "0s".to_string(),
                expected: "大于零的时长".to_string(),
            });
        }
        Ok(())
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_interval(name: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_go_duration(value).ok_or_else(|| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        expected: "时长 (如 5m, 90s, 1h30m)".to_string(),
    })
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        expected: std::any::type_name::<T>().to_string(),
    })
}
