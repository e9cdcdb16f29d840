//! 上次结果存储 - 业务能力层
//!
//! 只负责读写"上一轮看到的车牌集合"，不关心对比和通知

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::models::{Plate, ResultSet};

/// 结果集的持久化
#[async_trait]
pub trait StateStore: Send + Sync {
    /// 读取上一轮结果，任何读取失败都视为空集合
    async fn load(&self) -> ResultSet;

    /// 覆盖保存本轮结果
    async fn save(&self, plates: &ResultSet) -> Result<(), PersistenceError>;
}

/// JSON 文件存储
///
/// 文件内容为 `[{"number": "..."}]`，`null` 视为空集合。
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Write {
            path: self.path.clone(),
            source,
        }
    }

    /// 先写临时文件再替换，保证文件要么是旧内容要么是完整的新内容
    async fn replace_with(&self, temp_path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(temp_path, &self.path).await
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> ResultSet {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("状态文件不存在: {}", self.path.display());
                return ResultSet::new();
            }
            Err(e) => {
                warn!("无法读取状态文件 {}: {}", self.path.display(), e);
                return ResultSet::new();
            }
        };

        match serde_json::from_slice::<Option<Vec<Plate>>>(&content) {
            Ok(plates) => plates.unwrap_or_default().into_iter().collect(),
            Err(e) => {
                warn!("状态文件格式错误 {}: {}", self.path.display(), e);
                ResultSet::new()
            }
        }
    }

    async fn save(&self, plates: &ResultSet) -> Result<(), PersistenceError> {
        let content = serde_json::to_vec(plates)?;
        let temp_path = self.temp_path();

        if let Err(e) = self.replace_with(&temp_path, &content).await {
            // 任何一步失败都不留下临时文件
            let _ = fs::remove_file(&temp_path).await;
            return Err(self.write_error(e));
        }

        debug!("已保存 {} 个车牌到 {}", plates.len(), self.path.display());
        Ok(())
    }
}
