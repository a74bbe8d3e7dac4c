use super::{BackendKind, Storage};
use crate::Error;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

pub type StorageBox = Arc<dyn Storage>;

/// 存储后端注册表
///
/// 按 `BackendKind` 保存已创建的存储实例，由调用者创建并传给需要按名称查找后端的代码
#[derive(Clone, Default)]
pub struct StorageRegistry {
    backends: Arc<RwLock<HashMap<BackendKind, StorageBox>>>,
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册存储实例，返回被替换的旧实例
    pub async fn register(&self, kind: BackendKind, storage: StorageBox) -> Option<StorageBox> {
        tracing::info!("Storage backend registered: {}", kind);
        self.backends.write().await.insert(kind, storage)
    }

    pub async fn get(&self, kind: &BackendKind) -> Option<StorageBox> {
        self.backends.read().await.get(kind).cloned()
    }

    /// 获取已注册的实例，未注册时调用 `init` 创建并注册
    ///
    /// 创建期间持有写锁，并发调用只会创建一次；`init` 失败时不注册，下次调用会重新创建
    pub async fn get_or_init<F>(&self, kind: BackendKind, init: F) -> Result<StorageBox, Error>
    where
        F: FnOnce() -> Result<StorageBox, Error>,
    {
        if let Some(storage) = self.get(&kind).await {
            return Ok(storage);
        }
        let mut backends = self.backends.write().await;
        if let Some(storage) = backends.get(&kind) {
            return Ok(storage.clone());
        }
        match init() {
            Ok(storage) => {
                tracing::info!("Storage backend initialized: {}", kind);
                backends.insert(kind, storage.clone());
                Ok(storage)
            }
            Err(e) => {
                tracing::error!("Storage backend initialization failed: {} - {}", kind, e);
                Err(e)
            }
        }
    }

    pub async fn remove(&self, kind: &BackendKind) -> Option<StorageBox> {
        let removed = self.backends.write().await.remove(kind);
        if removed.is_some() {
            tracing::info!("Storage backend removed: {}", kind);
        }
        removed
    }

    pub async fn kinds(&self) -> Vec<BackendKind> {
        self.backends.read().await.keys().cloned().collect()
    }
}
