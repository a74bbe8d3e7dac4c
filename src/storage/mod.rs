//! 通用存储接口
//!
//! `Storage` 定义了上层业务使用的存储能力，`KodoStorage` 是基于七牛Kodo的实现。
//! 实际与远端交互的部分抽象为 `RemoteObjectStore`，可以替换为其他后端，例如测试时使用的 `MemoryStore`。

pub use self::kodo::{KodoStorage, URL_EXPIRES};
pub use self::memory::MemoryStore;
pub use self::registry::StorageRegistry;
pub use self::remote::RemoteObjectStore;

mod kodo;
mod memory;
mod registry;
mod remote;

use crate::{common::ObjectReader, Error};
use async_trait::async_trait;
use std::{fmt, path::Path};

/// 存储后端类型，用于在 `StorageRegistry` 中按名称查找
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// 七牛Kodo
    Kodo,
    /// 内存存储
    Memory,
}
impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Kodo => f.write_str("kodo"),
            BackendKind::Memory => f.write_str("memory"),
        }
    }
}

/// 存储适配器接口
///
/// 所有的key在使用前都会经过 `normalize_key` 处理，等价的写法指向同一个文件
#[async_trait]
pub trait Storage: Send + Sync {
    /// 上传数据流，length必须与数据流的实际长度一致
    async fn put(
        &self,
        key: &str,
        reader: ObjectReader,
        length: u64,
        content_type: &str,
    ) -> Result<(), Error>;
    /// 上传本地文件，本地文件不可读时返回 `Error::FileNotFound`
    async fn put_file(&self, key: &str, local_file: &Path, content_type: &str) -> Result<(), Error>;
    /// 下载文件，返回的读取流由调用者持有
    async fn get(&self, key: &str) -> Result<ObjectReader, Error>;
    /// 重命名文件
    async fn rename(&self, src_key: &str, dest_key: &str) -> Result<(), Error>;
    /// 拷贝文件
    async fn copy(&self, src_key: &str, dest_key: &str) -> Result<(), Error>;
    /// 判断文件是否存在，文件不存在不视为错误
    async fn exists(&self, key: &str) -> Result<bool, Error>;
    /// 文件大小，文件不存在时返回错误
    async fn size(&self, key: &str) -> Result<u64, Error>;
    async fn delete(&self, key: &str) -> Result<(), Error>;
    /// 文件的访问地址，不发起网络请求
    fn url(&self, key: &str) -> String;
}

/// 规范化文件名
///
/// 反斜杠替换为 `/`，去掉开头的 `/`、多余的 `/` 以及 `.` 路径段
pub fn normalize_key(key: &str) -> String {
    key.split(|c: char| c == '/' || c == '\\')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_leading_and_repeated_separators() {
        assert_eq!(normalize_key("/a/b.txt"), "a/b.txt");
        assert_eq!(normalize_key("a/b.txt"), "a/b.txt");
        assert_eq!(normalize_key("//a///b.txt"), "a/b.txt");
        assert_eq!(normalize_key("./a/./b.txt"), "a/b.txt");
        assert_eq!(normalize_key("\\a\\b.txt"), "a/b.txt");
        assert_eq!(normalize_key("/"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for key in ["/a/b.txt", "a//b/", "./x", "\\\\share\\f", "../up", "中文/名 字.png", ""] {
            let once = normalize_key(key);
            assert_eq!(normalize_key(&once), once, "key: {key:?}");
        }
    }

    #[test]
    fn backend_kind_names() {
        assert_eq!(BackendKind::Kodo.to_string(), "kodo");
        assert_eq!(BackendKind::Memory.to_string(), "memory");
    }
}
