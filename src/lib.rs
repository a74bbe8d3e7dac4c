//!
//! 七牛云对象存储（Kodo）的存储适配器。
//!
//! 分为两部分：
//!
//! - `storage`：通用的存储接口 `Storage` 以及基于Kodo的实现 `KodoStorage`，上层业务只依赖这一部分；
//! - KodoClient - KodoBucket - KodoObject 三层结构的Kodo客户端，仅实现了适配器需要的少量API，设计遵循极简、实用原则。
//!
//!
//! ##### 初始化
//! ```ignore
//! let config = Config::from_toml_file("kodo.toml")?;
//! let registry = StorageRegistry::new();
//! let storage = KodoStorage::init(config, &registry).await?;
//! ```
//!
//! ##### 上传文件
//! ```ignore
//! storage.put_file("/avatar/1.png", Path::new("1.png"), "image/png").await?;
//! ```
//!
//! ##### 获取文件访问地址
//! ```ignore
//! // 私有空间生成的地址一小时内有效
//! let url = storage.url("avatar/1.png");
//! ```
//!
//! ##### 直接使用客户端
//! ```ignore
//! let client = KodoClient::new("Your AccessKey", "Your SecretKey");
//! let object = client.bucket("photos", "cdn.example.com").object("rust.png");
//! let info = object.stat_object().send().await?;
//! ```

#[doc(inline)]
pub use crate::bucket::KodoBucket;
#[doc(inline)]
pub use crate::client::KodoClient;
#[doc(inline)]
pub use crate::config::Config;
#[doc(inline)]
pub use crate::error::Error;
#[doc(inline)]
pub use crate::object::KodoObject;
#[doc(inline)]
pub use crate::storage::{KodoStorage, Storage, StorageRegistry};

pub mod bucket;
pub mod client;
pub mod common;
pub mod config;
mod error;
pub mod object;
mod request;
mod sign;
pub mod storage;
