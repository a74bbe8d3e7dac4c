//! 包括AccessKey、SecretKey和区域信息的基础服务

pub use self::kodo_client::KodoClient;

mod kodo_client;
