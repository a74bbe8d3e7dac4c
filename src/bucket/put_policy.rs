use crate::{request::Kodo, Error};
use chrono::Utc;
use serde_derive::Serialize;

/// 上传凭证默认有效期，单位秒
pub const DEFAULT_UPLOAD_EXPIRES: i64 = 3600;

#[derive(Debug, Serialize)]
struct Policy<'a> {
    scope: String,
    deadline: i64,
    #[serde(rename = "insertOnly", skip_serializing_if = "Option::is_none")]
    insert_only: Option<u8>,
    #[serde(rename = "fsizeLimit", skip_serializing_if = "Option::is_none")]
    fsize_limit: Option<u64>,
    #[serde(rename = "mimeLimit", skip_serializing_if = "Option::is_none")]
    mime_limit: Option<&'a str>,
}

/// 上传策略
///
/// 上传策略是资源上传时附带的一组配置设定，通过它指定上传的目标空间、有效期以及文件的限制条件
///
/// 具体详情查阅 [七牛官方文档](https://developer.qiniu.com/kodo/1206/put-policy)
#[derive(Debug, Clone)]
pub struct PutPolicy {
    kodo: Kodo,
    key: Option<String>,
    expires: i64,
    insert_only: bool,
    fsize_limit: Option<u64>,
    mime_limit: Option<String>,
}

impl PutPolicy {
    pub(crate) fn new(kodo: Kodo) -> Self {
        PutPolicy {
            kodo,
            key: None,
            expires: DEFAULT_UPLOAD_EXPIRES,
            insert_only: false,
            fsize_limit: None,
            mime_limit: None,
        }
    }
    /// 限定只能上传指定文件名
    pub fn set_key(mut self, key: impl ToString) -> Self {
        self.key = Some(key.to_string());
        self
    }
    /// 设置凭证有效期，单位秒
    pub fn set_expires(mut self, expires: i64) -> Self {
        self.expires = expires;
        self
    }
    /// 仅允许新增文件，不允许覆盖同名文件
    pub fn set_insert_only(mut self, insert_only: bool) -> Self {
        self.insert_only = insert_only;
        self
    }
    /// 限制上传文件的大小，单位字节
    pub fn set_fsize_limit(mut self, fsize_limit: u64) -> Self {
        self.fsize_limit = Some(fsize_limit);
        self
    }
    /// 限制上传文件的mime类型，多个类型以 ; 分隔，例如 image/*;text/plain
    pub fn set_mime_limit(mut self, mime_limit: impl ToString) -> Self {
        self.mime_limit = Some(mime_limit.to_string());
        self
    }
    /// 生成上传凭证
    pub fn build(self) -> Result<String, Error> {
        let scope = match &self.key {
            Some(key) => format!("{}:{}", self.kodo.bucket_name(), key),
            None => self.kodo.bucket_name().to_owned(),
        };
        let policy = Policy {
            scope,
            deadline: Utc::now().timestamp() + self.expires,
            insert_only: self.insert_only.then_some(1),
            fsize_limit: self.fsize_limit,
            mime_limit: self.mime_limit.as_deref(),
        };
        let policy = serde_json::to_vec(&policy)?;
        Ok(crate::sign::upload_token(&self.kodo.ak, &self.kodo.sk, &policy))
    }
}
