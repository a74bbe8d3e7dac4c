use super::PutPolicy;
use crate::{request::Kodo, KodoObject};

/// Kodo存储空间，绑定了空间名称和下载域名
#[derive(Debug, Clone)]
pub struct KodoBucket {
    pub(crate) kodo: Kodo,
}

impl KodoBucket {
    pub(crate) fn new(mut kodo: Kodo, bucket: impl ToString, domain: impl ToString) -> Self {
        kodo.set_bucket(bucket);
        kodo.set_domain(domain);
        KodoBucket { kodo }
    }
    /// 存储空间名称
    pub fn name(&self) -> &str {
        self.kodo.bucket_name()
    }
    /// 初始化KodoObject
    pub fn object(&self, object: impl ToString) -> KodoObject {
        KodoObject::new(self.kodo.clone(), object)
    }
    /// 生成上传策略，用于签发上传凭证
    pub fn put_policy(&self) -> PutPolicy {
        PutPolicy::new(self.kodo.clone())
    }
}
