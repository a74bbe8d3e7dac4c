use crate::{common::Region, request::Kodo, KodoBucket};

/// Kodo容器入口，保存访问凭证及传输相关的设置
#[derive(Debug, Clone)]
pub struct KodoClient {
    pub(crate) kodo: Kodo,
}

impl KodoClient {
    /// 初始化一个KodoClient容器，以便后续使用
    ///
    /// - ak ： 七牛AccessKey
    /// - sk ： 七牛SecretKey
    ///
    pub fn new(ak: &str, sk: &str) -> Self {
        KodoClient {
            kodo: Kodo::new(ak, sk),
        }
    }
    /// 禁用https
    pub fn disable_https(mut self) -> Self {
        self.kodo.set_https(false);
        self
    }
    /// 设置存储区域，默认为华东-浙江
    pub fn set_region(mut self, region: Region) -> Self {
        self.kodo.set_region(region);
        self
    }
    /// 初始化KodoBucket
    ///
    /// - bucket ： 存储空间名称
    /// - domain ： 存储空间绑定的下载域名
    pub fn bucket(&self, bucket: &str, domain: &str) -> KodoBucket {
        KodoBucket::new(self.kodo.clone(), bucket, domain)
    }
}
