use crate::{
    common::{url_encode, FileInfo, ObjectReader},
    object::fetch_reader,
    sign, Error, KodoBucket,
};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;

/// 远端对象存储的能力集合
///
/// `KodoStorage` 只通过这个接口与远端交互，key在传入前已经规范化
#[async_trait]
pub trait RemoteObjectStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        reader: ObjectReader,
        length: u64,
        content_type: &str,
    ) -> Result<(), Error>;
    async fn put_file(&self, key: &str, local_file: &Path, content_type: &str) -> Result<(), Error>;
    /// 请求下载地址
    async fn fetch(&self, url: &str) -> Result<ObjectReader, Error>;
    async fn move_object(&self, src_key: &str, dest_key: &str, force: bool) -> Result<(), Error>;
    async fn copy_object(&self, src_key: &str, dest_key: &str, force: bool) -> Result<(), Error>;
    async fn stat(&self, key: &str) -> Result<FileInfo, Error>;
    async fn delete(&self, key: &str) -> Result<(), Error>;
    /// 公开空间的访问地址
    fn public_url(&self, scheme: &str, domain: &str, key: &str) -> String {
        format!("{}://{}/{}", scheme, domain, url_encode(key))
    }
    /// 在公开地址后追加过期时间（unix时间戳，秒）和下载凭证
    fn private_url(&self, public_url: &str, access_key: &str, secret_key: &str, deadline: i64) -> String {
        sign::private_url(access_key, secret_key, public_url, deadline)
    }
}

#[async_trait]
impl RemoteObjectStore for KodoBucket {
    async fn put(
        &self,
        key: &str,
        reader: ObjectReader,
        length: u64,
        content_type: &str,
    ) -> Result<(), Error> {
        self.object(key)
            .put_object()
            .set_mime(content_type)
            .send_reader(reader, length)
            .await?;
        Ok(())
    }
    async fn put_file(&self, key: &str, local_file: &Path, content_type: &str) -> Result<(), Error> {
        self.object(key)
            .put_object()
            .set_mime(content_type)
            .send_file(local_file)
            .await?;
        Ok(())
    }
    async fn fetch(&self, url: &str) -> Result<ObjectReader, Error> {
        fetch_reader(url).await
    }
    async fn move_object(&self, src_key: &str, dest_key: &str, force: bool) -> Result<(), Error> {
        self.object(src_key)
            .move_object(dest_key)
            .set_force(force)
            .send()
            .await
    }
    async fn copy_object(&self, src_key: &str, dest_key: &str, force: bool) -> Result<(), Error> {
        self.object(src_key)
            .copy_object(dest_key)
            .set_force(force)
            .send()
            .await
    }
    async fn stat(&self, key: &str) -> Result<FileInfo, Error> {
        self.object(key).stat_object().send().await
    }
    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.object(key).del_object().send().await
    }
}

//当前时间的unix时间戳，秒
pub(crate) fn now() -> i64 {
    Utc::now().timestamp()
}
