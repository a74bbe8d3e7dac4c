use super::{
    normalize_key, remote::now, BackendKind, RemoteObjectStore, Storage, StorageRegistry,
};
use crate::{
    common::{trim_domain, ObjectReader},
    config::Config,
    Error, KodoClient,
};
use async_trait::async_trait;
use std::{path::Path, sync::Arc};

/// 私有空间下载地址的有效期，单位秒
pub const URL_EXPIRES: i64 = 3600;

/// 基于七牛Kodo的存储适配器
///
/// ```ignore
/// let storage = KodoStorage::new(Config::from_env()?)?;
/// storage.put_file("/avatar/1.png", Path::new("1.png"), "image/png").await?;
/// let url = storage.url("avatar/1.png");
/// ```
#[derive(Clone)]
pub struct KodoStorage {
    config: Arc<Config>,
    remote: Arc<dyn RemoteObjectStore>,
}

impl KodoStorage {
    /// 根据配置创建适配器
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let mut client = KodoClient::new(&config.access_key, &config.secret_key)
            .set_region(config.effective_region());
        if !config.is_ssl {
            client = client.disable_https();
        }
        let bucket = client.bucket(&config.bucket, &config.domain);
        tracing::debug!(bucket = %config.bucket, region = %config.effective_region(), "kodo storage created");
        Ok(Self::with_remote(config, Arc::new(bucket)))
    }
    /// 使用指定的远端创建适配器
    ///
    /// 访问地址的协议、域名以及私有空间的下载凭证仍然由 `config` 决定
    pub fn with_remote(config: Config, remote: Arc<dyn RemoteObjectStore>) -> Self {
        KodoStorage {
            config: Arc::new(config),
            remote,
        }
    }
    /// 创建适配器并注册到 `registry`
    ///
    /// 已经注册过时直接返回已有的实例，并发调用时也只会创建一次
    pub async fn init(config: Config, registry: &StorageRegistry) -> Result<Arc<dyn Storage>, Error> {
        registry
            .get_or_init(BackendKind::Kodo, move || {
                Ok(Arc::new(KodoStorage::new(config)?) as Arc<dyn Storage>)
            })
            .await
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    /// 指定过期时间的私有地址
    pub fn url_with_deadline(&self, key: &str, deadline: i64) -> String {
        self.remote.private_url(
            &self.public_url(key),
            &self.config.access_key,
            &self.config.secret_key,
            deadline,
        )
    }
    fn public_url(&self, key: &str) -> String {
        let scheme = if self.config.is_ssl { "https" } else { "http" };
        self.remote
            .public_url(scheme, trim_domain(&self.config.domain), &normalize_key(key))
    }
}

#[async_trait]
impl Storage for KodoStorage {
    async fn put(
        &self,
        key: &str,
        reader: ObjectReader,
        length: u64,
        content_type: &str,
    ) -> Result<(), Error> {
        let key = normalize_key(key);
        tracing::debug!(%key, length, "put");
        self.remote.put(&key, reader, length, content_type).await
    }

    async fn put_file(&self, key: &str, local_file: &Path, content_type: &str) -> Result<(), Error> {
        let key = normalize_key(key);
        tracing::debug!(%key, file = %local_file.display(), "put file");
        self.remote.put_file(&key, local_file, content_type).await
    }

    async fn get(&self, key: &str) -> Result<ObjectReader, Error> {
        let url = self.url(key);
        self.remote.fetch(&url).await
    }

    async fn rename(&self, src_key: &str, dest_key: &str) -> Result<(), Error> {
        let src_key = normalize_key(src_key);
        let dest_key = normalize_key(dest_key);
        tracing::debug!(%src_key, %dest_key, "rename");
        self.remote
            .move_object(&src_key, &dest_key, self.config.overwrite)
            .await
    }

    async fn copy(&self, src_key: &str, dest_key: &str) -> Result<(), Error> {
        let src_key = normalize_key(src_key);
        let dest_key = normalize_key(dest_key);
        tracing::debug!(%src_key, %dest_key, "copy");
        self.remote
            .copy_object(&src_key, &dest_key, self.config.overwrite)
            .await
    }

    async fn exists(&self, key: &str) -> Result<bool, Error> {
        let key = normalize_key(key);
        match self.remote.stat(&key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn size(&self, key: &str) -> Result<u64, Error> {
        let key = normalize_key(key);
        Ok(self.remote.stat(&key).await?.fsize)
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let key = normalize_key(key);
        tracing::debug!(%key, "delete");
        self.remote.delete(&key).await
    }

    fn url(&self, key: &str) -> String {
        if self.config.is_private {
            self.url_with_deadline(key, now() + URL_EXPIRES)
        } else {
            self.public_url(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use base64::{engine::general_purpose, Engine};
    use ring::hmac;
    use tokio::io::AsyncReadExt;

    fn memory_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new("cdn.example.com").set_credentials("ak", "sk"))
    }

    fn storage(is_private: bool) -> KodoStorage {
        let mut config = Config::new("ak", "sk", "photos", "cdn.example.com");
        config.is_private = is_private;
        KodoStorage::with_remote(config, memory_store())
    }

    async fn put_text(storage: &KodoStorage, key: &str, text: &'static str) {
        storage
            .put(key, Box::pin(text.as_bytes()), text.len() as u64, "text/plain")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn put_then_size_with_equivalent_key() {
        let storage = storage(false);
        put_text(&storage, "/a/b.txt", "hello").await;
        assert_eq!(storage.size("a/b.txt").await.unwrap(), 5);
        assert!(storage.exists("//a/b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn get_reads_back_through_url() {
        for is_private in [false, true] {
            let storage = storage(is_private);
            put_text(&storage, "/docs/readme.md", "# readme").await;
            let mut reader = storage.get("docs/readme.md").await.unwrap();
            let mut content = String::new();
            reader.read_to_string(&mut content).await.unwrap();
            assert_eq!(content, "# readme");
        }
    }

    #[tokio::test]
    async fn exists_maps_not_found_to_false() {
        let storage = storage(false);
        assert!(!storage.exists("missing.txt").await.unwrap());
        assert!(storage.size("missing.txt").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn rename_and_copy() {
        let storage = storage(false);
        put_text(&storage, "a.txt", "abc").await;
        storage.copy("/a.txt", "b.txt").await.unwrap();
        assert!(storage.exists("a.txt").await.unwrap());
        assert!(storage.exists("b.txt").await.unwrap());
        assert_eq!(storage.size("a.txt").await.unwrap(), storage.size("b.txt").await.unwrap());

        storage.rename("a.txt", "/c.txt").await.unwrap();
        assert!(!storage.exists("a.txt").await.unwrap());
        assert!(storage.exists("c.txt").await.unwrap());

        // 默认覆盖同名文件
        storage.rename("b.txt", "c.txt").await.unwrap();
        assert!(!storage.exists("b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn overwrite_can_be_disabled() {
        let mut config = Config::new("ak", "sk", "photos", "cdn.example.com");
        config.overwrite = false;
        let storage = KodoStorage::with_remote(config, memory_store());
        put_text(&storage, "a.txt", "a").await;
        put_text(&storage, "b.txt", "b").await;
        let err = storage.copy("a.txt", "b.txt").await.unwrap_err();
        assert!(err.is_file_exists());
    }

    #[tokio::test]
    async fn delete_removes_object() {
        let storage = storage(false);
        put_text(&storage, "gone.txt", "x").await;
        storage.delete("/gone.txt").await.unwrap();
        assert!(!storage.exists("gone.txt").await.unwrap());
        assert!(storage.delete("gone.txt").await.unwrap_err().is_not_found());
    }

    #[test]
    fn public_url_is_stable() {
        let storage = storage(false);
        assert_eq!(storage.url("/a/b.txt"), "http://cdn.example.com/a/b.txt");
        assert_eq!(storage.url("a/b.txt"), storage.url("/a/b.txt"));
    }

    #[test]
    fn private_url_expires_in_an_hour() {
        let storage = storage(true);
        let before = now();
        let url = storage.url("/a/b.txt");
        let after = now();
        let deadline: i64 = url
            .split("?e=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap()
            .parse()
            .unwrap();
        assert!(deadline >= before + URL_EXPIRES && deadline <= after + URL_EXPIRES);
        assert!(url.starts_with("http://cdn.example.com/a/b.txt?e="));
        assert_eq!(
            storage.url_with_deadline("a/b.txt", 42),
            storage.url_with_deadline("/a/b.txt", 42)
        );
    }

    #[test]
    fn ssl_urls_use_https_and_config_credentials() {
        let mut config = Config::new("ak", "sk", "photos", "cdn.example.com");
        config.is_ssl = true;
        let public = KodoStorage::with_remote(config.clone(), memory_store());
        assert_eq!(public.url("/a/b.txt"), "https://cdn.example.com/a/b.txt");

        config.is_private = true;
        //远端使用其他凭证时，地址仍然按配置签发
        let remote = Arc::new(MemoryStore::new("cdn.example.com").set_credentials("other", "other"));
        let private = KodoStorage::with_remote(config, remote);
        let url = private.url("a/b.txt");
        assert!(url.starts_with("https://cdn.example.com/a/b.txt?e="));
        let (signed, token) = url.split_once("&token=").unwrap();
        let (ak, encoded_sign) = token.split_once(':').unwrap();
        assert_eq!(ak, "ak");
        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, b"sk");
        let raw = general_purpose::URL_SAFE.decode(encoded_sign).unwrap();
        assert!(hmac::verify(&key, signed.as_bytes(), &raw).is_ok());
    }
}
