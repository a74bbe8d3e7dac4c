use super::{remote::now, RemoteObjectStore};
use crate::{
    common::{urlsafe_base64, FileInfo, ObjectReader},
    error::{STATUS_FILE_EXISTS, STATUS_NO_SUCH_FILE},
    sign, Error,
};
use async_trait::async_trait;
use bytes::Bytes;
use hyper::StatusCode;
use percent_encoding::percent_decode_str;
use ring::digest;
use std::{
    collections::HashMap,
    io::{Cursor, ErrorKind},
    path::Path,
};
use tokio::{fs, io::AsyncReadExt, sync::RwLock};

//Kodo计算etag时的分块大小
const BLOCK_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    mime_type: String,
    put_time: i64,
}

/// 保存在内存中的对象存储
///
/// 行为与Kodo保持一致：文件不存在返回 612，不覆盖时目标已存在返回 614，私有地址会校验凭证和过期时间
#[derive(Debug)]
pub struct MemoryStore {
    domain: String,
    ak: String,
    sk: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new(domain: impl ToString) -> Self {
        MemoryStore {
            domain: domain.to_string(),
            ak: "memory".to_owned(),
            sk: "memory".to_owned(),
            objects: RwLock::new(HashMap::new()),
        }
    }
    /// 设置校验私有地址使用的凭证
    pub fn set_credentials(mut self, ak: impl ToString, sk: impl ToString) -> Self {
        self.ak = ak.to_string();
        self.sk = sk.to_string();
        self
    }
    /// 当前保存的文件名，按字典序排列
    pub async fn keys(&self) -> Vec<String> {
        let mut keys = self.objects.read().await.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
    async fn insert(&self, key: &str, data: Vec<u8>, mime_type: String) {
        let object = StoredObject {
            data: Bytes::from(data),
            mime_type,
            put_time: now() * 10_000_000,
        };
        self.objects.write().await.insert(key.to_owned(), object);
    }
    //从下载地址中解析出文件名，并校验私有地址的凭证
    fn resolve(&self, url: &str) -> Result<String, Error> {
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .unwrap_or(url);
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let key = path
            .strip_prefix(self.domain.as_str())
            .and_then(|path| path.strip_prefix('/'))
            .ok_or_else(|| Error::KodoError(StatusCode::NOT_FOUND, "unknown domain".to_owned()))?;
        if let Some((signed, token)) = url.split_once("&token=") {
            let deadline = query
                .split('&')
                .find_map(|pair| pair.strip_prefix("e="))
                .and_then(|e| e.parse::<i64>().ok())
                .ok_or_else(|| unauthorized("bad token"))?;
            let expected = format!("{}:{}", self.ak, sign::sign(&self.sk, signed.as_bytes()));
            if token != expected {
                return Err(unauthorized("bad token"));
            }
            if deadline < now() {
                return Err(unauthorized("token out of date"));
            }
        }
        Ok(percent_decode_str(key).decode_utf8_lossy().into_owned())
    }
}

fn kodo_status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::NOT_FOUND)
}

fn no_such_file() -> Error {
    Error::KodoError(
        kodo_status(STATUS_NO_SUCH_FILE),
        "no such file or directory".to_owned(),
    )
}

fn file_exists() -> Error {
    Error::KodoError(kodo_status(STATUS_FILE_EXISTS), "file exists".to_owned())
}

fn unauthorized(message: &str) -> Error {
    Error::KodoError(StatusCode::UNAUTHORIZED, message.to_owned())
}

//Kodo的etag算法：小于等于4MB时为 0x16 + sha1(data)，否则为 0x96 + sha1(各分块sha1的拼接)
fn etag(data: &[u8]) -> String {
    let mut raw = Vec::with_capacity(21);
    if data.len() <= BLOCK_SIZE {
        raw.push(0x16);
        raw.extend_from_slice(digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, data).as_ref());
    } else {
        let mut blocks = Vec::with_capacity(data.len() / BLOCK_SIZE * 20 + 20);
        for block in data.chunks(BLOCK_SIZE) {
            blocks.extend_from_slice(
                digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, block).as_ref(),
            );
        }
        raw.push(0x96);
        raw.extend_from_slice(digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &blocks).as_ref());
    }
    urlsafe_base64(raw)
}

#[async_trait]
impl RemoteObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        reader: ObjectReader,
        length: u64,
        content_type: &str,
    ) -> Result<(), Error> {
        let mut data = Vec::with_capacity(length.min(BLOCK_SIZE as u64) as usize);
        reader.take(length).read_to_end(&mut data).await?;
        if data.len() as u64 != length {
            return Err(Error::IoError(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("expected {} bytes, got {}", length, data.len()),
            )));
        }
        self.insert(key, data, content_type.to_owned()).await;
        Ok(())
    }
    async fn put_file(&self, key: &str, local_file: &Path, content_type: &str) -> Result<(), Error> {
        let data = fs::read(local_file)
            .await
            .map_err(|_| Error::FileNotFound(local_file.to_path_buf()))?;
        let mime_type = if content_type.is_empty() {
            mime_guess::from_path(local_file)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_owned()
        } else {
            content_type.to_owned()
        };
        self.insert(key, data, mime_type).await;
        Ok(())
    }
    async fn fetch(&self, url: &str) -> Result<ObjectReader, Error> {
        let key = self.resolve(url)?;
        let objects = self.objects.read().await;
        let object = objects
            .get(&key)
            .ok_or_else(|| Error::KodoError(StatusCode::NOT_FOUND, "Document not found".to_owned()))?;
        Ok(Box::pin(Cursor::new(object.data.clone())))
    }
    async fn move_object(&self, src_key: &str, dest_key: &str, force: bool) -> Result<(), Error> {
        let mut objects = self.objects.write().await;
        if !objects.contains_key(src_key) {
            return Err(no_such_file());
        }
        if !force && objects.contains_key(dest_key) {
            return Err(file_exists());
        }
        if let Some(object) = objects.remove(src_key) {
            objects.insert(dest_key.to_owned(), object);
        }
        Ok(())
    }
    async fn copy_object(&self, src_key: &str, dest_key: &str, force: bool) -> Result<(), Error> {
        let mut objects = self.objects.write().await;
        let object = objects.get(src_key).cloned().ok_or_else(no_such_file)?;
        if !force && objects.contains_key(dest_key) {
            return Err(file_exists());
        }
        objects.insert(dest_key.to_owned(), object);
        Ok(())
    }
    async fn stat(&self, key: &str) -> Result<FileInfo, Error> {
        let objects = self.objects.read().await;
        let object = objects.get(key).ok_or_else(no_such_file)?;
        Ok(FileInfo {
            fsize: object.data.len() as u64,
            hash: etag(&object.data),
            mime_type: object.mime_type.clone(),
            put_time: object.put_time,
            file_type: 0,
        })
    }
    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.objects
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(no_such_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private_url(ak: &str, sk: &str, key: &str, deadline: i64) -> String {
        let store = MemoryStore::new("cdn.example.com");
        let public_url = store.public_url("http", "cdn.example.com", key);
        store.private_url(&public_url, ak, sk, deadline)
    }

    #[test]
    fn etag_of_empty_and_small_data() {
        // 七牛文档中空文件的etag
        assert_eq!(etag(b""), "Fto5o-5ea0sNMlW_75VgGJCv2AcJ");
        assert!(etag(b"hello").starts_with('F'));
    }

    #[test]
    fn etag_of_large_data_uses_block_prefix() {
        let data = vec![0u8; BLOCK_SIZE + 1];
        assert!(etag(&data).starts_with('l'));
    }

    #[tokio::test]
    async fn private_url_is_checked_on_fetch() {
        let store = MemoryStore::new("cdn.example.com").set_credentials("ak", "sk");
        store.insert("a b.txt", b"x".to_vec(), "text/plain".to_owned()).await;

        let valid = private_url("ak", "sk", "a b.txt", now() + 60);
        assert!(store.fetch(&valid).await.is_ok());

        let expired = private_url("ak", "sk", "a b.txt", now() - 1);
        let err = store.fetch(&expired).await.err().unwrap();
        assert!(matches!(err, Error::KodoError(status, _) if status == StatusCode::UNAUTHORIZED));

        let forged = private_url("ak", "other", "a b.txt", now() + 60);
        assert!(store.fetch(&forged).await.is_err());
    }

    #[tokio::test]
    async fn short_reader_is_rejected() {
        let store = MemoryStore::new("cdn.example.com");
        let result = store.put("a.txt", Box::pin(&b"abc"[..]), 10, "text/plain").await;
        assert!(matches!(result, Err(Error::IoError(_))));
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn huge_length_with_short_reader_is_an_error() {
        let store = MemoryStore::new("cdn.example.com");
        let result = store
            .put("a.txt", Box::pin(&b"abc"[..]), u64::MAX, "text/plain")
            .await;
        assert!(matches!(result, Err(Error::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof));
        assert!(store.keys().await.is_empty());
    }
}
