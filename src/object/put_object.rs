use crate::{
    bucket::PutPolicy,
    common::PutRet,
    error::normal_error,
    request::{Kodo, KodoRequest, Service},
    Error,
};
use bytes::Bytes;
use chrono::Utc;
use futures_util::{stream, StreamExt};
use hyper::{body::to_bytes, header, Body, Method};
use std::{io::Cursor, path::Path};
use tokio::{
    fs::File,
    io::{AsyncRead, AsyncReadExt},
};
use tokio_util::io::ReaderStream;

const DEFAULT_MIME: &str = "application/octet-stream";

/// 上传文件
///
/// 通过表单上传的方式将文件上传到Kodo，单次上传的文件不能超过 1GB
///
/// 默认情况下，如果已存在同名文件，新上传的文件将覆盖原有文件
///
/// 具体详情查阅 [七牛官方文档](https://developer.qiniu.com/kodo/1312/upload)
pub struct PutObject {
    kodo: Kodo,
    mime: Option<String>,
    insert_only: bool,
}

impl PutObject {
    pub(super) fn new(kodo: Kodo) -> Self {
        PutObject {
            kodo,
            mime: None,
            insert_only: false,
        }
    }
    /// 设置文件的mime类型
    ///
    /// 未设置时，会根据文件内容和扩展名自动判断
    pub fn set_mime(mut self, mime: impl ToString) -> Self {
        let mime = mime.to_string();
        self.mime = (!mime.is_empty()).then_some(mime);
        self
    }
    /// 仅允许新增文件，已存在同名文件时返回 614 错误
    pub fn set_insert_only(mut self, insert_only: bool) -> Self {
        self.insert_only = insert_only;
        self
    }
    /// 将磁盘中的文件上传到Kodo
    pub async fn send_file(self, file: impl AsRef<Path>) -> Result<PutRet, Error> {
        let path = file.as_ref();
        //打开文件
        let file = File::open(path)
            .await
            .map_err(|_| Error::FileNotFound(path.to_path_buf()))?;
        //读取文件大小
        let file_size = file.metadata().await?.len();
        //生成文件类型
        let mime = match &self.mime {
            Some(mime) => mime.clone(),
            None => infer::get_from_path(path)
                .ok()
                .flatten()
                .map(|val| val.mime_type().to_owned())
                .or_else(|| mime_guess::from_path(path).first_raw().map(|v| v.to_owned()))
                .unwrap_or_else(|| DEFAULT_MIME.to_owned()),
        };
        self.set_mime(mime).send_reader(file, file_size).await
    }
    /// 将内存中的数据上传到Kodo
    pub async fn send_content(self, content: impl Into<Bytes>) -> Result<PutRet, Error> {
        let content: Bytes = content.into();
        //生成文件类型
        let mime = self.mime.clone().unwrap_or_else(|| {
            infer::get(&content)
                .map(|val| val.mime_type())
                .unwrap_or(DEFAULT_MIME)
                .to_owned()
        });
        let content_size = content.len() as u64;
        self.set_mime(mime)
            .send_reader(Cursor::new(content), content_size)
            .await
    }
    /// 将数据流上传到Kodo
    ///
    /// length必须与数据流的实际长度一致，数据流中超出length的部分不会被读取
    pub async fn send_reader<R>(self, reader: R, length: u64) -> Result<PutRet, Error>
    where
        R: AsyncRead + Send + 'static,
    {
        let key = self.kodo.object_key().to_owned();
        let mime = self.mime.unwrap_or_else(|| DEFAULT_MIME.to_owned());
        //生成上传凭证
        let mut policy = PutPolicy::new(self.kodo.clone());
        if self.insert_only {
            policy = policy.set_key(&key).set_insert_only(true);
        }
        let token = policy.build()?;
        //构造multipart表单
        let now = Utc::now();
        let boundary = format!(
            "KodoFormBoundary{:x}{:x}",
            now.timestamp(),
            now.timestamp_subsec_nanos()
        );
        let (head, tail) = form_parts(&boundary, &token, &key, &mime);
        let content_length = head.len() as u64 + length + tail.len() as u64;
        let body = stream::once(async move { Ok::<Bytes, std::io::Error>(head) })
            .chain(ReaderStream::new(reader.take(length)))
            .chain(stream::once(async move { Ok(tail) }));
        //构建http请求
        let mut req = KodoRequest::new(self.kodo, Method::POST, Service::Up, "/");
        req.insert_header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        );
        req.insert_header(header::CONTENT_LENGTH, content_length);
        req.set_body(Body::wrap_stream(body));
        tracing::debug!(%key, %mime, length, "uploading object");
        let response = req.send_to_kodo()?.await?;
        //拆解响应消息
        let status_code = response.status();
        match status_code {
            code if code.is_success() => {
                let response_bytes = to_bytes(response.into_body()).await?;
                serde_json::from_slice::<PutRet>(&response_bytes)
                    .map_err(|_| Error::KodoInvalidResponse(Some(response_bytes)))
            }
            _ => Err(normal_error(response).await),
        }
    }
}

//生成文件内容之前和之后的表单数据
fn form_parts(boundary: &str, token: &str, key: &str, mime: &str) -> (Bytes, Bytes) {
    let filename = key
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("file")
        .replace('"', "%22");
    let mut head = String::new();
    for (name, value) in [("token", token), ("key", key)] {
        head.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary, name, value
        ));
    }
    head.push_str(&format!(
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        boundary, filename, mime
    ));
    let tail = format!("\r\n--{}--\r\n", boundary);
    (Bytes::from(head), Bytes::from(tail))
}
