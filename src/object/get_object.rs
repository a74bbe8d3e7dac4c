use crate::{
    common::ObjectReader,
    error::normal_error,
    request::{fetch, Kodo},
    Error,
};
use bytes::Bytes;
use futures_util::{Stream, StreamExt, TryStreamExt};
use hyper::{body::to_bytes, Body, Response};
use std::{io, pin::Pin};
use tokio_util::io::StreamReader;

/// 获取文件内容
///
/// 通过存储空间绑定的下载域名下载文件，私有空间需要设置下载凭证的过期时间
///
/// 具体详情查阅 [七牛官方文档](https://developer.qiniu.com/kodo/1202/download-token)
pub struct GetObject {
    kodo: Kodo,
    deadline: Option<i64>,
}
impl GetObject {
    pub(super) fn new(kodo: Kodo) -> Self {
        GetObject {
            kodo,
            deadline: None,
        }
    }
    /// 设置下载凭证的过期时间（unix时间戳，秒），用于私有空间
    pub fn set_deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }
    fn url(&self) -> String {
        match self.deadline {
            Some(deadline) => self.kodo.private_url(deadline),
            None => self.kodo.public_url(),
        }
    }
    /// 下载文件，直接将内容返回
    ///
    /// 如果文件较大，此方法可能占用过多内存，谨慎使用
    pub async fn download_to_buf(self) -> Result<Bytes, Error> {
        let response = fetch_response(&self.url()).await?;
        Ok(to_bytes(response.into_body()).await?)
    }
    /// 下载文件，返回一个数据流
    ///
    /// ```ignore
    /// use futures_util::StreamExt;
    ///
    /// let mut stream = object.get_object().download_to_stream().await?;
    /// while let Some(item) = stream.next().await {
    ///     match item {
    ///         Ok(bytes) => {
    ///             // Do something with bytes...
    ///         }
    ///         Err(e) => eprintln!("Error: {}", e),
    ///     }
    /// }
    /// ```
    pub async fn download_to_stream(
        self,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>, Error> {
        let response = fetch_response(&self.url()).await?;
        let stream = response.into_body().map(|item| match item {
            Ok(bytes) => Ok(bytes),
            Err(e) => Err(Error::from(e)),
        });
        Ok(Box::pin(stream))
    }
    /// 下载文件，返回一个实现了AsyncRead的读取流
    pub async fn download_to_reader(self) -> Result<ObjectReader, Error> {
        fetch_reader(&self.url()).await
    }
}

async fn fetch_response(url: &str) -> Result<Response<Body>, Error> {
    let response = fetch(url)?.await?;
    //拆解响应消息
    let status_code = response.status();
    match status_code {
        code if code.is_success() => Ok(response),
        _ => Err(normal_error(response).await),
    }
}

//请求下载地址，将响应内容包装成读取流
pub(crate) async fn fetch_reader(url: &str) -> Result<ObjectReader, Error> {
    let response = fetch_response(url).await?;
    let stream = response
        .into_body()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
    Ok(Box::pin(StreamReader::new(stream)))
}
