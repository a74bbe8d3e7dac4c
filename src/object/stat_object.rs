use crate::{
    common::{encoded_entry, FileInfo},
    error::normal_error,
    request::{Kodo, KodoRequest, Service},
    Error,
};
use hyper::{body::to_bytes, Method};

/// 查询文件信息
///
/// 文件不存在时返回 612 错误，可以通过 `Error::is_not_found` 判断
///
/// 具体详情查阅 [七牛官方文档](https://developer.qiniu.com/kodo/1308/stat)
pub struct StatObject {
    req: KodoRequest,
}
impl StatObject {
    pub(super) fn new(kodo: Kodo) -> Self {
        let path = format!("/stat/{}", encoded_entry(kodo.bucket_name(), kodo.object_key()));
        StatObject {
            req: KodoRequest::new(kodo, Method::GET, Service::Rs, path),
        }
    }
    /// 发送请求
    ///
    pub async fn send(self) -> Result<FileInfo, Error> {
        //构建http请求
        let response = self.req.send_to_kodo()?.await?;
        //拆解响应消息
        let status_code = response.status();
        match status_code {
            code if code.is_success() => {
                let response_bytes = to_bytes(response.into_body()).await?;
                serde_json::from_slice::<FileInfo>(&response_bytes)
                    .map_err(|_| Error::KodoInvalidResponse(Some(response_bytes)))
            }
            _ => Err(normal_error(response).await),
        }
    }
}
