use crate::{
    common::encoded_entry,
    error::normal_error,
    request::{Kodo, KodoRequest, Service},
    Error,
};
use hyper::Method;

/// 删除指定文件
///
/// 文件不存在时返回 612 错误
///
/// 具体详情查阅 [七牛官方文档](https://developer.qiniu.com/kodo/1257/delete)
pub struct DelObject {
    req: KodoRequest,
}
impl DelObject {
    pub(super) fn new(kodo: Kodo) -> Self {
        let path = format!("/delete/{}", encoded_entry(kodo.bucket_name(), kodo.object_key()));
        DelObject {
            req: KodoRequest::new(kodo, Method::POST, Service::Rs, path),
        }
    }
    /// 发送请求
    ///
    pub async fn send(self) -> Result<(), Error> {
        //构建http请求
        let response = self.req.send_to_kodo()?.await?;
        //拆解响应消息
        let status_code = response.status();
        match status_code {
            code if code.is_success() => Ok(()),
            _ => Err(normal_error(response).await),
        }
    }
}
