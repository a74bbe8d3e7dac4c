use crate::{
    common::encoded_entry,
    error::normal_error,
    request::{Kodo, KodoRequest, Service},
    Error,
};
use hyper::Method;

/// 拷贝文件
///
/// 默认不覆盖同名文件，目标文件已存在时返回 614 错误
///
/// 具体详情查阅 [七牛官方文档](https://developer.qiniu.com/kodo/1254/copy)
pub struct CopyObject {
    kodo: Kodo,
    dest: String,
    force: bool,
}

impl CopyObject {
    pub(super) fn new(kodo: Kodo, dest: impl ToString) -> Self {
        CopyObject {
            kodo,
            dest: dest.to_string(),
            force: false,
        }
    }
    /// 设置是否覆盖同名文件
    pub fn set_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
    /// 复制文件
    ///
    pub async fn send(self) -> Result<(), Error> {
        let bucket = self.kodo.bucket_name();
        let path = format!(
            "/copy/{}/{}/force/{}",
            encoded_entry(bucket, self.kodo.object_key()),
            encoded_entry(bucket, &self.dest),
            self.force
        );
        //构建http请求
        let response = KodoRequest::new(self.kodo, Method::POST, Service::Rs, path)
            .send_to_kodo()?
            .await?;
        //拆解响应消息
        let status_code = response.status();
        match status_code {
            code if code.is_success() => Ok(()),
            _ => Err(normal_error(response).await),
        }
    }
}
