use crate::{
    common::encoded_entry,
    error::normal_error,
    request::{Kodo, KodoRequest, Service},
    Error,
};
use hyper::Method;

/// 移动文件，可用于重命名
///
/// 默认不覆盖同名文件，目标文件已存在时返回 614 错误
///
/// 具体详情查阅 [七牛官方文档](https://developer.qiniu.com/kodo/1288/move)
pub struct MoveObject {
    kodo: Kodo,
    dest: String,
    force: bool,
}

impl MoveObject {
    pub(super) fn new(kodo: Kodo, dest: impl ToString) -> Self {
        MoveObject {
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
    /// 发送请求
    ///
    pub async fn send(self) -> Result<(), Error> {
        let bucket = self.kodo.bucket_name();
        let path = format!(
            "/move/{}/{}/force/{}",
            encoded_entry(bucket, self.kodo.object_key()),
            encoded_entry(bucket, &self.dest),
            self.force
        );
        let response = KodoRequest::new(self.kodo, Method::POST, Service::Rs, path)
            .send_to_kodo()?
            .await?;
        let status_code = response.status();
        match status_code {
            code if code.is_success() => Ok(()),
            _ => Err(normal_error(response).await),
        }
    }
}
