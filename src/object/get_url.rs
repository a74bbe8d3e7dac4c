use crate::request::Kodo;

/// 获取文件的url
///
/// 私有空间的文件需要设置过期时间，生成的url中带有下载凭证，过期后无法访问
///
/// 具体详情查阅 [七牛官方文档](https://developer.qiniu.com/kodo/1202/download-token)
pub struct GetUrl {
    kodo: Kodo,
    deadline: Option<i64>,
}
impl GetUrl {
    pub(super) fn new(kodo: Kodo) -> Self {
        GetUrl {
            kodo,
            deadline: None,
        }
    }
    /// 设置过期时间（unix时间戳，秒）
    ///
    pub fn set_deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }
    /// 生成url
    ///
    pub fn build(self) -> String {
        match self.deadline {
            Some(deadline) => self.kodo.private_url(deadline),
            None => self.kodo.public_url(),
        }
    }
}
