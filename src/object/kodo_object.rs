use super::{CopyObject, DelObject, GetObject, GetUrl, MoveObject, PutObject, StatObject};
use crate::request::Kodo;

/// Kodo对象，实现了上传、下载、拷贝、移动、删除文件等API
#[derive(Debug, Clone)]
pub struct KodoObject {
    pub(crate) kodo: Kodo,
}

impl KodoObject {
    pub(crate) fn new(mut kodo: Kodo, object: impl ToString) -> Self {
        kodo.set_object(object);
        KodoObject { kodo }
    }
    /// 文件名
    pub fn key(&self) -> &str {
        self.kodo.object_key()
    }
    /// 上传文件
    pub fn put_object(&self) -> PutObject {
        PutObject::new(self.kodo.clone())
    }
    /// 下载文件
    pub fn get_object(&self) -> GetObject {
        GetObject::new(self.kodo.clone())
    }
    /// 查询文件信息
    pub fn stat_object(&self) -> StatObject {
        StatObject::new(self.kodo.clone())
    }
    /// 拷贝文件到同一存储空间的另一个文件名
    pub fn copy_object(&self, dest: impl ToString) -> CopyObject {
        CopyObject::new(self.kodo.clone(), dest)
    }
    /// 移动（重命名）文件
    pub fn move_object(&self, dest: impl ToString) -> MoveObject {
        MoveObject::new(self.kodo.clone(), dest)
    }
    /// 删除文件
    pub fn del_object(&self) -> DelObject {
        DelObject::new(self.kodo.clone())
    }
    /// 获取文件访问url
    pub fn get_url(&self) -> GetUrl {
        GetUrl::new(self.kodo.clone())
    }
}
