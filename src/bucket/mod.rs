//! 存储空间是用于存储文件（Object）的容器，所有的文件都必须隶属于某个存储空间。

#[doc(hidden)]
pub use self::kodo_bucket::KodoBucket;
pub use self::put_policy::PutPolicy;

mod kodo_bucket;
mod put_policy;
