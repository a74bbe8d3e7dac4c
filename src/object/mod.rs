//! 对象是 Kodo 存储数据的基本单元，由存储空间内唯一的文件名（Key）来标识。

pub use self::copy_object::CopyObject;
pub use self::del_object::DelObject;
pub use self::get_object::GetObject;
pub use self::get_url::GetUrl;
pub use self::move_object::MoveObject;
#[doc(hidden)]
pub use self::kodo_object::KodoObject;
pub use self::put_object::PutObject;
pub use self::stat_object::StatObject;

pub(crate) use self::get_object::fetch_reader;

mod copy_object;
mod del_object;
mod get_object;
mod get_url;
mod kodo_object;
mod move_object;
mod put_object;
mod stat_object;
