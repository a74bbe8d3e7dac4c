//! 公共数据定义
//!
//!
use base64::{engine::general_purpose, Engine};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_derive::{Deserialize, Serialize};
use std::{fmt, pin::Pin};
use tokio::io::AsyncRead;

// -------------------------- 公共方法 --------------------------
//编码url路径，保留路径分隔符和非保留字符
const URL_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');
pub(crate) fn url_encode(input: &str) -> String {
    utf8_percent_encode(input, URL_ENCODE).to_string()
}

//去掉域名中误填的协议头和末尾的分隔符
pub(crate) fn trim_domain(domain: &str) -> &str {
    domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

//Kodo使用的url安全base64编码（保留填充符）
pub(crate) fn urlsafe_base64(input: impl AsRef<[u8]>) -> String {
    general_purpose::URL_SAFE.encode(input)
}

//生成EncodedEntryURI，格式为 urlsafe_base64("bucket:key")
pub(crate) fn encoded_entry(bucket: &str, key: &str) -> String {
    urlsafe_base64(format!("{}:{}", bucket, key))
}

// -------------------------- 公共数据 --------------------------

/// 文件内容读取流，由调用者持有，drop即关闭
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// 存储区域
///
/// 不同区域的上传域名和资源管理域名不同，也可以通过 `Custom` 指定私有部署或代理的域名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Region {
    /// 华东-浙江
    #[default]
    #[serde(rename = "z0")]
    Z0,
    /// 华东-浙江2
    #[serde(rename = "cn-east-2")]
    CnEast2,
    /// 华北-河北
    #[serde(rename = "z1")]
    Z1,
    /// 华南-广东
    #[serde(rename = "z2")]
    Z2,
    /// 北美-洛杉矶
    #[serde(rename = "na0")]
    Na0,
    /// 亚太-新加坡
    #[serde(rename = "as0")]
    As0,
    /// 自定义域名
    #[serde(rename = "custom")]
    Custom { up_host: String, rs_host: String },
}
impl Region {
    /// 根据区域id获取区域，无法识别时返回None
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "z0" => Some(Region::Z0),
            "cn-east-2" => Some(Region::CnEast2),
            "z1" => Some(Region::Z1),
            "z2" => Some(Region::Z2),
            "na0" => Some(Region::Na0),
            "as0" => Some(Region::As0),
            _ => None,
        }
    }
    /// 上传域名
    pub fn up_host(&self) -> &str {
        match self {
            Region::Z0 => "upload.qiniup.com",
            Region::CnEast2 => "upload-cn-east-2.qiniup.com",
            Region::Z1 => "upload-z1.qiniup.com",
            Region::Z2 => "upload-z2.qiniup.com",
            Region::Na0 => "upload-na0.qiniup.com",
            Region::As0 => "upload-as0.qiniup.com",
            Region::Custom { up_host, .. } => up_host,
        }
    }
    /// 资源管理域名
    pub fn rs_host(&self) -> &str {
        match self {
            Region::Z0 => "rs-z0.qiniuapi.com",
            Region::CnEast2 => "rs-cn-east-2.qiniuapi.com",
            Region::Z1 => "rs-z1.qiniuapi.com",
            Region::Z2 => "rs-z2.qiniuapi.com",
            Region::Na0 => "rs-na0.qiniuapi.com",
            Region::As0 => "rs-as0.qiniuapi.com",
            Region::Custom { rs_host, .. } => rs_host,
        }
    }
}
impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Z0 => f.write_str("z0"),
            Region::CnEast2 => f.write_str("cn-east-2"),
            Region::Z1 => f.write_str("z1"),
            Region::Z2 => f.write_str("z2"),
            Region::Na0 => f.write_str("na0"),
            Region::As0 => f.write_str("as0"),
            Region::Custom { up_host, rs_host } => write!(f, "custom({}, {})", up_host, rs_host),
        }
    }
}

/// 文件信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// 文件大小，单位字节
    pub fsize: u64,
    /// 文件的hash值
    #[serde(default)]
    pub hash: String,
    /// 文件的mime类型
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    /// 上传时间，单位为100纳秒
    #[serde(rename = "putTime", default)]
    pub put_time: i64,
    /// 存储类型，0 标准存储，1 低频存储，2 归档存储，3 深度归档存储
    #[serde(rename = "type", default)]
    pub file_type: u8,
}

/// 上传成功后返回的信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutRet {
    /// 文件的hash值
    #[serde(default)]
    pub hash: String,
    /// 文件名
    #[serde(default)]
    pub key: String,
}
