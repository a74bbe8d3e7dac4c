use bytes::Bytes;
use hyper::{body::to_bytes, Body, Response, StatusCode};
use serde_derive::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Kodo用于表示文件不存在的状态码
pub const STATUS_NO_SUCH_FILE: u16 = 612;
/// Kodo用于表示目标文件已存在的状态码
pub const STATUS_FILE_EXISTS: u16 = 614;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    IoError(#[from] std::io::Error),
    #[error("本地文件不存在或不可读：{0}")]
    FileNotFound(PathBuf),
    #[error("{0}")]
    HyperError(#[from] hyper::Error),
    #[error("{0}")]
    HttpError(#[from] hyper::http::Error),
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),
    #[error("配置文件解析失败：{0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("配置错误：{0}")]
    InvalidConfig(String),
    #[error("Kodo返回了成功，但消息体解析失败，请自行解析")]
    KodoInvalidResponse(Option<Bytes>),
    #[error("Kodo返回了错误，HTTP状态码：{0}，错误内容：{1}")]
    KodoError(StatusCode, String),
}

impl Error {
    /// 判断是否为“文件不存在”错误
    ///
    /// 依据的是Kodo返回的状态码（612，以及通过下载域名访问时的404），而不是错误文本
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::KodoError(status, _) => {
                status.as_u16() == STATUS_NO_SUCH_FILE || *status == StatusCode::NOT_FOUND
            }
            _ => false,
        }
    }
    /// 判断是否为“目标文件已存在”错误
    pub fn is_file_exists(&self) -> bool {
        matches!(self, Error::KodoError(status, _) if status.as_u16() == STATUS_FILE_EXISTS)
    }
}

#[derive(Debug, Deserialize)]
struct KodoErrorBody {
    error: String,
}

pub(crate) async fn normal_error(response: Response<Body>) -> Error {
    let status_code = response.status();
    match to_bytes(response.into_body()).await {
        Err(_) => Error::KodoError(status_code, String::new()),
        Ok(response_bytes) => {
            let message = match serde_json::from_slice::<KodoErrorBody>(&response_bytes) {
                Ok(body) => body.error,
                Err(_) => String::from_utf8_lossy(&response_bytes).into_owned(),
            };
            tracing::warn!(status = %status_code, %message, "kodo request failed");
            Error::KodoError(status_code, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_classified_by_status() {
        let missing = Error::KodoError(
            StatusCode::from_u16(STATUS_NO_SUCH_FILE).unwrap(),
            "no such file or directory".to_owned(),
        );
        assert!(missing.is_not_found());
        // 文本不同也按状态码判断
        let localized = Error::KodoError(StatusCode::from_u16(612).unwrap(), "文件不存在".to_owned());
        assert!(localized.is_not_found());
        assert!(Error::KodoError(StatusCode::NOT_FOUND, String::new()).is_not_found());
    }

    #[test]
    fn other_errors_are_not_not_found() {
        let denied = Error::KodoError(StatusCode::UNAUTHORIZED, "bad token".to_owned());
        assert!(!denied.is_not_found());
        let io = Error::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file or directory",
        ));
        assert!(!io.is_not_found());
        let exists = Error::KodoError(StatusCode::from_u16(614).unwrap(), "file exists".to_owned());
        assert!(exists.is_file_exists());
        assert!(!exists.is_not_found());
    }

    #[tokio::test]
    async fn normal_error_reads_json_message() {
        let response = Response::builder()
            .status(612)
            .body(Body::from(r#"{"error":"no such file or directory"}"#))
            .unwrap();
        match normal_error(response).await {
            Error::KodoError(status, message) => {
                assert_eq!(status.as_u16(), 612);
                assert_eq!(message, "no such file or directory");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
