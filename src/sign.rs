use crate::common::urlsafe_base64;
use ring::hmac;

//计算签名值，结果为url安全的base64编码
pub(crate) fn sign(sk: &str, data: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, sk.as_bytes());
    urlsafe_base64(hmac::sign(&key, data))
}

//生成 ak:sign 格式的凭证
pub(crate) fn token(ak: &str, sk: &str, data: &[u8]) -> String {
    format!("{}:{}", ak, sign(sk, data))
}

//上传凭证，格式为 ak:sign:encodedPutPolicy
pub(crate) fn upload_token(ak: &str, sk: &str, put_policy: &[u8]) -> String {
    let encoded_policy = urlsafe_base64(put_policy);
    format!("{}:{}", token(ak, sk, encoded_policy.as_bytes()), encoded_policy)
}

//管理凭证，待签名内容为 path?query + "\n"
//
//仅当Content-Type为application/x-www-form-urlencoded时，body才参与签名
pub(crate) fn access_token(ak: &str, sk: &str, path_and_query: &str, form_body: &[u8]) -> String {
    let mut data = Vec::with_capacity(path_and_query.len() + 1 + form_body.len());
    data.extend_from_slice(path_and_query.as_bytes());
    data.push(b'\n');
    data.extend_from_slice(form_body);
    format!("QBox {}", token(ak, sk, &data))
}

//私有空间下载地址，在base_url后追加过期时间和下载凭证
pub(crate) fn private_url(ak: &str, sk: &str, base_url: &str, deadline: i64) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    let url_to_sign = format!("{}{}e={}", base_url, separator, deadline);
    let token = token(ak, sk, url_to_sign.as_bytes());
    format!("{}&token={}", url_to_sign, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine};

    fn verify(sk: &str, data: &[u8], encoded_sign: &str) -> bool {
        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, sk.as_bytes());
        let raw = general_purpose::URL_SAFE.decode(encoded_sign).unwrap();
        hmac::verify(&key, data, &raw).is_ok()
    }

    #[test]
    fn upload_token_embeds_policy() {
        let policy = br#"{"scope":"bucket","deadline":1451491200}"#;
        let token = upload_token("ak", "sk", policy);
        let parts = token.split(':').collect::<Vec<_>>();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ak");
        assert_eq!(general_purpose::URL_SAFE.decode(parts[2]).unwrap(), policy.to_vec());
        assert!(verify("sk", parts[2].as_bytes(), parts[1]));
        assert!(!verify("other", parts[2].as_bytes(), parts[1]));
    }

    #[test]
    fn access_token_signs_path_with_newline() {
        let token = access_token("ak", "sk", "/stat/YnVja2V0OmtleQ==", b"");
        let sign = token.strip_prefix("QBox ak:").unwrap();
        assert!(verify("sk", b"/stat/YnVja2V0OmtleQ==\n", sign));
    }

    #[test]
    fn private_url_appends_deadline_and_token() {
        let url = private_url("ak", "sk", "http://cdn.example.com/a/b.txt", 1700003600);
        let (signed, token) = url.split_once("&token=").unwrap();
        assert_eq!(signed, "http://cdn.example.com/a/b.txt?e=1700003600");
        let sign = token.strip_prefix("ak:").unwrap();
        assert!(verify("sk", signed.as_bytes(), sign));
        let with_query = private_url("ak", "sk", "http://cdn.example.com/a?imageView2", 1);
        assert!(with_query.starts_with("http://cdn.example.com/a?imageView2&e=1&token=ak:"));
    }
}
