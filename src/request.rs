use crate::{
    common::{trim_domain, url_encode, Region},
    sign::{access_token, private_url},
    Error,
};
use hyper::{client::ResponseFuture, header, Body, Client, Method, Request};
use hyper_tls::HttpsConnector;
use std::{borrow::Cow, collections::HashMap};

//Kodo基础结构
#[derive(Debug, Clone)]
pub(crate) struct Kodo {
    pub ak: Cow<'static, str>,
    pub sk: Cow<'static, str>,
    pub region: Region,
    pub bucket: Option<Cow<'static, str>>,
    pub domain: Option<Cow<'static, str>>,
    pub object: Option<Cow<'static, str>>,
    pub enable_https: bool,
}
impl Kodo {
    pub fn new(ak: &str, sk: &str) -> Self {
        Kodo {
            ak: ak.to_owned().into(),
            sk: sk.to_owned().into(),
            region: Region::default(),
            bucket: None,
            domain: None,
            object: None,
            enable_https: true,
        }
    }
    pub fn set_bucket(&mut self, bucket: impl ToString) {
        self.bucket = Some(bucket.to_string().into());
    }
    pub fn set_domain(&mut self, domain: impl ToString) {
        self.domain = Some(trim_domain(&domain.to_string()).to_owned().into());
    }
    pub fn set_object(&mut self, object: impl ToString) {
        self.object = Some(object.to_string().into());
    }
    pub fn set_https(&mut self, https: bool) {
        self.enable_https = https;
    }
    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }
    pub fn scheme(&self) -> &'static str {
        if self.enable_https {
            "https"
        } else {
            "http"
        }
    }
    pub fn bucket_name(&self) -> &str {
        self.bucket.as_deref().unwrap_or_default()
    }
    pub fn object_key(&self) -> &str {
        self.object.as_deref().unwrap_or_default()
    }
    //公开空间的下载地址
    pub fn public_url(&self) -> String {
        format!(
            "{}://{}/{}",
            self.scheme(),
            self.domain.as_deref().unwrap_or_default(),
            url_encode(self.object_key())
        )
    }
    //私有空间的下载地址
    pub fn private_url(&self, deadline: i64) -> String {
        private_url(&self.ak, &self.sk, &self.public_url(), deadline)
    }
}

//请求发往的服务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    //上传服务
    Up,
    //资源管理服务
    Rs,
}

#[derive(Debug)]
pub(crate) struct KodoRequest {
    pub kodo: Kodo,
    pub method: Method,
    pub service: Service,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Body,
}
impl KodoRequest {
    pub fn new(kodo: Kodo, method: Method, service: Service, path: impl ToString) -> Self {
        KodoRequest {
            kodo,
            method,
            service,
            path: path.to_string(),
            headers: HashMap::with_capacity(10),
            body: Body::empty(),
        }
    }
    pub fn insert_header(&mut self, key: impl ToString, value: impl ToString) {
        self.headers.insert(key.to_string(), value.to_string());
    }
    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }
    pub fn host(&self) -> &str {
        match self.service {
            Service::Up => self.kodo.region.up_host(),
            Service::Rs => self.kodo.region.rs_host(),
        }
    }
    pub fn uri(&self) -> String {
        format!("{}://{}{}", self.kodo.scheme(), self.host(), self.path)
    }
    pub fn access_sign(&mut self) {
        let token = access_token(&self.kodo.ak, &self.kodo.sk, &self.path, b"");
        self.insert_header(header::AUTHORIZATION, token);
        self.insert_header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    pub fn send_to_kodo(mut self) -> Result<ResponseFuture, Error> {
        //上传请求的凭证在表单中，资源管理请求需要签名
        if self.service == Service::Rs {
            self.access_sign();
        }
        let uri = self.uri();
        tracing::debug!(method = %self.method, %uri, "sending kodo request");
        //构建http请求
        let mut req = Request::builder().method(&self.method).uri(&uri);
        for (key, value) in self.headers.iter() {
            req = req.header(key, value);
        }
        let request = req.body(self.body)?;
        let client = Client::builder().build::<_, hyper::Body>(HttpsConnector::new());
        Ok(client.request(request))
    }
}

//直接请求下载地址
pub(crate) fn fetch(url: &str) -> Result<ResponseFuture, Error> {
    tracing::debug!(%url, "fetching object");
    let request = Request::builder()
        .method(Method::GET)
        .uri(url)
        .body(Body::empty())?;
    let client = Client::builder().build::<_, hyper::Body>(HttpsConnector::new());
    Ok(client.request(request))
}
