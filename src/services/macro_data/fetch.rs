//! 请求描述和 HTTP 获取
//!
//! 所有上游请求都顺序执行；分页接口先读取首页中的总页数，再依次请求后续页

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use url::Url;

use crate::config::ApiConfig;

/// 上游请求描述：地址 + 有序查询参数 + 额外请求头
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub url: String,
    pub params: Vec<(&'static str, String)>,
    pub headers: Vec<(&'static str, &'static str)>,
}

impl UpstreamRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    pub fn header(mut self, key: &'static str, value: &'static str) -> Self {
        self.headers.push((key, value));
        self
    }

    /// 查询参数值
    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 把页码写入所有分页参数（只更新已存在的参数）
    pub fn set_page(&mut self, page_keys: &[&str], page: u32) {
        for (key, value) in self.params.iter_mut() {
            if page_keys.contains(&*key) {
                *value = page.to_string();
            }
        }
    }

    /// 拼接查询参数后的完整请求地址
    pub fn to_url(&self) -> Result<Url> {
        Url::parse_with_params(&self.url, self.params.iter().map(|(k, v)| (*k, v.as_str())))
            .with_context(|| format!("无效的请求地址 {}", self.url))
    }
}

/// 单页解析结果
#[derive(Debug)]
pub struct Page<T> {
    pub rows: Vec<T>,
    /// 上游报告的总页数
    pub pages: u32,
}

impl<T> Page<T> {
    pub fn single(rows: Vec<T>) -> Self {
        Self { rows, pages: 1 }
    }
}

/// 宏观数据服务
///
/// 持有一个共享的 HTTP 客户端，查询方法分布在 interbank / lpr / indicators 模块
pub struct MacroService {
    client: Client,
}

impl MacroService {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(api.timeout())
            .connect_timeout(api.connect_timeout())
            .gzip(true)
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// 发送一次 GET 请求并返回文本
    pub async fn fetch_text(&self, request: &UpstreamRequest) -> Result<String> {
        let url = request.to_url()?;
        log::debug!("📡 请求 {}", url);

        let mut builder = self.client.get(url);
        for (key, value) in &request.headers {
            builder = builder.header(*key, *value);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("请求 {} 失败", request.url))?;

        if !response.status().is_success() {
            return Err(anyhow!("请求 {} 失败: {}", request.url, response.status()));
        }

        let text = response.text().await?;
        log::debug!("📥 响应长度: {} 字节", text.len());
        Ok(text)
    }

    /// 顺序获取全部分页并拼接
    ///
    /// 首页决定总页数，之后的页面失败时整体失败
    pub async fn fetch_all_pages<T, F>(
        &self,
        mut request: UpstreamRequest,
        page_keys: &[&str],
        parse: F,
    ) -> Result<Vec<T>>
    where
        F: Fn(&str) -> Result<Page<T>>,
    {
        request.set_page(page_keys, 1);
        let first = parse(&self.fetch_text(&request).await?)?;
        let total = first.pages.max(1);
        let mut rows = first.rows;

        for page in 2..=total {
            request.set_page(page_keys, page);
            let text = self.fetch_text(&request).await?;
            let next = parse(&text).with_context(|| format!("解析第 {} 页失败", page))?;
            rows.extend(next.rows);
        }

        if total > 1 {
            log::debug!("共获取 {} 页 {} 条记录", total, rows.len());
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[test]
    fn test_request_builder_and_pages() {
        let mut request = UpstreamRequest::new("https://example.com/api")
            .param("p", "1")
            .param("ps", "500")
            .param("pageNo", "1")
            .header("User-Agent", "test");

        request.set_page(&["p", "pageNo", "pageNum"], 3);

        assert_eq!(request.get("p"), Some("3"));
        assert_eq!(request.get("pageNo"), Some("3"));
        assert_eq!(request.get("ps"), Some("500"));
        assert_eq!(request.get("pageNum"), None);
        assert_eq!(request.headers, vec![("User-Agent", "test")]);
    }

    #[test]
    fn test_to_url_encodes_params() {
        let request = UpstreamRequest::new("https://example.com/api")
            .param("filter", "(MARKET_CODE=\"001\")")
            .param("quoteColumns", "");
        let url = request.to_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api?filter=%28MARKET_CODE%3D%22001%22%29&quoteColumns="
        );
    }

    #[test]
    fn test_service_builds_from_config() {
        assert!(MacroService::new(&ApiConfig::default()).is_ok());
    }

    const PAGE_KEYS: [&str; 4] = ["pageNumber", "p", "pageNo", "pageNum"];

    type SeenQueries = web::Data<Mutex<Vec<String>>>;

    /// 三页数据；broken 为 true 时第 2 页返回 500
    async fn serve_page(req: HttpRequest, seen: SeenQueries, broken: bool) -> HttpResponse {
        let query = req.query_string().to_string();
        seen.lock().unwrap().push(query.clone());

        let page = web::Query::<HashMap<String, String>>::from_query(&query)
            .ok()
            .and_then(|q| q.get("p").cloned())
            .unwrap_or_default();

        match (page.as_str(), broken) {
            ("2", true) => HttpResponse::InternalServerError().finish(),
            ("1", _) => HttpResponse::Ok().body(r#"{"pages":3,"rows":["a","b"]}"#),
            ("2", _) => HttpResponse::Ok().body(r#"{"pages":3,"rows":["c"]}"#),
            ("3", _) => HttpResponse::Ok().body(r#"{"pages":3,"rows":["d","e"]}"#),
            _ => HttpResponse::NotFound().finish(),
        }
    }

    fn parse_test_page(text: &str) -> Result<Page<String>> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        let rows = json["rows"]
            .as_array()
            .ok_or_else(|| anyhow!("缺少 rows"))?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        Ok(Page {
            rows,
            pages: json["pages"].as_u64().unwrap_or(1) as u32,
        })
    }

    /// 在随机端口启动本地分页服务，返回服务地址和收到的查询串
    fn start_paged_server() -> (String, SeenQueries) {
        let seen: SeenQueries = web::Data::new(Mutex::new(Vec::new()));
        let data = seen.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route(
                    "/pages",
                    web::get().to(|req: HttpRequest, seen: SeenQueries| serve_page(req, seen, false)),
                )
                .route(
                    "/broken",
                    web::get().to(|req: HttpRequest, seen: SeenQueries| serve_page(req, seen, true)),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        (format!("http://{}", addr), seen)
    }

    fn paged_request(url: String) -> UpstreamRequest {
        UpstreamRequest::new(url)
            .param("pageNumber", "1")
            .param("ps", "500")
            .param("p", "1")
            .param("pageNo", "1")
            .param("pageNum", "1")
    }

    #[actix_web::test]
    async fn test_fetch_all_pages_concatenates_in_order() {
        let (base, seen) = start_paged_server();
        let service = MacroService::new(&ApiConfig::default()).unwrap();

        let rows = service
            .fetch_all_pages(paged_request(format!("{}/pages", base)), &PAGE_KEYS, parse_test_page)
            .await
            .unwrap();
        assert_eq!(rows, vec!["a", "b", "c", "d", "e"]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        for (idx, query) in seen.iter().enumerate() {
            let page = idx + 1;
            assert_eq!(
                *query,
                format!("pageNumber={0}&ps=500&p={0}&pageNo={0}&pageNum={0}", page)
            );
        }
    }

    #[actix_web::test]
    async fn test_fetch_all_pages_propagates_later_page_failure() {
        let (base, seen) = start_paged_server();
        let service = MacroService::new(&ApiConfig::default()).unwrap();

        let err = service
            .fetch_all_pages(paged_request(format!("{}/broken", base)), &PAGE_KEYS, parse_test_page)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"), "{}", err);

        // 第 2 页失败后不再请求第 3 页
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
