//! 公共常量和辅助函数

use std::sync::OnceLock;

use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Shanghai;
use regex::Regex;
use serde_json::Value;

// ==================== 东方财富 API 常量 ====================

/// 数据中心 v1 接口（同业拆借利率）
pub const EM_DATACENTER_V1_API: &str = "https://datacenter-web.eastmoney.com/api/data/v1/get";
/// 数据中心旧版接口（LPR）
pub const EM_DATACENTER_API: &str = "http://datacenter.eastmoney.com/api/data/get";
/// 宏观经济指标接口（货币供应量、CPI、GDP、PPI、PMI）
pub const EM_MACRO_API: &str = "http://datainterface.eastmoney.com/EM_DataCenter/JS.aspx";

/// 部分接口需要浏览器 User-Agent
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/81.0.4044.138 Safari/537.36";

/// 获取北京时间字符串（ISO 8601 格式，带+08:00时区）
pub fn get_beijing_time() -> String {
    Utc::now().with_timezone(&Shanghai).to_rfc3339()
}

/// 解析数值字段，空串、"-" 等非数值内容返回 None
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s == "-" || s == "--" {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// JSON 字段可能是数值或字符串
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// 单个查询允许的最大分页数
pub const MAX_PAGES: u32 = 200;

/// 读取上游报告的总页数，缺失时视为 1 页
pub fn page_count(value: &Value) -> Result<u32> {
    let pages = match value {
        Value::Null => return Ok(1),
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| anyhow!("无效的总页数: {}", value))?;

    match u32::try_from(pages) {
        Ok(pages) if pages <= MAX_PAGES => Ok(pages.max(1)),
        _ => bail!("总页数 {} 超过上限 {}", pages, MAX_PAGES),
    }
}

/// 保留三位小数
pub fn round3(value: Option<f64>) -> Option<f64> {
    value.map(|v| (v * 1000.0).round() / 1000.0)
}

/// 解析日期，兼容 "2024-01-02 00:00:00" 和 "2024/01/02"
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let day = s
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default();

    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(day, "%Y/%m/%d"))
        .map_err(|e| anyhow!("无法解析日期 {:?}: {}", s, e))
}

/// 报告期排序键：按标签中出现的数字序列比较
///
/// "2023年第1季度" < "2023年第1-2季度" < "2023年第1-4季度" < "2024年01月份"
pub fn period_key(label: &str) -> Vec<u32> {
    let mut key = Vec::new();
    let mut current: Option<u32> = None;

    for c in label.chars() {
        match c.to_digit(10) {
            Some(d) => {
                current = Some(current.unwrap_or(0).saturating_mul(10).saturating_add(d));
            }
            None => {
                if let Some(n) = current.take() {
                    key.push(n);
                }
            }
        }
    }
    if let Some(n) = current {
        key.push(n);
    }

    key
}

fn js_assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:var\s+)?[A-Za-z_$][\w$]*\s*=\s*").unwrap())
}

/// 去掉 `var NAME=...;` 形式的变量赋值包装
pub fn strip_js_assignment(text: &str) -> &str {
    let body = match js_assignment_re().find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    body.trim_end().trim_end_matches(';').trim_end()
}

/// 截取第一个 `open` 到最后一个 `close` 之间的内容（包含两端）
pub fn slice_between(text: &str, open: char, close: char) -> Result<&str> {
    let start = text
        .find(open)
        .ok_or_else(|| anyhow!("响应中未找到 {:?}", open))?;
    let end = text
        .rfind(close)
        .filter(|end| *end > start)
        .ok_or_else(|| anyhow!("响应中未找到 {:?}", close))?;
    Ok(&text[start..end + close.len_utf8()])
}
