//! 贷款市场报价利率（LPR）
//!
//! 数据来源: http://data.eastmoney.com/cjsj/globalRateLPR.html

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::models::LprData;

use super::common::{
    page_count, parse_date, strip_js_assignment, value_to_f64, EM_DATACENTER_API,
};
use super::fetch::{MacroService, Page, UpstreamRequest};

pub fn lpr_request() -> UpstreamRequest {
    UpstreamRequest::new(EM_DATACENTER_API)
        .param("type", "RPTA_WEB_RATE")
        .param("sty", "ALL")
        .param("token", "894050c76af8597a853f5b408b759f5d")
        .param("p", "1")
        .param("ps", "2000")
        .param("st", "TRADE_DATE")
        .param("sr", "-1")
        .param("var", "WPuRCBoA")
        .param("rt", "52826782")
}

/// 解析 LPR 数据
///
/// 格式: var WPuRCBoA={"result":{"pages":1,"data":[{"TRADE_DATE":"2024-01-22 00:00:00","LPR1Y":3.45,...}]}};
pub fn parse_lpr_page(text: &str) -> Result<Page<LprData>> {
    let json: Value = serde_json::from_str(strip_js_assignment(text))?;
    let result = &json["result"];
    let data = result["data"]
        .as_array()
        .ok_or_else(|| anyhow!("LPR 数据格式错误"))?;

    let rows = data
        .iter()
        .map(|item| {
            let date = item["TRADE_DATE"]
                .as_str()
                .ok_or_else(|| anyhow!("缺少 TRADE_DATE 字段"))?;
            Ok(LprData {
                date: parse_date(date)?,
                lpr_1y: value_to_f64(&item["LPR1Y"]),
                lpr_5y: value_to_f64(&item["LPR5Y"]),
                short_term_rate: value_to_f64(&item["RATE_1"]),
                long_term_rate: value_to_f64(&item["RATE_2"]),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let pages = page_count(&result["pages"])?;
    Ok(Page { rows, pages })
}

impl MacroService {
    /// 获取中国贷款市场报价利率
    /// 对应 akshare 的 macro_china_lpr() 函数
    pub async fn lpr(&self) -> Result<Vec<LprData>> {
        let mut rows = self
            .fetch_all_pages(lpr_request(), &["p"], parse_lpr_page)
            .await?;
        rows.sort_by_key(|row| row.date);
        log::info!("LPR: {} 条", rows.len());
        Ok(rows)
    }
}
