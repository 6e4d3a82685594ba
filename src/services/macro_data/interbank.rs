//! 银行间同业拆借利率
//!
//! 数据来源: https://data.eastmoney.com/shibor/

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{InterbankRate, InterbankRateSummary, InterbankSummaryRow};

use super::common::{page_count, parse_date, value_to_f64, EM_DATACENTER_V1_API};
use super::fetch::{MacroService, Page, UpstreamRequest};
use super::lookup::{currency_code, market_code, market_profile, period_code, upstream_currency};

const INTERBANK_REPORT: &str = "RPT_IMP_INTRESTRATEN";
const INTERBANK_COLUMNS: &str = "REPORT_DATE,REPORT_PERIOD,IR_RATE,CHANGE_RATE,INDICATOR_ID,LATEST_RECORD,MARKET,MARKET_CODE,CURRENCY,CURRENCY_CODE";
const PAGE_KEYS: [&str; 4] = ["pageNumber", "p", "pageNo", "pageNum"];

/// 汇总查询未指定币种时使用美元
pub const DEFAULT_SUMMARY_CURRENCY: &str = "USD";

/// 构造同业拆借利率请求，参数需与东方财富网页保持一致
pub fn interbank_request(market: &str, currency: &str, indicator: &str) -> UpstreamRequest {
    UpstreamRequest::new(EM_DATACENTER_V1_API)
        .param("reportName", INTERBANK_REPORT)
        .param("columns", INTERBANK_COLUMNS)
        .param("quoteColumns", "")
        .param(
            "filter",
            format!(
                r#"(MARKET_CODE="{}")(CURRENCY_CODE="{}")(INDICATOR_ID="{}")"#,
                market, currency, indicator
            ),
        )
        .param("pageNumber", "1")
        .param("pageSize", "500")
        .param("sortTypes", "-1")
        .param("sortColumns", "REPORT_DATE")
        .param("source", "WEB")
        .param("client", "WEB")
        .param("p", "1")
        .param("pageNo", "1")
        .param("pageNum", "1")
        .param("_", "1653376974939")
}

/// 解析一页同业拆借利率数据
///
/// 格式: {"result": {"pages": 3, "data": [{"REPORT_DATE": "2024-01-02 00:00:00", "IR_RATE": 1.75, ...}]}}
pub fn parse_interbank_page(text: &str) -> Result<Page<InterbankRate>> {
    let json: Value = serde_json::from_str(text)?;
    let result = json
        .get("result")
        .filter(|r| !r.is_null())
        .ok_or_else(|| {
            let message = json["message"].as_str().unwrap_or("返回结果为空");
            anyhow!("同业拆借利率无数据: {}", message)
        })?;

    let pages = page_count(&result["pages"])?;
    let data = result["data"]
        .as_array()
        .ok_or_else(|| anyhow!("同业拆借利率数据格式错误"))?;

    let rows = data
        .iter()
        .map(|item| {
            let date = item["REPORT_DATE"]
                .as_str()
                .ok_or_else(|| anyhow!("缺少 REPORT_DATE 字段"))?;
            Ok(InterbankRate {
                report_date: parse_date(date)?,
                rate: value_to_f64(&item["IR_RATE"]),
                change: value_to_f64(&item["CHANGE_RATE"]),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Page { rows, pages })
}

/// 按市场期限列表合并各期限利率（外连接，按报告日排序）
///
/// 第一个期限的失败直接返回；后续期限失败时跳过该列
pub fn merge_period_rates(
    market: &str,
    currency: &str,
    series: Vec<(&str, Result<Vec<InterbankRate>>)>,
) -> Result<InterbankRateSummary> {
    let mut periods: Vec<String> = Vec::new();
    let mut merged: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();

    for (idx, (period, result)) in series.into_iter().enumerate() {
        let rates = match result {
            Ok(rates) => rates,
            Err(e) if idx == 0 => return Err(e),
            Err(e) => {
                log::debug!("跳过期限 {}: {:#}", period, e);
                continue;
            }
        };

        let column = periods.len();
        periods.push(period.to_string());
        for rate in rates {
            let values = merged.entry(rate.report_date).or_default();
            if values.len() <= column {
                values.resize(column + 1, None);
            }
            values[column] = rate.rate;
        }
    }

    let rows = merged
        .into_iter()
        .map(|(report_date, mut rates)| {
            rates.resize(periods.len(), None);
            InterbankSummaryRow { report_date, rates }
        })
        .collect();

    Ok(InterbankRateSummary {
        market: market.to_string(),
        currency: currency.to_string(),
        periods,
        rows,
    })
}

impl MacroService {
    /// 获取银行间市场拆借利率
    /// 对应 akshare 的 rate_interbank() 函数
    ///
    /// # 参数
    /// - market: 市场简称（sh/ch/l/eu/hk/s）或中文全称
    /// - currency: 币种代码或中文名称
    /// - period: 期限（隔夜、1周 ... 1年）
    pub async fn interbank_rate(
        &self,
        market: &str,
        currency: &str,
        period: &str,
    ) -> Result<Vec<InterbankRate>> {
        let market = market_code(market)?;
        let currency = upstream_currency(market, currency_code(currency)?);
        self.fetch_interbank(market, currency, period).await
    }

    /// 获取某市场全部期限的拆借利率汇总
    ///
    /// 中国、欧洲和上海市场使用固定币种，其余市场默认美元
    pub async fn interbank_rate_summary(
        &self,
        market: &str,
        currency: Option<&str>,
    ) -> Result<InterbankRateSummary> {
        let market_label = market;
        let market = market_code(market)?;
        let profile = market_profile(market);
        let currency = profile
            .currency
            .or(currency)
            .unwrap_or(DEFAULT_SUMMARY_CURRENCY);
        let currency = upstream_currency(market, currency_code(currency)?);

        let mut series = Vec::with_capacity(profile.periods.len());
        for (idx, period) in profile.periods.iter().enumerate() {
            let result = self.fetch_interbank(market, currency, period).await;
            let failed_first = idx == 0 && result.is_err();
            series.push((*period, result));
            if failed_first {
                break;
            }
        }

        let summary = merge_period_rates(market, currency, series)?;
        log::info!(
            "同业拆借利率汇总 {}: {} 个期限, {} 条",
            market_label,
            summary.periods.len(),
            summary.rows.len()
        );
        Ok(summary)
    }

    /// 按已解析的市场、币种代码获取单一期限的利率，结果按报告日升序
    async fn fetch_interbank(
        &self,
        market: &str,
        currency: &str,
        period: &str,
    ) -> Result<Vec<InterbankRate>> {
        let indicator = period_code(period)?;
        let request = interbank_request(market, currency, indicator);
        let mut rows = self
            .fetch_all_pages(request, &PAGE_KEYS, parse_interbank_page)
            .await?;

        rows.sort_by_key(|row| row.report_date);
        log::info!(
            "同业拆借利率 {}/{}/{}: {} 条",
            market,
            currency,
            period,
            rows.len()
        );
        Ok(rows)
    }
}
