//! 国家宏观经济指标：货币供应量、CPI、GDP、PPI、PMI
//!
//! 数据来源: http://data.eastmoney.com/cjsj/ （GJZB 接口）
//! 每条记录是一个逗号分隔的字符串，按固定列顺序拆分

use anyhow::{anyhow, bail, Result};
use serde_json::Value;

use crate::models::{CpiData, GdpData, MacroTable, MoneySupply, PmiData, PpiData, TableRow};

use super::common::{
    page_count, parse_number, period_key, round3, slice_between, BROWSER_USER_AGENT, EM_MACRO_API,
};
use super::fetch::{MacroService, Page, UpstreamRequest};
use super::lenient;
use super::lookup::MacroFlag;

const PAGE_KEYS: [&str; 3] = ["p", "pageNo", "pageNum"];
const JS_TEMPLATE: &str = "({data:[(x)],pages:(pc)})";

/// 由逗号分隔字段构造的指标行
pub trait IndicatorRow: TableRow + Sized {
    /// 接口中的 mkt 参数
    const MKT: &'static str;

    /// 字段数量已保证与 COLUMNS 一致
    fn from_fields(fields: &[&str]) -> Self;

    /// 报告期（月份 / 季度）
    fn period(&self) -> &str;
}

fn num(fields: &[&str], idx: usize) -> Option<f64> {
    parse_number(fields[idx])
}

fn num3(fields: &[&str], idx: usize) -> Option<f64> {
    round3(parse_number(fields[idx]))
}

impl IndicatorRow for MoneySupply {
    const MKT: &'static str = "11";

    fn from_fields(f: &[&str]) -> Self {
        Self {
            month: f[0].trim().to_string(),
            m2: num3(f, 1),
            m2_yoy: num3(f, 2),
            m2_mom: num3(f, 3),
            m1: num3(f, 4),
            m1_yoy: num3(f, 5),
            m1_mom: num3(f, 6),
            m0: num3(f, 7),
            m0_yoy: num3(f, 8),
            m0_mom: num3(f, 9),
        }
    }

    fn period(&self) -> &str {
        &self.month
    }
}

impl IndicatorRow for CpiData {
    const MKT: &'static str = "19";

    fn from_fields(f: &[&str]) -> Self {
        Self {
            month: f[0].trim().to_string(),
            national: num3(f, 1),
            national_yoy: num3(f, 2),
            national_mom: num3(f, 3),
            national_cumulative: num3(f, 4),
            urban: num3(f, 5),
            urban_yoy: num3(f, 6),
            urban_mom: num3(f, 7),
            urban_cumulative: num3(f, 8),
            rural: num3(f, 9),
            rural_yoy: num3(f, 10),
            rural_mom: num3(f, 11),
            rural_cumulative: num3(f, 12),
        }
    }

    fn period(&self) -> &str {
        &self.month
    }
}

impl IndicatorRow for GdpData {
    const MKT: &'static str = "20";

    fn from_fields(f: &[&str]) -> Self {
        Self {
            quarter: f[0].trim().to_string(),
            gdp: num3(f, 1),
            gdp_yoy: num3(f, 2),
            primary: num3(f, 3),
            primary_yoy: num3(f, 4),
            secondary: num3(f, 5),
            secondary_yoy: num3(f, 6),
            tertiary: num3(f, 7),
            tertiary_yoy: num3(f, 8),
        }
    }

    fn period(&self) -> &str {
        &self.quarter
    }
}

impl IndicatorRow for PpiData {
    const MKT: &'static str = "22";

    fn from_fields(f: &[&str]) -> Self {
        Self {
            month: f[0].trim().to_string(),
            current: num(f, 1),
            current_yoy: num(f, 2),
            cumulative: num(f, 3),
        }
    }

    fn period(&self) -> &str {
        &self.month
    }
}

impl IndicatorRow for PmiData {
    const MKT: &'static str = "21";

    fn from_fields(f: &[&str]) -> Self {
        Self {
            month: f[0].trim().to_string(),
            manufacturing: num(f, 1),
            manufacturing_yoy: num(f, 2),
            non_manufacturing: num(f, 3),
            non_manufacturing_yoy: num(f, 4),
        }
    }

    fn period(&self) -> &str {
        &self.month
    }
}

/// 货币供应量请求（不带 js 模板，返回字符串数组）
pub fn money_supply_request() -> UpstreamRequest {
    UpstreamRequest::new(EM_MACRO_API)
        .param("type", "GJZB")
        .param("sty", "ZGZB")
        .param("p", "1")
        .param("ps", "200")
        .param("mkt", MoneySupply::MKT)
}

/// CPI / GDP / PMI 请求
pub fn indicator_request(mkt: &'static str) -> UpstreamRequest {
    UpstreamRequest::new(EM_MACRO_API)
        .param("type", "GJZB")
        .param("sty", "ZGZB")
        .param("js", JS_TEMPLATE)
        .param("p", "1")
        .param("ps", "2000")
        .param("mkt", mkt)
        .param("pageNo", "1")
        .param("pageNum", "1")
        .param("_", "1603023435552")
}

/// PPI 请求，需要回调名和浏览器 User-Agent
pub fn ppi_request() -> UpstreamRequest {
    UpstreamRequest::new(EM_MACRO_API)
        .param("cb", "datatable6912149")
        .param("type", "GJZB")
        .param("sty", "ZGZB")
        .param("js", JS_TEMPLATE)
        .param("p", "1")
        .param("ps", "2000")
        .param("mkt", PpiData::MKT)
        .param("pageNo", "1")
        .param("pageNum", "1")
        .param("_", "1603023435552")
        .header("User-Agent", BROWSER_USER_AGENT)
}

/// 把字符串记录拆分为指标行，空记录跳过
fn parse_records<R: IndicatorRow>(records: &[Value]) -> Result<Vec<R>> {
    let mut rows = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let line = record
            .as_str()
            .ok_or_else(|| anyhow!("第 {} 条记录不是字符串", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != R::COLUMNS.len() {
            bail!(
                "第 {} 条记录字段数为 {}，期望 {}: {}",
                idx + 1,
                fields.len(),
                R::COLUMNS.len(),
                line
            );
        }
        rows.push(R::from_fields(&fields));
    }

    Ok(rows)
}

/// 解析带 js 模板的响应
///
/// 格式: ({data:["2023年09月份,103.2,...","..."],pages:1})，可能带回调名前缀
pub fn parse_indicator_page<R: IndicatorRow>(text: &str) -> Result<Page<R>> {
    let payload = lenient::decode(slice_between(text, '{', '}')?)?;
    let records = payload["data"]
        .as_array()
        .ok_or_else(|| anyhow!("指标数据缺少 data 字段"))?;
    let pages = page_count(&payload["pages"])?;

    Ok(Page {
        rows: parse_records(records)?,
        pages,
    })
}

/// 解析不带 js 模板的响应
///
/// 格式: (["2023年09月份,2892000.1,10.3,...","..."])
pub fn parse_indicator_array<R: IndicatorRow>(text: &str) -> Result<Page<R>> {
    let payload = lenient::decode(slice_between(text, '[', ']')?)?;
    let records = payload
        .as_array()
        .ok_or_else(|| anyhow!("指标数据不是数组"))?;
    Ok(Page::single(parse_records(records)?))
}

/// 按报告期升序排列（稳定排序）
pub fn sort_by_period<R: IndicatorRow>(rows: &mut [R]) {
    rows.sort_by_cached_key(|row| period_key(row.period()));
}

impl MacroService {
    async fn fetch_indicator<R: IndicatorRow>(
        &self,
        request: UpstreamRequest,
        name: &str,
    ) -> Result<Vec<R>> {
        let mut rows = self
            .fetch_all_pages(request, &PAGE_KEYS, parse_indicator_page::<R>)
            .await?;
        sort_by_period(&mut rows);
        log::info!("{}: {} 条", name, rows.len());
        Ok(rows)
    }

    /// 货币供应量
    /// 对应 akshare 的 macro_china_money_supply() 函数
    pub async fn money_supply(&self) -> Result<Vec<MoneySupply>> {
        let text = self.fetch_text(&money_supply_request()).await?;
        let mut rows = parse_indicator_array::<MoneySupply>(&text)?.rows;
        sort_by_period(&mut rows);
        log::info!("货币供应量: {} 条", rows.len());
        Ok(rows)
    }

    /// 居民消费价格指数
    pub async fn cpi(&self) -> Result<Vec<CpiData>> {
        self.fetch_indicator(indicator_request(CpiData::MKT), "CPI")
            .await
    }

    /// 国内生产总值
    pub async fn gdp(&self) -> Result<Vec<GdpData>> {
        self.fetch_indicator(indicator_request(GdpData::MKT), "GDP")
            .await
    }

    /// 工业品出厂价格指数
    pub async fn ppi(&self) -> Result<Vec<PpiData>> {
        self.fetch_indicator(ppi_request(), "PPI").await
    }

    /// 采购经理人指数
    pub async fn pmi(&self) -> Result<Vec<PmiData>> {
        self.fetch_indicator(indicator_request(PmiData::MKT), "PMI")
            .await
    }

    /// 按指标获取宏观数据，未指定时返回 GDP
    pub async fn macro_data(&self, flag: Option<MacroFlag>) -> Result<MacroTable> {
        let table = match flag.unwrap_or_default() {
            MacroFlag::Lpr => MacroTable::Lpr(self.lpr().await?),
            MacroFlag::MoneySupply => MacroTable::MoneySupply(self.money_supply().await?),
            MacroFlag::Cpi => MacroTable::Cpi(self.cpi().await?),
            MacroFlag::Gdp => MacroTable::Gdp(self.gdp().await?),
            MacroFlag::Ppi => MacroTable::Ppi(self.ppi().await?),
            MacroFlag::Pmi => MacroTable::Pmi(self.pmi().await?),
        };
        log::debug!("宏观指标 {:?}: {} 条, 列 {:?}", flag, table.len(), table.columns());
        Ok(table)
    }
}
