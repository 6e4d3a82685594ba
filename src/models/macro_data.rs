//! 宏观经济数据模型
//!
//! 各表格的行结构序列化后的字段名即为展示用的中文列名，
//! `COLUMNS` 常量与序列化字段一一对应、顺序一致。

#![allow(dead_code)]

use chrono::NaiveDate;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// 固定列名的表格行
pub trait TableRow {
    const COLUMNS: &'static [&'static str];
}

/// 银行间同业拆借利率（单一市场、币种、期限）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterbankRate {
    #[serde(rename = "报告日")]
    pub report_date: NaiveDate,
    #[serde(rename = "利率")]
    pub rate: Option<f64>,
    #[serde(rename = "涨跌")]
    pub change: Option<f64>,
}

impl TableRow for InterbankRate {
    const COLUMNS: &'static [&'static str] = &["报告日", "利率", "涨跌"];
}

/// 同业拆借利率汇总中的一行，`rates` 与汇总表的期限列对齐
#[derive(Debug, Clone, PartialEq)]
pub struct InterbankSummaryRow {
    pub report_date: NaiveDate,
    pub rates: Vec<Option<f64>>,
}

/// 多期限同业拆借利率汇总
///
/// 列为 "报告日" 加上成功获取的各期限，序列化为
/// `{"columns": [...], "rows": [{"报告日": ..., "隔夜": ..., ...}]}`
#[derive(Debug, Clone, PartialEq)]
pub struct InterbankRateSummary {
    pub market: String,
    pub currency: String,
    pub periods: Vec<String>,
    pub rows: Vec<InterbankSummaryRow>,
}

impl InterbankRateSummary {
    pub const DATE_COLUMN: &'static str = "报告日";

    pub fn columns(&self) -> Vec<&str> {
        std::iter::once(Self::DATE_COLUMN)
            .chain(self.periods.iter().map(String::as_str))
            .collect()
    }
}

struct SummaryRowRef<'a> {
    periods: &'a [String],
    row: &'a InterbankSummaryRow,
}

impl Serialize for SummaryRowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.periods.len() + 1))?;
        map.serialize_entry(InterbankRateSummary::DATE_COLUMN, &self.row.report_date)?;
        for (idx, period) in self.periods.iter().enumerate() {
            map.serialize_entry(period, &self.row.rates.get(idx).copied().flatten())?;
        }
        map.end()
    }
}

impl Serialize for InterbankRateSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<SummaryRowRef<'_>> = self
            .rows
            .iter()
            .map(|row| SummaryRowRef {
                periods: &self.periods,
                row,
            })
            .collect();

        let mut state = serializer.serialize_struct("InterbankRateSummary", 4)?;
        state.serialize_field("market", &self.market)?;
        state.serialize_field("currency", &self.currency)?;
        state.serialize_field("columns", &self.columns())?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

/// 贷款市场报价利率（LPR）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LprData {
    #[serde(rename = "日期")]
    pub date: NaiveDate,
    #[serde(rename = "1年lpr")]
    pub lpr_1y: Option<f64>,
    #[serde(rename = "5年lpr")]
    pub lpr_5y: Option<f64>,
    /// 短期贷款基准利率
    #[serde(rename = "短期(6个月至1年)")]
    pub short_term_rate: Option<f64>,
    /// 中长期贷款基准利率
    #[serde(rename = "中长期(5年以上)")]
    pub long_term_rate: Option<f64>,
}

impl TableRow for LprData {
    const COLUMNS: &'static [&'static str] =
        &["日期", "1年lpr", "5年lpr", "短期(6个月至1年)", "中长期(5年以上)"];
}

/// 货币供应量（单位：亿元，同比/环比为百分比）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneySupply {
    #[serde(rename = "月份")]
    pub month: String,
    #[serde(rename = "M2(亿)")]
    pub m2: Option<f64>,
    #[serde(rename = "M2同比")]
    pub m2_yoy: Option<f64>,
    #[serde(rename = "M2环比")]
    pub m2_mom: Option<f64>,
    #[serde(rename = "M1(亿)")]
    pub m1: Option<f64>,
    #[serde(rename = "M1同比")]
    pub m1_yoy: Option<f64>,
    #[serde(rename = "M1环比")]
    pub m1_mom: Option<f64>,
    #[serde(rename = "M0(亿)")]
    pub m0: Option<f64>,
    #[serde(rename = "M0同比")]
    pub m0_yoy: Option<f64>,
    #[serde(rename = "M0环比")]
    pub m0_mom: Option<f64>,
}

impl TableRow for MoneySupply {
    const COLUMNS: &'static [&'static str] = &[
        "月份", "M2(亿)", "M2同比", "M2环比", "M1(亿)", "M1同比", "M1环比", "M0(亿)", "M0同比",
        "M0环比",
    ];
}

/// 居民消费价格指数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpiData {
    #[serde(rename = "月份")]
    pub month: String,
    #[serde(rename = "全国")]
    pub national: Option<f64>,
    #[serde(rename = "全国比")]
    pub national_yoy: Option<f64>,
    #[serde(rename = "全国环比")]
    pub national_mom: Option<f64>,
    #[serde(rename = "全国累计")]
    pub national_cumulative: Option<f64>,
    #[serde(rename = "城市")]
    pub urban: Option<f64>,
    #[serde(rename = "城市同比")]
    pub urban_yoy: Option<f64>,
    #[serde(rename = "城市环比")]
    pub urban_mom: Option<f64>,
    #[serde(rename = "城市累计")]
    pub urban_cumulative: Option<f64>,
    #[serde(rename = "农村")]
    pub rural: Option<f64>,
    #[serde(rename = "农村同比")]
    pub rural_yoy: Option<f64>,
    #[serde(rename = "农村环比")]
    pub rural_mom: Option<f64>,
    #[serde(rename = "农村累计")]
    pub rural_cumulative: Option<f64>,
}

impl TableRow for CpiData {
    const COLUMNS: &'static [&'static str] = &[
        "月份", "全国", "全国比", "全国环比", "全国累计", "城市", "城市同比", "城市环比",
        "城市累计", "农村", "农村同比", "农村环比", "农村累计",
    ];
}

/// 国内生产总值（单位：亿元，同比为百分比）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdpData {
    #[serde(rename = "季度")]
    pub quarter: String,
    #[serde(rename = "国内生产总值")]
    pub gdp: Option<f64>,
    #[serde(rename = "同比增长")]
    pub gdp_yoy: Option<f64>,
    #[serde(rename = "第一产业")]
    pub primary: Option<f64>,
    #[serde(rename = "第一产业同比")]
    pub primary_yoy: Option<f64>,
    #[serde(rename = "第二产业")]
    pub secondary: Option<f64>,
    #[serde(rename = "第二产业同比")]
    pub secondary_yoy: Option<f64>,
    #[serde(rename = "第三产业")]
    pub tertiary: Option<f64>,
    #[serde(rename = "第三产业同比")]
    pub tertiary_yoy: Option<f64>,
}

impl TableRow for GdpData {
    const COLUMNS: &'static [&'static str] = &[
        "季度", "国内生产总值", "同比增长", "第一产业", "第一产业同比", "第二产业",
        "第二产业同比", "第三产业", "第三产业同比",
    ];
}

/// 工业品出厂价格指数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpiData {
    #[serde(rename = "月份")]
    pub month: String,
    #[serde(rename = "当月")]
    pub current: Option<f64>,
    #[serde(rename = "当月同比")]
    pub current_yoy: Option<f64>,
    #[serde(rename = "累计")]
    pub cumulative: Option<f64>,
}

impl TableRow for PpiData {
    const COLUMNS: &'static [&'static str] = &["月份", "当月", "当月同比", "累计"];
}

/// 采购经理人指数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmiData {
    #[serde(rename = "月份")]
    pub month: String,
    #[serde(rename = "制造业指数")]
    pub manufacturing: Option<f64>,
    #[serde(rename = "制造业同比")]
    pub manufacturing_yoy: Option<f64>,
    #[serde(rename = "非制造业指数")]
    pub non_manufacturing: Option<f64>,
    #[serde(rename = "非制造业同比")]
    pub non_manufacturing_yoy: Option<f64>,
}

impl TableRow for PmiData {
    const COLUMNS: &'static [&'static str] =
        &["月份", "制造业指数", "制造业同比", "非制造业指数", "非制造业同比"];
}

/// 按指标查询的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MacroTable {
    Lpr(Vec<LprData>),
    MoneySupply(Vec<MoneySupply>),
    Cpi(Vec<CpiData>),
    Gdp(Vec<GdpData>),
    Ppi(Vec<PpiData>),
    Pmi(Vec<PmiData>),
}

impl MacroTable {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            MacroTable::Lpr(_) => LprData::COLUMNS,
            MacroTable::MoneySupply(_) => MoneySupply::COLUMNS,
            MacroTable::Cpi(_) => CpiData::COLUMNS,
            MacroTable::Gdp(_) => GdpData::COLUMNS,
            MacroTable::Ppi(_) => PpiData::COLUMNS,
            MacroTable::Pmi(_) => PmiData::COLUMNS,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MacroTable::Lpr(rows) => rows.len(),
            MacroTable::MoneySupply(rows) => rows.len(),
            MacroTable::Cpi(rows) => rows.len(),
            MacroTable::Gdp(rows) => rows.len(),
            MacroTable::Ppi(rows) => rows.len(),
            MacroTable::Pmi(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 查找表条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupEntry {
    pub label: String,
    pub code: String,
}

impl LookupEntry {
    pub fn new(label: &str, code: &str) -> Self {
        Self {
            label: label.to_string(),
            code: code.to_string(),
        }
    }
}

/// 同业拆借市场
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEntry {
    /// 英文简称
    pub abbr: String,
    /// 中文全称
    pub name: String,
    /// 接口代码
    pub code: String,
}

/// 同业拆借利率查询参数
#[derive(Debug, Deserialize)]
pub struct InterbankQuery {
    /// 市场简称或全称，默认 sh
    pub market: Option<String>,
    /// 币种代码或中文名称，默认 CNY
    pub currency: Option<String>,
    /// 期限，默认 隔夜
    pub period: Option<String>,
}

/// 同业拆借利率汇总查询参数
#[derive(Debug, Deserialize)]
pub struct InterbankSummaryQuery {
    pub market: Option<String>,
    pub currency: Option<String>,
}

/// 宏观指标查询参数
#[derive(Debug, Deserialize)]
pub struct MacroQuery {
    /// lpr / ms / cpi / gdp / ppi / pmi，缺省为 gdp
    pub flag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn keys<T: Serialize>(row: &T) -> Vec<String> {
        match serde_json::to_value(row).unwrap() {
            Value::Object(map) => map.keys().cloned().collect(),
            other => panic!("期望对象，实际为 {}", other),
        }
    }

    fn assert_columns<T: Serialize + TableRow>(row: &T) {
        let mut actual = keys(row);
        let mut expected: Vec<String> = T::COLUMNS.iter().map(|c| c.to_string()).collect();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected);
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serialized_columns_match() {
        assert_columns(&InterbankRate {
            report_date: date(2024, 1, 2),
            rate: Some(1.5),
            change: None,
        });
        assert_columns(&LprData {
            date: date(2024, 1, 22),
            lpr_1y: Some(3.45),
            lpr_5y: Some(4.2),
            short_term_rate: None,
            long_term_rate: None,
        });
        assert_columns(&MoneySupply {
            month: "2024年01月份".into(),
            m2: None, m2_yoy: None, m2_mom: None,
            m1: None, m1_yoy: None, m1_mom: None,
            m0: None, m0_yoy: None, m0_mom: None,
        });
        assert_columns(&CpiData {
            month: "2024年01月份".into(),
            national: None, national_yoy: None, national_mom: None, national_cumulative: None,
            urban: None, urban_yoy: None, urban_mom: None, urban_cumulative: None,
            rural: None, rural_yoy: None, rural_mom: None, rural_cumulative: None,
        });
        assert_columns(&GdpData {
            quarter: "2023年第1季度".into(),
            gdp: None, gdp_yoy: None,
            primary: None, primary_yoy: None,
            secondary: None, secondary_yoy: None,
            tertiary: None, tertiary_yoy: None,
        });
        assert_columns(&PpiData {
            month: "2024年01月份".into(),
            current: None, current_yoy: None, cumulative: None,
        });
        assert_columns(&PmiData {
            month: "2024年01月份".into(),
            manufacturing: None, manufacturing_yoy: None,
            non_manufacturing: None, non_manufacturing_yoy: None,
        });
    }

    #[test]
    fn test_interbank_rate_serialization() {
        let row = InterbankRate {
            report_date: date(2024, 1, 2),
            rate: Some(1.75),
            change: Some(-2.5),
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"报告日": "2024-01-02", "利率": 1.75, "涨跌": -2.5})
        );
    }

    #[test]
    fn test_summary_serialization() {
        let summary = InterbankRateSummary {
            market: "001".into(),
            currency: "CNY".into(),
            periods: vec!["隔夜".into(), "1周".into()],
            rows: vec![
                InterbankSummaryRow { report_date: date(2024, 1, 2), rates: vec![Some(1.5), None] },
                InterbankSummaryRow { report_date: date(2024, 1, 3), rates: vec![Some(1.6), Some(1.8)] },
            ],
        };

        assert_eq!(summary.columns(), vec!["报告日", "隔夜", "1周"]);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["columns"], json!(["报告日", "隔夜", "1周"]));
        assert_eq!(value["rows"][0], json!({"报告日": "2024-01-02", "隔夜": 1.5, "1周": null}));
        assert_eq!(value["rows"][1]["1周"], json!(1.8));
        assert_eq!(value["currency"], json!("CNY"));
    }

    #[test]
    fn test_macro_table_columns() {
        let table = MacroTable::Ppi(vec![]);
        assert_eq!(table.columns(), PpiData::COLUMNS);
        assert!(table.is_empty());
        assert_eq!(serde_json::to_value(&table).unwrap(), json!([]));
    }
}
