//! 宏观经济数据服务
//!
//! 从东方财富数据中心获取中国宏观经济指标，并整理为列名固定的表格
//!
//! ## 数据来源
//! - datacenter-web.eastmoney.com：银行间同业拆借利率
//! - datacenter.eastmoney.com：贷款市场报价利率（LPR）
//! - datainterface.eastmoney.com：货币供应量、CPI、GDP、PPI、PMI
//!
//! ## 处理流程
//! 标签 → 查找表 → 请求描述 → 顺序获取（含分页） → 解析 → 列名/类型整理 → 排序

mod common;
mod fetch;
mod indicators;
mod interbank;
mod lenient;
mod lookup;
mod lpr;

pub use common::get_beijing_time;
pub use fetch::MacroService;
pub use lookup::{list_currencies, list_markets, list_periods, MacroFlag};
