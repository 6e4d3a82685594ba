//! 查找表
//!
//! 市场、币种、期限、指标的中文标签到东方财富接口代码的映射

use std::fmt;
use std::str::FromStr;

use crate::error::MacroError;
use crate::models::{LookupEntry, MarketEntry};

/// 同业拆借市场：(简称, 全称, 代码)
pub const MARKETS: &[(&str, &str, &str)] = &[
    ("sh", "上海银行同业拆借市场", "001"),
    ("ch", "中国银行同业拆借市场", "002"),
    ("l", "伦敦银行同业拆借市场", "003"),
    ("eu", "欧洲银行同业拆借市场", "004"),
    ("hk", "香港银行同业拆借市场", "005"),
    ("s", "新加坡银行同业拆借市场", "006"),
];

/// 币种中文名称
pub const CURRENCY_NAMES: &[(&str, &str)] = &[
    ("人民币", "CNY"),
    ("英镑", "GBP"),
    ("欧元", "EUR"),
    ("美元", "USD"),
    ("港币", "HKD"),
    ("港元", "HKD"),
    ("星元", "SGD"),
    ("新元", "SGD"),
];

/// 接口接受的币种代码，CNH 仅用于香港市场的离岸人民币
pub const CURRENCY_CODES: &[&str] = &["CNY", "GBP", "EUR", "USD", "HKD", "SGD", "CNH"];

/// 拆借期限
pub const PERIODS: &[(&str, &str)] = &[
    ("隔夜", "001"),
    ("1周", "101"),
    ("2周", "102"),
    ("3周", "103"),
    ("1月", "201"),
    ("2月", "202"),
    ("3月", "203"),
    ("4月", "204"),
    ("5月", "205"),
    ("6月", "206"),
    ("7月", "207"),
    ("8月", "208"),
    ("9月", "209"),
    ("10月", "210"),
    ("11月", "211"),
    ("1年", "301"),
];

pub const CHINA: &str = "002";
pub const LONDON: &str = "003";
pub const EURO: &str = "004";
pub const HONG_KONG: &str = "005";
pub const SINGAPORE: &str = "006";

/// 市场代码
///
/// 英文简称不区分大小写，也接受中文全称
pub fn market_code(label: &str) -> Result<&'static str, MacroError> {
    let label = label.trim();
    let key = if label.is_ascii() {
        label.to_ascii_lowercase()
    } else {
        label.to_string()
    };

    MARKETS
        .iter()
        .find(|(abbr, name, _)| *abbr == key || *name == key)
        .map(|(_, _, code)| *code)
        .ok_or_else(|| MacroError::unknown("市场", label))
}

/// 币种代码
///
/// ASCII 标签按代码处理（不区分大小写），其余按中文名称查找
pub fn currency_code(label: &str) -> Result<&'static str, MacroError> {
    let label = label.trim();

    if label.chars().all(|c| c.is_ascii_alphabetic()) && !label.is_empty() {
        let upper = label.to_ascii_uppercase();
        return CURRENCY_CODES
            .iter()
            .find(|code| **code == upper)
            .copied()
            .ok_or_else(|| MacroError::unknown("币种", label));
    }

    CURRENCY_NAMES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, code)| *code)
        .ok_or_else(|| MacroError::unknown("币种", label))
}

/// 期限代码
pub fn period_code(label: &str) -> Result<&'static str, MacroError> {
    let label = label.trim();
    PERIODS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, code)| *code)
        .ok_or_else(|| MacroError::unknown("期限", label))
}

/// 香港市场的人民币报价实际为离岸人民币
pub fn upstream_currency(market: &str, currency: &'static str) -> &'static str {
    if market == HONG_KONG && currency == "CNY" {
        "CNH"
    } else {
        currency
    }
}

/// 拆借利率汇总时各市场的固定币种和期限列表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketProfile {
    /// 强制使用的币种，None 表示由调用方决定
    pub currency: Option<&'static str>,
    pub periods: &'static [&'static str],
}

pub fn market_profile(market: &str) -> MarketProfile {
    match market {
        CHINA => MarketProfile {
            currency: Some("CNY"),
            periods: &[
                "隔夜", "1周", "2周", "3周", "1月", "2月", "3月", "4月", "6月", "9月", "1年",
            ],
        },
        EURO => MarketProfile {
            currency: Some("EUR"),
            periods: &[
                "1周", "2周", "3周", "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月",
                "9月", "10月", "11月", "1年",
            ],
        },
        LONDON => MarketProfile {
            currency: None,
            periods: &["隔夜", "1周", "1月", "2月", "3月", "8月"],
        },
        HONG_KONG => MarketProfile {
            currency: None,
            periods: &[
                "隔夜", "1周", "2周", "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月",
                "9月", "10月", "11月", "1年",
            ],
        },
        SINGAPORE => MarketProfile {
            currency: None,
            periods: &["1月", "2月", "3月", "6月", "9月", "1年"],
        },
        _ => MarketProfile {
            currency: Some("CNY"),
            periods: &["隔夜", "1周", "2周", "1月", "3月", "6月", "9月", "1年"],
        },
    }
}

/// 宏观指标，未指定时默认 GDP
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MacroFlag {
    Lpr,
    MoneySupply,
    Cpi,
    #[default]
    Gdp,
    Ppi,
    Pmi,
}

impl MacroFlag {
    pub const ALL: [MacroFlag; 6] = [
        MacroFlag::Lpr,
        MacroFlag::MoneySupply,
        MacroFlag::Cpi,
        MacroFlag::Gdp,
        MacroFlag::Ppi,
        MacroFlag::Pmi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroFlag::Lpr => "lpr",
            MacroFlag::MoneySupply => "ms",
            MacroFlag::Cpi => "cpi",
            MacroFlag::Gdp => "gdp",
            MacroFlag::Ppi => "ppi",
            MacroFlag::Pmi => "pmi",
        }
    }
}

impl fmt::Display for MacroFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MacroFlag {
    type Err = MacroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        MacroFlag::ALL
            .into_iter()
            .find(|flag| flag.as_str() == key)
            .ok_or_else(|| MacroError::unknown("指标", s.trim()))
    }
}

pub fn list_markets() -> Vec<MarketEntry> {
    MARKETS
        .iter()
        .map(|(abbr, name, code)| MarketEntry {
            abbr: abbr.to_string(),
            name: name.to_string(),
            code: code.to_string(),
        })
        .collect()
}

pub fn list_currencies() -> Vec<LookupEntry> {
    CURRENCY_NAMES
        .iter()
        .map(|(label, code)| LookupEntry::new(label, code))
        .chain(CURRENCY_CODES.iter().map(|code| LookupEntry::new(code, code)))
        .collect()
}

pub fn list_periods() -> Vec<LookupEntry> {
    PERIODS
        .iter()
        .map(|(label, code)| LookupEntry::new(label, code))
        .collect()
}
