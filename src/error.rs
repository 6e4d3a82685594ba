//! 错误类型
//!
//! 服务层统一使用 anyhow，只有需要在 HTTP 层区分处理的错误才定义为具体类型

use thiserror::Error;

/// 宏观数据查询错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MacroError {
    /// 查找表中不存在的标签（市场、币种、期限、指标）
    #[error("未知的{table}: {label}")]
    UnknownLabel { table: &'static str, label: String },
}

impl MacroError {
    pub fn unknown(table: &'static str, label: impl Into<String>) -> Self {
        Self::UnknownLabel {
            table,
            label: label.into(),
        }
    }
}

/// 判断 anyhow 错误是否来自非法的查询参数
pub fn is_lookup_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<MacroError>().is_some()
}
