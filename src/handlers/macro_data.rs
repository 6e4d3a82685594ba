//! 宏观数据接口处理器
//!
//! ## API 列表
//!
//! ### 指标
//! - GET /macro?flag=gdp - 按指标获取（lpr/ms/cpi/gdp/ppi/pmi，默认 gdp）
//! - GET /macro/lpr - 贷款市场报价利率
//! - GET /macro/money_supply - 货币供应量
//! - GET /macro/cpi - 居民消费价格指数
//! - GET /macro/gdp - 国内生产总值
//! - GET /macro/ppi - 工业品出厂价格指数
//! - GET /macro/pmi - 采购经理人指数
//!
//! ### 同业拆借利率
//! - GET /macro/interbank?market=sh&currency=CNY&period=隔夜 - 单一期限
//! - GET /macro/interbank/summary?market=sh - 全部期限汇总
//!
//! ### 查找表
//! - GET /macro/lookup/markets
//! - GET /macro/lookup/currencies
//! - GET /macro/lookup/periods

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::error::is_lookup_error;
use crate::models::{ApiResponse, InterbankQuery, InterbankSummaryQuery, MacroQuery};
use crate::services::macro_data::{
    list_currencies, list_markets, list_periods, MacroFlag, MacroService,
};

const DEFAULT_MARKET: &str = "sh";
const DEFAULT_CURRENCY: &str = "CNY";
const DEFAULT_PERIOD: &str = "隔夜";

/// 把服务结果转换为统一响应，参数错误返回 400，其余 500
fn respond<T: Serialize>(result: anyhow::Result<T>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data)),
        Err(e) if is_lookup_error(&e) => {
            HttpResponse::BadRequest().json(ApiResponse::<T>::error(e.to_string()))
        }
        Err(e) => {
            log::error!("获取宏观数据失败: {:#}", e);
            HttpResponse::InternalServerError().json(ApiResponse::<T>::error(format!("{:#}", e)))
        }
    }
}

/// 按指标获取宏观数据
///
/// GET /api/v1/macro?flag=cpi
pub async fn get_macro_data(
    service: web::Data<MacroService>,
    query: web::Query<MacroQuery>,
) -> Result<HttpResponse> {
    let flag = match query.flag.as_deref().filter(|f| !f.trim().is_empty()) {
        Some(flag) => match flag.parse::<MacroFlag>() {
            Ok(flag) => Some(flag),
            Err(e) => return Ok(respond::<()>(Err(e.into()))),
        },
        None => None,
    };

    Ok(respond(service.macro_data(flag).await))
}

/// GET /api/v1/macro/lpr
pub async fn get_lpr(service: web::Data<MacroService>) -> Result<HttpResponse> {
    Ok(respond(service.lpr().await))
}

/// GET /api/v1/macro/money_supply
pub async fn get_money_supply(service: web::Data<MacroService>) -> Result<HttpResponse> {
    Ok(respond(service.money_supply().await))
}

/// GET /api/v1/macro/cpi
pub async fn get_cpi(service: web::Data<MacroService>) -> Result<HttpResponse> {
    Ok(respond(service.cpi().await))
}

/// GET /api/v1/macro/gdp
pub async fn get_gdp(service: web::Data<MacroService>) -> Result<HttpResponse> {
    Ok(respond(service.gdp().await))
}

/// GET /api/v1/macro/ppi
pub async fn get_ppi(service: web::Data<MacroService>) -> Result<HttpResponse> {
    Ok(respond(service.ppi().await))
}

/// GET /api/v1/macro/pmi
pub async fn get_pmi(service: web::Data<MacroService>) -> Result<HttpResponse> {
    Ok(respond(service.pmi().await))
}

/// 获取单一期限的同业拆借利率
///
/// GET /api/v1/macro/interbank?market=hk&currency=港元&period=1周
pub async fn get_interbank_rate(
    service: web::Data<MacroService>,
    query: web::Query<InterbankQuery>,
) -> Result<HttpResponse> {
    let market = query.market.as_deref().unwrap_or(DEFAULT_MARKET);
    let currency = query.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    let period = query.period.as_deref().unwrap_or(DEFAULT_PERIOD);

    Ok(respond(service.interbank_rate(market, currency, period).await))
}

/// 获取同业拆借利率汇总
///
/// GET /api/v1/macro/interbank/summary?market=l&currency=GBP
pub async fn get_interbank_summary(
    service: web::Data<MacroService>,
    query: web::Query<InterbankSummaryQuery>,
) -> Result<HttpResponse> {
    let market = query.market.as_deref().unwrap_or(DEFAULT_MARKET);
    let currency = query.currency.as_deref();

    Ok(respond(service.interbank_rate_summary(market, currency).await))
}

/// GET /api/v1/macro/lookup/markets
pub async fn get_markets() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(list_markets())))
}

/// GET /api/v1/macro/lookup/currencies
pub async fn get_currencies() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(list_currencies())))
}

/// GET /api/v1/macro/lookup/periods
pub async fn get_periods() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(list_periods())))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/macro")
            .route("", web::get().to(get_macro_data))
            .route("/lpr", web::get().to(get_lpr))
            .route("/money_supply", web::get().to(get_money_supply))
            .route("/cpi", web::get().to(get_cpi))
            .route("/gdp", web::get().to(get_gdp))
            .route("/ppi", web::get().to(get_ppi))
            .route("/pmi", web::get().to(get_pmi))
            .route("/interbank", web::get().to(get_interbank_rate))
            .route("/interbank/summary", web::get().to(get_interbank_summary))
            .route("/lookup/markets", web::get().to(get_markets))
            .route("/lookup/currencies", web::get().to(get_currencies))
            .route("/lookup/periods", web::get().to(get_periods)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    fn service() -> web::Data<MacroService> {
        web::Data::new(MacroService::new(&ApiConfig::default()).unwrap())
    }

    #[actix_web::test]
    async fn test_lookup_markets() {
        let app = test::init_service(App::new().app_data(service()).configure(config)).await;
        let req = test::TestRequest::get().uri("/macro/lookup/markets").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], Value::Bool(true));
        let markets = body["data"].as_array().unwrap();
        assert_eq!(markets.len(), 6);
        assert_eq!(markets[0]["abbr"], "sh");
        assert_eq!(markets[0]["code"], "001");
    }

    #[actix_web::test]
    async fn test_lookup_periods() {
        let app = test::init_service(App::new().app_data(service()).configure(config)).await;
        let req = test::TestRequest::get().uri("/macro/lookup/periods").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let periods = body["data"].as_array().unwrap();
        assert_eq!(periods.len(), 16);
        assert_eq!(periods[15]["label"], "1年");
        assert_eq!(periods[15]["code"], "301");
    }

    #[actix_web::test]
    async fn test_unknown_market_is_bad_request() {
        let app = test::init_service(App::new().app_data(service()).configure(config)).await;
        let req = test::TestRequest::get()
            .uri("/macro/interbank?market=ny")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["message"], "未知的市场: ny");
    }

    #[actix_web::test]
    async fn test_unknown_summary_currency_is_bad_request() {
        let app = test::init_service(App::new().app_data(service()).configure(config)).await;
        let req = test::TestRequest::get()
            .uri("/macro/interbank/summary?market=s&currency=XYZ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unknown_flag_is_bad_request() {
        let app = test::init_service(App::new().app_data(service()).configure(config)).await;
        let req = test::TestRequest::get().uri("/macro?flag=gnp").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "未知的指标: gnp");
    }
}
