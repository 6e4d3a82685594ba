//! 宏观经济数据后端服务
//!
//! 提供中国宏观经济指标的 RESTful API 服务
//! 数据来源：东方财富数据中心（同业拆借利率、LPR、货币供应量、CPI、GDP、PPI、PMI）

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::io;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::macro_data::MacroService;

/// 应用程序入口
///
/// 加载配置后启动 HTTP 服务器，默认监听 0.0.0.0:8080
#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::load()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    // RUST_LOG 优先，其次使用配置文件中的日志级别
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &config.source {
        Some(path) => log::info!("从 {} 加载配置成功", path),
        None => log::info!("使用默认配置"),
    }
    if config.api.api_key.is_empty() {
        log::warn!("未设置 API Key，接口不做认证");
    }

    let service = MacroService::new(&config.api)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let service = web::Data::new(service);
    let api_key = config.api.api_key.clone();

    log::info!("启动宏观经济数据服务，监听 {}", config.bind_addr());

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 请求日志
            .wrap(ApiKeyMiddleware::new(api_key.clone()))  // API Key 认证
            .app_data(service.clone())
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.bind_addr())?.run().await
}
