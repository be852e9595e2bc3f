/// 共有エラー型とエラーハンドリング
pub mod errors;

/// 共有データベース接続管理
pub mod database;

/// 共有設定管理
pub mod config;

// 便利な再エクスポート
pub use config::{
    initialize_application, initialize_logging_system, load_environment_variables,
    log_initialization_complete, Environment, EnvironmentConfig, InitializationResult,
};
pub use database::Database;
pub use errors::{AppError, AppResult, ErrorSeverity};
