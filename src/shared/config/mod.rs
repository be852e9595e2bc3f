/// 環境設定関連のモジュール
pub mod environment;

/// 起動時の初期化（ストレージの場所の決定）
pub mod initialization;

// 便利な再エクスポート
pub use environment::{
    get_database_filename, get_environment, initialize_logging_system,
    load_environment_variables, Environment, EnvironmentConfig,
};
pub use initialization::{
    initialize_application, log_initialization_complete, InitializationResult, DATABASE_PATH_ENV,
};
