/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

impl Environment {
    /// 環境名の文字列から実行環境を判定する（"production"以外は開発環境）
    fn from_name(name: &str) -> Self {
        match name {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: Environment,
    /// ログレベル
    pub log_level: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    ///
    /// # 戻り値
    /// 環境設定
    pub fn from_env() -> Self {
        let environment = get_environment();
        let log_level = std::env::var("LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level(environment).to_string());

        Self {
            environment,
            log_level,
        }
    }

    /// ログレベル文字列を`log::LevelFilter`に変換する
    ///
    /// 不明な値の場合は環境ごとのデフォルトを使用する。
    pub fn level_filter(&self) -> log::LevelFilter {
        parse_level_filter(&self.log_level)
            .or_else(|| parse_level_filter(default_log_level(self.environment)))
            .unwrap_or(log::LevelFilter::Warn)
    }
}

/// 環境ごとのデフォルトログレベル
fn default_log_level(environment: Environment) -> &'static str {
    match environment {
        Environment::Development => "info",
        Environment::Production => "warn",
    }
}

fn parse_level_filter(level: &str) -> Option<log::LevelFilter> {
    match level.to_lowercase().as_str() {
        "off" => Some(log::LevelFilter::Off),
        "error" => Some(log::LevelFilter::Error),
        "warn" => Some(log::LevelFilter::Warn),
        "info" => Some(log::LevelFilter::Info),
        "debug" => Some(log::LevelFilter::Debug),
        "trace" => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

/// 現在の実行環境を判定する
///
/// # 戻り値
/// 現在の実行環境（Development または Production）
///
/// # 判定ロジック
/// 1. コンパイル時埋め込み環境変数を最優先
/// 2. 実行時環境変数 ENVIRONMENT を確認
/// 3. デバッグビルドの場合は Development
/// 4. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    // コンパイル時埋め込み環境変数を最優先
    if let Some(embedded_env) = option_env!("EMBEDDED_ENVIRONMENT") {
        let env = Environment::from_name(embedded_env);
        log::debug!("環境判定: コンパイル時埋め込み値を使用 -> {embedded_env} -> {env:?}");
        return env;
    }

    // 実行時環境変数を確認
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = Environment::from_name(&env_var);
        log::debug!("環境判定: 実行時環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    // フォールバック: ビルド設定に基づく判定
    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "環境判定: ビルド設定を使用 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

/// 環境に応じたデータベースファイル名を取得する
///
/// # ファイル名の規則
/// - 開発環境: "dev_expenses.db"
/// - プロダクション環境: "expenses.db"
pub fn get_database_filename(env: Environment) -> &'static str {
    match env {
        Environment::Development => "dev_expenses.db",
        Environment::Production => "expenses.db",
    }
}

/// 環境に応じた.envファイルを読み込む
///
/// # 処理内容
/// 1. コンパイル時埋め込み環境変数をチェック
/// 2. 環境に応じた.envファイルを読み込み
/// 3. 見つからない場合はデフォルトの.envを試行
pub fn load_environment_variables() {
    if option_env!("EMBEDDED_ENVIRONMENT").is_some() {
        // プロダクションビルドでも.env.productionは読み込む（データベースパス指定のため）
        let _ = dotenv::from_filename(".env.production");
        return;
    }

    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let env_file = match environment.as_str() {
        "production" => ".env.production",
        _ => ".env",
    };

    // ロガー初期化前に呼ばれるため、結果は戻り値ではなく後続のログで確認する
    if dotenv::from_filename(env_file).is_err() && env_file != ".env" {
        let _ = dotenv::dotenv();
    }
}

/// ログシステムを初期化する
///
/// # 処理内容
/// 1. 環境設定を取得
/// 2. ログレベルを設定
/// 3. env_loggerを初期化（出力先は標準エラー）
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();

    // 二重初期化はエラーになるため`try_init`を使用する
    let _ = env_logger::Builder::from_default_env()
        .filter_level(env_config.level_filter())
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .try_init();

    log::debug!(
        "ログシステムを初期化しました: level={}, environment={:?}",
        env_config.log_level,
        env_config.environment
    );
}
