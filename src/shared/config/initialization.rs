use crate::shared::config::environment::{get_database_filename, get_environment, Environment};
use crate::shared::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// データベースパスを指定する環境変数名
pub const DATABASE_PATH_ENV: &str = "EXPENSES_DB_PATH";

/// アプリケーションデータディレクトリ名
const APP_DIR_NAME: &str = "expense-tracker";

/// アプリケーション初期化の結果を表す構造体
#[derive(Debug)]
pub struct InitializationResult {
    /// 初回起動かどうか（データベースファイルが存在しなかった）
    pub is_first_run: bool,
    /// データベースファイルのパス
    pub database_path: PathBuf,
    /// 実行環境
    pub environment: Environment,
}

/// ストレージの場所を決定し、必要なディレクトリを作成する
///
/// # 引数
/// * `explicit_path` - コマンドラインで指定されたデータベースパス（オプション）
///
/// # 戻り値
/// 初期化結果、または失敗時はエラー
///
/// # 優先順位
/// 1. コマンドライン引数 `--database`
/// 2. 環境変数 `EXPENSES_DB_PATH`
/// 3. プラットフォームのデータディレクトリ配下の環境別ファイル
pub fn initialize_application(explicit_path: Option<&Path>) -> AppResult<InitializationResult> {
    let environment = get_environment();

    let env_path = std::env::var_os(DATABASE_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    let database_path = match explicit_path.map(Path::to_path_buf).or(env_path) {
        Some(path) => path,
        None => default_database_path(environment)?,
    };

    ensure_parent_directory(&database_path)?;

    let is_first_run = !database_path.exists();
    if is_first_run {
        log::info!("初回起動: データベースファイルを作成します: {database_path:?}");
    }

    Ok(InitializationResult {
        is_first_run,
        database_path,
        environment,
    })
}

/// プラットフォームのデータディレクトリ配下のデフォルトパスを取得する
fn default_database_path(environment: Environment) -> AppResult<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        AppError::configuration(format!(
            "Could not determine a data directory; set {DATABASE_PATH_ENV} or pass --database."
        ))
    })?;

    Ok(data_dir
        .join(APP_DIR_NAME)
        .join(get_database_filename(environment)))
}

/// データベースファイルの親ディレクトリを確実に作成する
fn ensure_parent_directory(database_path: &Path) -> AppResult<()> {
    let Some(parent) = database_path.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    fs::create_dir_all(parent).map_err(|e| {
        AppError::configuration(format!(
            "Could not create data directory {}: {e}",
            parent.display()
        ))
    })?;
    log::info!("データディレクトリを作成しました: {parent:?}");

    Ok(())
}

/// 初期化完了ログを出力する
pub fn log_initialization_complete(result: &InitializationResult) {
    if result.is_first_run {
        log::info!("初回起動の初期化が完了しました");
    } else {
        log::debug!("既存データベースを使用します");
    }
    log::debug!(
        "環境: {:?}, データベース: {:?}",
        result.environment,
        result.database_path
    );
}
