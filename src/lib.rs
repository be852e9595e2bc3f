pub mod cli;
pub mod commands;
pub mod features;
pub mod shared;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use commands::prompt::Prompter;
use shared::{
    initialize_application, initialize_logging_system, load_environment_variables,
    log_initialization_complete, AppResult, Database,
};
use std::io;
use std::process::ExitCode;

/// アプリケーションを実行する
///
/// 成功時は0、入力エラーは2、それ以外の失敗は1を終了コードとして返す。
pub fn run() -> ExitCode {
    // 環境変数を読み込み（.envファイルがある場合）
    load_environment_variables();

    // ログシステムを初期化
    initialize_logging_system();

    let cli = Cli::parse();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.log();
            eprintln!("{}", format!("❌ {}", e.user_message()).red());
            ExitCode::from(e.exit_code())
        }
    }
}

fn execute(cli: Cli) -> AppResult<()> {
    let init_result = initialize_application(cli.database.as_deref())?;
    log_initialization_complete(&init_result);

    // ストレージハンドルはこの関数を抜ける時点で解放される
    let db = Database::open(&init_result.database_path)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());

    commands::dispatch(&db, &init_result.database_path, cli.command, &mut prompter)
}
