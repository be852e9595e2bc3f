/// コマンドハンドラー
///
/// コマンドライン引数を検証層・データベース操作に渡し、結果を端末向けのテキストに整形する。
pub mod database_commands;
pub mod expense_commands;
pub mod menu;
pub mod prompt;
pub mod table;

use crate::cli::Commands;
use crate::shared::database::Database;
use crate::shared::errors::AppResult;
use colored::Colorize;
use prompt::Prompter;
use std::io::{BufRead, Write};
use std::path::Path;

/// サブコマンドを実行する（省略時は対話メニュー）
///
/// # 引数
/// * `db` - ストレージハンドル
/// * `database_path` - データベースファイルのパス
/// * `command` - 実行するサブコマンド
/// * `prompter` - 端末入出力
pub fn dispatch<R: BufRead, W: Write>(
    db: &Database,
    database_path: &Path,
    command: Option<Commands>,
    prompter: &mut Prompter<R, W>,
) -> AppResult<()> {
    let conn = db.connection();

    match command {
        None => menu::run_menu(conn, prompter),
        Some(Commands::Add(args)) => {
            if expense_commands::add_expense(conn, &args, prompter, false)?.is_none() {
                writeln!(prompter.output(), "{}", "Aborted.".yellow())?;
            }
            Ok(())
        }
        Some(Commands::List(args)) => {
            expense_commands::list_expenses(conn, &args, prompter.output()).map(|_| ())
        }
        Some(Commands::Summary(args)) => {
            expense_commands::show_summary(conn, &args, prompter.output()).map(|_| ())
        }
        Some(Commands::InitDb(args)) => {
            database_commands::init_database(conn, database_path, &args, prompter.output())
                .map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, ListArgs};
    use clap::Parser;
    use std::io::Cursor;

    fn run(db: &Database, args: &[&str], input: &str) -> AppResult<String> {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut prompter = Prompter::new(Cursor::new(input.to_string()), Vec::new());
        dispatch(db, Path::new(":memory:"), cli.command, &mut prompter)?;
        Ok(String::from_utf8(prompter.into_output()).unwrap())
    }

    #[test]
    fn test_dispatch_end_to_end() {
        let db = Database::open_in_memory().unwrap();

        let output = run(&db, &["tracker", "init-db"], "").unwrap();
        assert!(output.contains("Inserted 5 sample expenses."));

        let output = run(&db, &["tracker", "list", "-c", "FOOD"], "").unwrap();
        assert!(output.contains("Lunch burrito"));
        assert!(!output.contains("Bus fare"));

        let output = run(&db, &["tracker", "summary", "-m", "2025-07", "-n", "2"], "").unwrap();
        assert!(output.contains("1  groceries  32.10"));
        assert!(output.contains("Grand total: 65.80"));

        let output = run(&db, &["tracker", "add", "-d", "2025-07-20", "-a", "3"], "coffee\n").unwrap();
        assert!(output.contains("2025-07-20 | coffee | 3.00"));
    }

    #[test]
    fn test_dispatch_reports_invalid_input() {
        let db = Database::open_in_memory().unwrap();

        let error = run(&db, &["tracker", "summary", "-n", "-1"], "").unwrap_err();
        assert_eq!(error.exit_code(), 2);

        let error = run(&db, &["tracker", "add", "-c", "food", "-a", "abc"], "").unwrap_err();
        assert_eq!(error.user_message(), "Amount must be a valid number.");
    }

    #[test]
    fn test_dispatch_add_aborted() {
        let db = Database::open_in_memory().unwrap();

        let output = run(&db, &["tracker", "add", "-c", "food"], "").unwrap();

        assert!(output.contains("Aborted."));
        let mut out = Vec::new();
        expense_commands::list_expenses(db.connection(), &ListArgs::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No matching expenses.\n");
    }
}
