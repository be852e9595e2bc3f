use crate::cli::{AddArgs, ListArgs, SummaryArgs};
use crate::commands::expense_commands::{add_expense, list_expenses, show_summary};
use crate::commands::prompt::Prompter;
use crate::features::expenses::validation::parse_top;
use crate::shared::errors::{AppError, AppResult};
use colored::Colorize;
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// メニュー項目の実行結果
enum Flow {
    Continue,
    /// 入力が終端に達した
    EndOfInput,
}

/// 対話メニューを実行する
///
/// 入力エラーやストレージエラーはメッセージを表示してメニューに戻る。
/// 端末の入出力エラーのみ呼び出し元に返す。
pub fn run_menu<R: BufRead, W: Write>(
    conn: &Connection,
    prompter: &mut Prompter<R, W>,
) -> AppResult<()> {
    log::debug!("対話メニューを開始します");

    loop {
        let out = prompter.output();
        writeln!(out)?;
        writeln!(out, "===== Personal Expense Tracker =====")?;
        writeln!(out, "1) Add expense")?;
        writeln!(out, "2) List expenses")?;
        writeln!(out, "3) Summary")?;
        writeln!(out, "4) Exit")?;

        let Some(choice) = prompter.ask("Select an option")? else {
            writeln!(prompter.output(), "Aborted.")?;
            return Ok(());
        };

        let result = match choice.trim() {
            "1" => add_from_menu(conn, prompter),
            "2" => list_from_menu(conn, prompter),
            "3" => summary_from_menu(conn, prompter),
            "4" => {
                writeln!(prompter.output(), "Goodbye!")?;
                return Ok(());
            }
            _ => {
                writeln!(prompter.output(), "Invalid choice, try again.")?;
                continue;
            }
        };

        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::EndOfInput) => {
                writeln!(prompter.output(), "Aborted.")?;
                return Ok(());
            }
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => {
                e.log();
                writeln!(
                    prompter.output(),
                    "{}",
                    format!("❌ {}", e.user_message()).red()
                )?;
            }
        }
    }
}

fn add_from_menu<R: BufRead, W: Write>(
    conn: &Connection,
    prompter: &mut Prompter<R, W>,
) -> AppResult<Flow> {
    match add_expense(conn, &AddArgs::default(), prompter, true)? {
        Some(_) => Ok(Flow::Continue),
        None => Ok(Flow::EndOfInput),
    }
}

fn list_from_menu<R: BufRead, W: Write>(
    conn: &Connection,
    prompter: &mut Prompter<R, W>,
) -> AppResult<Flow> {
    let Some(category) = prompter.ask_optional("Category (Enter for all)")? else {
        return Ok(Flow::EndOfInput);
    };
    let Some(from_date) = prompter.ask_optional("From date (YYYY-MM-DD, Enter to skip)")? else {
        return Ok(Flow::EndOfInput);
    };
    let Some(to_date) = prompter.ask_optional("To date (YYYY-MM-DD, Enter to skip)")? else {
        return Ok(Flow::EndOfInput);
    };

    let args = ListArgs {
        category,
        from_date,
        to_date,
    };
    list_expenses(conn, &args, prompter.output())?;

    Ok(Flow::Continue)
}

fn summary_from_menu<R: BufRead, W: Write>(
    conn: &Connection,
    prompter: &mut Prompter<R, W>,
) -> AppResult<Flow> {
    let Some(month) = prompter.ask_optional("Month (YYYY-MM or name, Enter for all)")? else {
        return Ok(Flow::EndOfInput);
    };
    let Some(top) = prompter.ask_optional("Top N categories (Enter for all)")? else {
        return Ok(Flow::EndOfInput);
    };

    let top = top
        .map(|text| parse_top(&text))
        .transpose()?
        .map(|n| i64::try_from(n.get()).unwrap_or(i64::MAX));

    show_summary(conn, &SummaryArgs { month, top }, prompter.output())?;

    Ok(Flow::Continue)
}
