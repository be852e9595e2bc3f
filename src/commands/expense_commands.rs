use crate::cli::{AddArgs, ListArgs, SummaryArgs};
use crate::commands::prompt::Prompter;
use crate::commands::table::{Align, Table};
use crate::features::expenses::filter::ExpenseFilter;
use crate::features::expenses::models::{format_amount, Expense};
use crate::features::expenses::summary::{self, SpendingSummary, SummaryReport};
use crate::features::expenses::validation::{
    self, parse_filter_date, validate_month, validate_new_expense, validate_top, RawExpenseInput,
};
use crate::features::expenses::repository;
use crate::shared::errors::AppResult;
use colored::Colorize;
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// 絞り込み結果が空の場合のメッセージ
pub const NO_MATCHES: &str = "No matching expenses.";

/// 経費を登録する
///
/// 引数で省略されたカテゴリと金額は入力を促す。
/// `prompt_optional`がtrueの場合は日付と説明も入力を促す（対話メニュー用）。
///
/// # 引数
/// * `conn` - データベース接続
/// * `args` - コマンドライン引数
/// * `prompter` - 端末入出力
/// * `prompt_optional` - 省略可能な項目も入力を促すか
///
/// # 戻り値
/// 保存された経費。入力の途中で終端に達した場合はNone
pub fn add_expense<R: BufRead, W: Write>(
    conn: &Connection,
    args: &AddArgs,
    prompter: &mut Prompter<R, W>,
    prompt_optional: bool,
) -> AppResult<Option<Expense>> {
    let date = match &args.date {
        Some(date) => Some(date.clone()),
        None if prompt_optional => {
            match prompter.ask_optional("Date (YYYY-MM-DD, Enter for today)")? {
                Some(date) => date,
                None => return Ok(None),
            }
        }
        None => None,
    };

    let category = match &args.category {
        Some(category) => category.clone(),
        None => match prompter.ask("Category")? {
            Some(category) => category,
            None => return Ok(None),
        },
    };

    let amount = match &args.amount {
        Some(amount) => amount.clone(),
        None => match prompter.ask("Amount")? {
            Some(amount) => amount,
            None => return Ok(None),
        },
    };

    let description = match &args.description {
        Some(description) => Some(description.clone()),
        None if prompt_optional => match prompter.ask_optional("Optional description")? {
            Some(description) => description,
            None => return Ok(None),
        },
        None => None,
    };

    let input = RawExpenseInput {
        date: date.as_deref(),
        category: &category,
        amount: &amount,
        description: description.as_deref(),
    };
    let draft = validate_new_expense(&input, validation::today())?;
    let expense = repository::create(conn, &draft)?;

    writeln!(
        prompter.output(),
        "{}",
        format!("✅ Saved: {expense}").green()
    )?;

    Ok(Some(expense))
}

/// 引数から絞り込み条件を作成する
pub fn list_filter(args: &ListArgs) -> AppResult<ExpenseFilter> {
    let mut filter = ExpenseFilter::new();

    // 空のカテゴリ指定は指定なしとして扱う
    if let Some(category) = args.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        filter = filter.with_category(category);
    }
    if let Some(text) = &args.from_date {
        filter = filter.with_from_date(parse_filter_date(text, "--from-date")?);
    }
    if let Some(text) = &args.to_date {
        filter = filter.with_to_date(parse_filter_date(text, "--to-date")?);
    }

    filter.validate()?;
    Ok(filter)
}

/// 経費一覧を表示する
///
/// # 戻り値
/// 表示した経費のリスト
pub fn list_expenses<W: Write>(
    conn: &Connection,
    args: &ListArgs,
    out: &mut W,
) -> AppResult<Vec<Expense>> {
    let filter = list_filter(args)?;
    let expenses = repository::find_all(conn, &filter)?;

    if expenses.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
        return Ok(expenses);
    }

    writeln!(out, "{}", expense_table(&expenses).render())?;
    Ok(expenses)
}

fn expense_table(expenses: &[Expense]) -> Table {
    let mut table = Table::new(&[
        ("ID", Align::Right),
        ("Date", Align::Left),
        ("Category", Align::Left),
        ("Amount", Align::Right),
        ("Description", Align::Left),
    ]);

    for expense in expenses {
        table.push_row(vec![
            expense.id.to_string(),
            expense.date.to_string(),
            expense.category.clone(),
            format_amount(&expense.amount),
            expense.description.clone().unwrap_or_default(),
        ]);
    }

    table
}

/// カテゴリ別の集計を表示する
///
/// 月と上位N件の指定は集計の前に検証する。
///
/// # 戻り値
/// 集計レポート
pub fn show_summary<W: Write>(
    conn: &Connection,
    args: &SummaryArgs,
    out: &mut W,
) -> AppResult<SummaryReport> {
    let mut filter = ExpenseFilter::new();
    if let Some(text) = &args.month {
        filter = filter.with_month(validate_month(text)?);
    }
    let top = args.top.map(validate_top).transpose()?;

    let report = summary::summarize(conn, &filter, top)?;

    match &report {
        SummaryReport::NoData => writeln!(out, "{NO_MATCHES}")?,
        SummaryReport::Totals(summary) => render_summary(summary, out)?,
    }

    Ok(report)
}

fn render_summary<W: Write>(summary: &SpendingSummary, out: &mut W) -> AppResult<()> {
    let mut table = Table::new(&[
        ("#", Align::Right),
        ("Category", Align::Left),
        ("Total", Align::Right),
    ]);
    for (rank, entry) in summary.ranked.iter().enumerate() {
        table.push_row(vec![
            (rank + 1).to_string(),
            entry.category.clone(),
            format_amount(&entry.total),
        ]);
    }

    writeln!(out, "{}", table.render())?;
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("Grand total: {}", format_amount(&summary.grand_total)).cyan()
    )?;
    writeln!(
        out,
        "{}",
        format!(
            "Highest spending category: {} ({})",
            summary.top_category.category,
            format_amount(&summary.top_category.total)
        )
        .yellow()
    )?;

    Ok(())
}
