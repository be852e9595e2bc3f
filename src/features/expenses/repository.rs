use crate::features::expenses::filter::ExpenseFilter;
use crate::features::expenses::models::{add_amounts, Expense, NewExpense};
use crate::shared::database::connection::in_transaction;
use crate::shared::errors::AppResult;
use rusqlite::types::Type;
use rusqlite::{named_params, params, Connection, Row};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

/// 絞り込み条件つきの検索SQL（条件が未指定の場合はNULLが渡され、その述語は常に真になる）
const FILTERED_SELECT: &str = "SELECT id, date, category, amount, description
     FROM expenses
     WHERE (:category IS NULL OR category = :category COLLATE NOCASE)
       AND (:from_date IS NULL OR date >= :from_date)
       AND (:to_date IS NULL OR date <= :to_date)";

/// 経費を作成する
///
/// 挿入と読み戻しを1つのトランザクションで行う。
/// 失敗した場合はロールバックされ、部分的なレコードは残らない。
///
/// # 引数
/// * `conn` - データベース接続
/// * `draft` - 検証済みの経費下書き
///
/// # 戻り値
/// 採番されたIDを含む保存済みの経費、または失敗時はエラー
pub fn create(conn: &Connection, draft: &NewExpense) -> AppResult<Expense> {
    let expense = in_transaction(conn, |tx| insert(tx, draft))?;

    log::info!("経費を作成しました: id={}", expense.id);

    Ok(expense)
}

/// 複数の経費をまとめて作成する（全件成功するか、1件も保存されないか）
pub fn create_many(conn: &Connection, drafts: &[NewExpense]) -> AppResult<Vec<Expense>> {
    let expenses = in_transaction(conn, |tx| insert_all(tx, drafts))?;

    log::info!("{}件の経費を作成しました", expenses.len());

    Ok(expenses)
}

/// トランザクション内で複数の経費を挿入する
///
/// 呼び出し側がトランザクションを管理する場合に使用する。
pub(crate) fn insert_all(conn: &Connection, drafts: &[NewExpense]) -> AppResult<Vec<Expense>> {
    drafts.iter().map(|draft| insert(conn, draft)).collect()
}

fn insert(conn: &Connection, draft: &NewExpense) -> AppResult<Expense> {
    conn.execute(
        "INSERT INTO expenses (date, category, amount, description)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            draft.date,
            draft.category,
            draft.amount.to_string(),
            draft.description
        ],
    )?;

    let id = conn.last_insert_rowid();
    find_by_id(conn, id)
}

/// IDで経費を取得する
pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Expense> {
    let expense = conn.query_row(
        "SELECT id, date, category, amount, description FROM expenses WHERE id = ?1",
        params![id],
        map_expense_row,
    )?;

    Ok(expense)
}

/// 経費一覧を取得する（絞り込み条件つき）
///
/// # 引数
/// * `conn` - データベース接続
/// * `filter` - 絞り込み条件（検証に失敗した場合は検索せずに入力エラーを返す）
///
/// # 戻り値
/// 日付の降順、同じ日付の中ではIDの降順（新しく登録したもの順）に並んだ経費のリスト
pub fn find_all(conn: &Connection, filter: &ExpenseFilter) -> AppResult<Vec<Expense>> {
    filter.validate()?;

    let sql = format!("{FILTERED_SELECT} ORDER BY date DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;

    let (from_date, to_date) = filter.date_bounds();
    let expenses = stmt
        .query_map(
            named_params! {
                ":category": filter.category,
                ":from_date": from_date,
                ":to_date": to_date,
            },
            map_expense_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "経費を検索しました: filter={:?}, 件数={}",
        filter,
        expenses.len()
    );

    Ok(expenses)
}

/// カテゴリ別の合計金額を取得する
///
/// 絞り込んだレコードの金額をカテゴリ（大文字小文字を区別）ごとに10進数で合計する。
/// 結果は「絞り込み後にメモリ上でグループ化して合計した値」と常に一致する。
///
/// # 戻り値
/// カテゴリ名から合計金額へのマップ（対象レコードがない場合は空）。
/// 合計が`Decimal`の範囲を超える場合は入力エラー
pub fn aggregate(conn: &Connection, filter: &ExpenseFilter) -> AppResult<BTreeMap<String, Decimal>> {
    filter.validate()?;

    let mut stmt = conn.prepare(FILTERED_SELECT)?;

    let (from_date, to_date) = filter.date_bounds();
    let mut rows = stmt.query(named_params! {
        ":category": filter.category,
        ":from_date": from_date,
        ":to_date": to_date,
    })?;

    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut record_count = 0usize;
    while let Some(row) = rows.next()? {
        let expense = map_expense_row(row)?;
        let total = totals.entry(expense.category).or_insert(Decimal::ZERO);
        *total = add_amounts(*total, expense.amount)?;
        record_count += 1;
    }

    log::debug!(
        "カテゴリ別に集計しました: 絞り込み={}, レコード数={}, カテゴリ数={}",
        !filter.is_empty(),
        record_count,
        totals.len()
    );

    Ok(totals)
}

/// 経費の総件数を取得する
pub fn count(conn: &Connection) -> AppResult<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
    Ok(count)
}

/// 行データを経費モデルに変換する
///
/// 金額は10進数文字列として保存されているため、ここで`Decimal`に変換する。
fn map_expense_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let amount_text: String = row.get(3)?;
    let amount = Decimal::from_str(&amount_text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        category: row.get(2)?,
        amount,
        description: row.get(4)?,
    })
}
