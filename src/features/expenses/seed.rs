use crate::features::expenses::models::NewExpense;
use crate::features::expenses::repository;
use crate::shared::database::{in_transaction, reset_schema};
use crate::shared::errors::AppResult;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// サンプル経費データ（日付, カテゴリ, 金額(セント), 説明）
const SAMPLE_ROWS: [((i32, u32, u32), &str, i64, &str); 5] = [
    ((2025, 7, 15), "food", 1250, "Lunch burrito"),
    ((2025, 7, 16), "transport", 340, "Bus fare"),
    ((2025, 7, 17), "groceries", 3210, "Weekly veggies"),
    ((2025, 7, 18), "entertain", 1500, "Movie night"),
    ((2025, 7, 19), "coffee", 280, "Flat white"),
];

/// サンプル経費データを取得する
///
/// 未来日チェックは行わない（固定の日付を持つデータのため）。
pub fn sample_expenses() -> Vec<NewExpense> {
    SAMPLE_ROWS
        .iter()
        .filter_map(|&((year, month, day), category, cents, description)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| {
                NewExpense::new(date, category, Decimal::new(cents, 2), Some(description))
            })
        })
        .collect()
}

/// 経費テーブルを初期化する
///
/// テーブルを作り直し、`with_samples`がtrueの場合はサンプルデータを投入する。
/// 全体が1つのトランザクションで実行され、失敗した場合は元の状態に戻る。
///
/// # 引数
/// * `conn` - データベース接続
/// * `with_samples` - サンプルデータを投入するか
///
/// # 戻り値
/// 投入したサンプルデータの件数
pub fn initialize_expenses(conn: &Connection, with_samples: bool) -> AppResult<usize> {
    let inserted = in_transaction(conn, |tx| {
        reset_schema(tx)?;

        if !with_samples {
            return Ok(0);
        }

        let created = repository::insert_all(tx, &sample_expenses())?;
        Ok(created.len())
    })?;

    log::info!("経費テーブルを初期化しました: サンプル件数={inserted}");

    Ok(inserted)
}
