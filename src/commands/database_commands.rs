use crate::cli::InitDbArgs;
use crate::features::expenses::seed;
use crate::shared::errors::AppResult;
use colored::Colorize;
use rusqlite::Connection;
use std::io::Write;
use std::path::Path;

/// 経費テーブルを初期化する
///
/// 既存のレコードはすべて削除される。
///
/// # 引数
/// * `conn` - データベース接続
/// * `database_path` - 表示用のデータベースファイルパス
/// * `args` - コマンドライン引数
/// * `out` - 出力先
///
/// # 戻り値
/// 投入したサンプルデータの件数
pub fn init_database<W: Write>(
    conn: &Connection,
    database_path: &Path,
    args: &InitDbArgs,
    out: &mut W,
) -> AppResult<usize> {
    let inserted = seed::initialize_expenses(conn, !args.no_seed)?;

    if !args.no_seed {
        writeln!(
            out,
            "{}",
            format!("✅ Inserted {inserted} sample expenses.").green()
        )?;
    }
    writeln!(out, "📂 Database initialised at {}", database_path.display())?;

    Ok(inserted)
}
