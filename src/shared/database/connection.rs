use crate::shared::errors::AppResult;
use rusqlite::Connection;
use std::path::Path;

/// ストレージハンドル
///
/// プロセス起動時に一度だけ構築し、各操作へ参照で渡す。
/// 接続はこの構造体がドロップされた時点で（成功・失敗どちらの経路でも）解放される。
pub struct Database {
    conn: Connection,
}

impl Database {
    /// ファイルベースのデータベースを開き、テーブルを作成する
    ///
    /// # 引数
    /// * `database_path` - データベースファイルのパス（存在しない場合は作成される）
    ///
    /// # 戻り値
    /// ストレージハンドル、または失敗時はエラー
    pub fn open(database_path: &Path) -> AppResult<Self> {
        let conn = Connection::open(database_path)?;
        create_tables(&conn)?;

        log::debug!("データベースを開きました: {database_path:?}");

        Ok(Self { conn })
    }

    /// インメモリデータベースを開き、テーブルを作成する（テスト・一時利用向け）
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// 内部の接続への参照を取得
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// データベーステーブルを作成する
///
/// 何度呼んでも同じ結果になる（既存のテーブルとインデックスはそのまま）。
///
/// # 制約
/// 金額・カテゴリ・説明の不変条件はCHECK制約としてストレージ側でも保証する。
/// 日付は検証層でのみ未来日をチェックする（シードデータの投入を許可するため）。
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            category TEXT NOT NULL
                CHECK (length(trim(category)) > 0 AND length(category) <= 50),
            amount TEXT NOT NULL
                CHECK (CAST(amount AS REAL) > 0),
            description TEXT
                CHECK (description IS NULL OR length(description) <= 255)
        )",
        [],
    )?;

    create_indexes(conn)?;

    Ok(())
}

/// インデックスを作成する
fn create_indexes(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category)",
        [],
    )?;

    Ok(())
}

/// 経費テーブルを削除して作り直す
///
/// 既存の全レコードが失われる。
pub fn reset_schema(conn: &Connection) -> AppResult<()> {
    log::info!("経費テーブルを再作成します");

    conn.execute("DROP TABLE IF EXISTS expenses", [])?;
    create_tables(conn)
}

/// クロージャをトランザクション内で実行する
///
/// クロージャが成功した場合はコミットし、失敗した場合はロールバックしてエラーを返す。
/// トランザクションはネストできないため、クロージャ内では`in_transaction`を呼ばないこと。
///
/// # 引数
/// * `conn` - データベース接続
/// * `operation` - トランザクション内で実行する処理
pub fn in_transaction<T, F>(conn: &Connection, operation: F) -> AppResult<T>
where
    F: FnOnce(&Connection) -> AppResult<T>,
{
    let tx = conn.unchecked_transaction()?;

    match operation(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_error) = tx.rollback() {
                log::error!("ロールバックに失敗しました: {rollback_error}");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// 経費テーブルのカラム名一覧を取得
    fn expense_columns(conn: &Connection) -> Vec<String> {
        let mut stmt = conn.prepare("PRAGMA table_info(expenses)").unwrap();
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        columns
    }

    #[test]
    fn test_create_tables() {
        let conn = Connection::open_in_memory().unwrap();

        assert!(create_tables(&conn).is_ok());
        // 2回目も成功すること（冪等性）
        assert!(create_tables(&conn).is_ok());

        assert_eq!(
            expense_columns(&conn),
            vec!["id", "date", "category", "amount", "description"]
        );
    }

    #[test]
    fn test_indexes_are_created() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        for index in ["idx_expenses_date", "idx_expenses_category"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name=?1",
                    [index],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "インデックス {index} が作成されていません");
        }
    }

    #[test]
    fn test_check_constraints_reject_invalid_rows() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let insert = |category: &str, amount: &str| {
            conn.execute(
                "INSERT INTO expenses (date, category, amount) VALUES ('2025-07-01', ?1, ?2)",
                [category, amount],
            )
        };

        assert!(insert("food", "0").is_err());
        assert!(insert("food", "-3").is_err());
        assert!(insert("   ", "5").is_err());
        assert!(insert(&"x".repeat(51), "5").is_err());
        assert!(insert("food", "0.01").is_ok());
    }

    #[test]
    fn test_reset_schema_removes_rows() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute(
            "INSERT INTO expenses (date, category, amount) VALUES ('2025-07-01', 'food', '5')",
            [],
        )
        .unwrap();

        reset_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_in_transaction_commits_and_rolls_back() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        let count = |conn: &Connection| -> i64 {
            conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))
                .unwrap()
        };

        in_transaction(&conn, |tx| {
            tx.execute(
                "INSERT INTO expenses (date, category, amount) VALUES ('2025-07-01', 'food', '5')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        assert_eq!(count(&conn), 1);

        let result: AppResult<()> = in_transaction(&conn, |tx| {
            tx.execute(
                "INSERT INTO expenses (date, category, amount) VALUES ('2025-07-02', 'food', '6')",
                [],
            )?;
            Err(crate::shared::errors::AppError::invalid_input("中断"))
        });
        assert!(result.is_err());
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_open_file_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let db = Database::open(&db_path).unwrap();
            assert!(expense_columns(db.connection()).contains(&"amount".to_string()));
        }

        // ハンドル解放後もファイルが残り、再度開けること
        assert!(db_path.exists());
        assert!(Database::open(&db_path).is_ok());
    }
}
