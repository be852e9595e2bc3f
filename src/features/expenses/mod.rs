/// 経費機能モジュール
///
/// このモジュールは経費管理に関連するすべての機能を提供します：
/// - 経費の登録と絞り込み検索
/// - 入力値のバリデーション
/// - カテゴリ別の集計と順位付け
/// - サンプルデータによる初期化
// サブモジュールの宣言
pub mod filter;
pub mod models;
pub mod repository;
pub mod seed;
pub mod summary;
pub mod validation;


// 公開インターフェース：外部から使用可能な型と関数をエクスポート

// モデル
pub use filter::{ExpenseFilter, MonthKey};
pub use models::{format_amount, Expense, NewExpense};

// リポジトリ（データベース操作）
pub use repository::{aggregate, count, create, create_many, find_all, find_by_id};

// 集計
pub use summary::{summarize, CategoryTotal, SpendingSummary, SummaryReport};

// バリデーション
pub use validation::{
    parse_filter_date, parse_top, validate_month, validate_new_expense, validate_top,
    RawExpenseInput,
};
