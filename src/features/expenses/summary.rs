use crate::features::expenses::filter::ExpenseFilter;
use crate::features::expenses::models::{add_amounts, Expense};
use crate::features::expenses::repository;
use crate::shared::errors::AppResult;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

/// カテゴリ別の合計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// 集計結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendingSummary {
    /// 合計の降順に並んだカテゴリ（上位N件指定時は切り詰め済み）
    pub ranked: Vec<CategoryTotal>,
    /// 絞り込み後の全レコードの合計（上位N件の切り詰めに影響されない）
    pub grand_total: Decimal,
    /// 最も支出の多いカテゴリ
    pub top_category: CategoryTotal,
    /// 切り詰め前のカテゴリ数
    pub category_count: usize,
}

/// 集計レポート
///
/// 対象レコードがない場合は、空の集計ではなく`NoData`として区別する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryReport {
    NoData,
    Totals(SpendingSummary),
}

/// 経費のリストをカテゴリ（大文字小文字を区別）ごとに合計する
pub fn group_by_category(expenses: &[Expense]) -> AppResult<BTreeMap<String, Decimal>> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        let total = totals
            .entry(expense.category.clone())
            .or_insert(Decimal::ZERO);
        *total = add_amounts(*total, expense.amount)?;
    }
    Ok(totals)
}

/// カテゴリ別の合計を順位付けする
///
/// 合計の降順に並べ、同額の場合はカテゴリ名の昇順で並べる。
pub fn rank_totals(totals: BTreeMap<String, Decimal>) -> Vec<CategoryTotal> {
    let mut ranked: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();

    ranked.sort_by(|a, b| match b.total.cmp(&a.total) {
        Ordering::Equal => a.category.cmp(&b.category),
        other => other,
    });

    ranked
}

/// カテゴリ別の合計から集計レポートを作成する
///
/// # 引数
/// * `totals` - カテゴリ名から合計金額へのマップ
/// * `top` - 上位N件のみを残す場合の件数（検証済みの正の整数）
///
/// # 戻り値
/// 集計レポート（マップが空の場合は`NoData`）。総計が`Decimal`の範囲を超える場合は入力エラー
pub fn summarize_totals(
    totals: BTreeMap<String, Decimal>,
    top: Option<NonZeroUsize>,
) -> AppResult<SummaryReport> {
    let grand_total = totals
        .values()
        .try_fold(Decimal::ZERO, |sum, total| add_amounts(sum, *total))?;
    let mut ranked = rank_totals(totals);

    let Some(top_category) = ranked.first().cloned() else {
        return Ok(SummaryReport::NoData);
    };

    let category_count = ranked.len();
    if let Some(limit) = top {
        ranked.truncate(limit.get());
    }

    Ok(SummaryReport::Totals(SpendingSummary {
        ranked,
        grand_total,
        top_category,
        category_count,
    }))
}

/// 絞り込み条件に一致する経費を集計する
///
/// # 引数
/// * `conn` - データベース接続
/// * `filter` - 絞り込み条件
/// * `top` - 上位N件の指定
///
/// # 戻り値
/// 集計レポート、または失敗時はエラー
pub fn summarize(
    conn: &Connection,
    filter: &ExpenseFilter,
    top: Option<NonZeroUsize>,
) -> AppResult<SummaryReport> {
    let totals = repository::aggregate(conn, filter)?;
    let report = summarize_totals(totals, top)?;

    if let SummaryReport::Totals(summary) = &report {
        log::debug!(
            "集計レポートを作成しました: カテゴリ数={}, 表示件数={}, 合計={}",
            summary.category_count,
            summary.ranked.len(),
            summary.grand_total
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::expenses::models::NewExpense;
    use crate::features::expenses::repository::create_many;
    use crate::shared::database::Database;
    use chrono::NaiveDate;
    use quickcheck_macros::quickcheck;
    use rust_decimal_macros::dec;

    fn totals(entries: &[(&str, Decimal)]) -> BTreeMap<String, Decimal> {
        let mut map = BTreeMap::new();
        for (category, amount) in entries {
            *map.entry(category.to_string()).or_insert(Decimal::ZERO) += *amount;
        }
        map
    }

    fn top(n: usize) -> Option<NonZeroUsize> {
        NonZeroUsize::new(n)
    }

    #[test]
    fn test_rank_totals_orders_by_total_then_name() {
        let ranked = rank_totals(totals(&[
            ("coffee", dec!(5)),
            ("transport", dec!(20)),
            ("books", dec!(5)),
            ("food", dec!(15)),
        ]));

        let order: Vec<&str> = ranked.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(order, vec!["transport", "food", "books", "coffee"]);
    }

    #[test]
    fn test_summarize_totals_empty_is_no_data() {
        assert_eq!(
            summarize_totals(BTreeMap::new(), None).unwrap(),
            SummaryReport::NoData
        );
        assert_eq!(
            summarize_totals(BTreeMap::new(), top(3)).unwrap(),
            SummaryReport::NoData
        );
    }

    #[test]
    fn test_top_n_keeps_grand_total_over_all_groups() {
        let report = summarize_totals(
            totals(&[("food", dec!(10)), ("food", dec!(5)), ("transport", dec!(20))]),
            top(1),
        )
        .unwrap();

        let SummaryReport::Totals(summary) = report else {
            panic!("集計結果が空です");
        };
        assert_eq!(
            summary.ranked,
            vec![CategoryTotal {
                category: "transport".to_string(),
                total: dec!(20),
            }]
        );
        assert_eq!(summary.grand_total, dec!(35));
        assert_eq!(summary.top_category.category, "transport");
        assert_eq!(summary.category_count, 2);
    }

    #[test]
    fn test_top_n_larger_than_group_count() {
        let report = summarize_totals(totals(&[("food", dec!(1))]), top(10)).unwrap();
        let SummaryReport::Totals(summary) = report else {
            panic!("集計結果が空です");
        };
        assert_eq!(summary.ranked.len(), 1);
    }

    #[test]
    fn test_totals_beyond_decimal_range_are_rejected() {
        let half_max = Decimal::MAX / dec!(2) + dec!(1);

        // 同じカテゴリ内での加算
        let expense = |id: i64, category: &str| Expense {
            id,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            category: category.to_string(),
            amount: half_max,
            description: None,
        };
        let error = group_by_category(&[expense(1, "rent"), expense(2, "rent")]).unwrap_err();
        assert!(error.is_invalid_input());

        // カテゴリをまたいだ総計
        let grouped = group_by_category(&[expense(1, "rent"), expense(2, "food")]).unwrap();
        let error = summarize_totals(grouped, None).unwrap_err();
        assert!(error.user_message().contains("too large"));
    }

    #[test]
    fn test_summarize_with_month_filter() {
        let db = Database::open_in_memory().unwrap();
        let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        create_many(
            db.connection(),
            &[
                NewExpense::new(date(7, 1), "food", dec!(10), None),
                NewExpense::new(date(7, 2), "food", dec!(5), None),
                NewExpense::new(date(7, 3), "transport", dec!(20), None),
                NewExpense::new(date(8, 1), "rent", dec!(900), None),
            ],
        )
        .unwrap();

        let filter = ExpenseFilter::new().with_month(
            crate::features::expenses::filter::MonthKey::new(2025, 7).unwrap(),
        );
        let SummaryReport::Totals(summary) = summarize(db.connection(), &filter, None).unwrap()
        else {
            panic!("集計結果が空です");
        };

        assert_eq!(summary.ranked.len(), 2);
        assert_eq!(summary.ranked[0].category, "transport");
        assert_eq!(summary.ranked[1].total, dec!(15));
        assert_eq!(summary.grand_total, dec!(35));

        let empty = ExpenseFilter::new().with_category("nothing");
        assert_eq!(
            summarize(db.connection(), &empty, None).unwrap(),
            SummaryReport::NoData
        );
    }

    /// 任意のカテゴリ・金額の組に対して、総計は全レコードの合計と一致し、
    /// 上位N件は常に合計の降順に並ぶ
    #[quickcheck]
    fn prop_grand_total_ignores_truncation(entries: Vec<(u8, u32)>, limit: u8) -> bool {
        let expenses: Vec<Expense> = entries
            .iter()
            .enumerate()
            .map(|(i, (category, cents))| Expense {
                id: i as i64 + 1,
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                category: format!("c{}", category % 5),
                amount: Decimal::new(i64::from(*cents) + 1, 2),
                description: None,
            })
            .collect();

        let expected_total: Decimal = expenses.iter().map(|e| e.amount).sum();
        let grouped = group_by_category(&expenses).unwrap();
        let report = summarize_totals(grouped, top(usize::from(limit))).unwrap();

        match report {
            SummaryReport::NoData => expenses.is_empty(),
            SummaryReport::Totals(summary) => {
                let sorted = summary
                    .ranked
                    .windows(2)
                    .all(|pair| pair[0].total >= pair[1].total);
                let within_limit = limit == 0 || summary.ranked.len() <= usize::from(limit);
                summary.grand_total == expected_total && sorted && within_limit
            }
        }
    }
}
