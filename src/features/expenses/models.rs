use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// 経費データモデル（永続化済みレコード）
///
/// 作成後は変更されない。呼び出し側が受け取るのは常にコピーである。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// 経費作成用の下書き（検証済みの値、またはシードデータ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl NewExpense {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: Decimal,
        description: Option<&str>,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
            description: description.map(str::to_string),
        }
    }
}

/// 金額を小数点以下2桁の文字列に整形する（四捨五入）
pub fn format_amount(amount: &Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// 金額を加算する（表現できる範囲を超えた場合は入力エラー）
pub fn add_amounts(total: Decimal, amount: Decimal) -> AppResult<Decimal> {
    total.checked_add(amount).ok_or_else(|| {
        AppError::invalid_input("Total amount is too large to compute; check for oversized amounts.")
    })
}

impl fmt::Display for Expense {
    /// `日付 | カテゴリ | 金額 • 説明` 形式で表示する
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.date,
            self.category,
            format_amount(&self.amount)
        )?;
        if let Some(description) = &self.description {
            write!(f, " • {description}")?;
        }
        Ok(())
    }
}
