use crate::features::expenses::models::Expense;
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;
use std::fmt;

/// 年月キー（`YYYY-MM`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// 年と月から年月キーを作成する（月が1〜12でない場合はNone）
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// 月初日
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// 月末日
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };

        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// 経費の絞り込み条件
///
/// 各条件は独立して省略可能で、指定されたものはすべてAND条件になる。
/// 条件がない場合は全件が対象となる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// カテゴリ（大文字小文字を区別しない完全一致）
    pub category: Option<String>,
    /// 開始日（この日を含む）
    pub from_date: Option<NaiveDate>,
    /// 終了日（この日を含む）
    pub to_date: Option<NaiveDate>,
    /// 対象月（月初〜月末の範囲指定の省略形）
    pub month: Option<MonthKey>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_from_date(mut self, from_date: NaiveDate) -> Self {
        self.from_date = Some(from_date);
        self
    }

    pub fn with_to_date(mut self, to_date: NaiveDate) -> Self {
        self.to_date = Some(to_date);
        self
    }

    pub fn with_month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }

    /// 絞り込み条件の前提条件を検証する
    ///
    /// 開始日が終了日より後の場合は、空の結果を返すのではなく入力エラーとする。
    pub fn validate(&self) -> AppResult<()> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(AppError::invalid_input(
                    "--from-date cannot be after --to-date.",
                ));
            }
        }
        Ok(())
    }

    /// 実際に適用される日付範囲を取得する
    ///
    /// 月指定と明示的な範囲指定の両方がある場合は、その共通部分になる。
    pub fn date_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let month_from = self.month.map(|m| m.first_day());
        let month_to = self.month.map(|m| m.last_day());

        let from = match (self.from_date, month_from) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let to = match (self.to_date, month_to) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        (from, to)
    }

    /// 単一レコードが条件に一致するか（メモリ上での判定）
    ///
    /// カテゴリ比較はSQLiteの`COLLATE NOCASE`と同じくASCIIの大文字小文字のみを同一視する。
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = &self.category {
            if !expense.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        let (from, to) = self.date_bounds();
        if from.is_some_and(|from| expense.date < from) {
            return false;
        }
        if to.is_some_and(|to| expense.date > to) {
            return false;
        }

        true
    }

    /// 絞り込み条件がひとつも指定されていないか
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.from_date.is_none()
            && self.to_date.is_none()
            && self.month.is_none()
    }
}

/// 現在の年における指定月の年月キーを作成する
pub(crate) fn month_in_year(year: i32, month: chrono::Month) -> Option<MonthKey> {
    MonthKey::new(year, month.number_from_month())
}
