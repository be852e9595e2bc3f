//! 入力値の検証
//!
//! すべて副作用のない関数で、生の文字列を検証済みの型に変換するか、
//! ユーザーに表示できるメッセージを持つ入力エラーを返す。
//! ストレージに到達する前にここで必ず検証する。

use crate::features::expenses::filter::{month_in_year, MonthKey};
use crate::features::expenses::models::NewExpense;
use crate::shared::errors::{AppError, AppResult};
use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// カテゴリの最大文字数
pub const MAX_CATEGORY_CHARS: usize = 50;

/// 説明の最大文字数
pub const MAX_DESCRIPTION_CHARS: usize = 255;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("日付パターンが不正です"));

static MONTH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("年月パターンが不正です"));

/// 生の入力値（コマンドライン引数や対話入力そのまま）
#[derive(Debug, Clone, Default)]
pub struct RawExpenseInput<'a> {
    /// 省略時は今日の日付
    pub date: Option<&'a str>,
    pub category: &'a str,
    pub amount: &'a str,
    pub description: Option<&'a str>,
}

/// 今日の日付（ローカルタイムゾーン）
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 経費の入力値をまとめて検証し、保存用の下書きを作成する
///
/// # 引数
/// * `input` - 生の入力値
/// * `today` - 未来日判定の基準日
///
/// # 戻り値
/// 検証済みの経費下書き、または最初に見つかった入力エラー
pub fn validate_new_expense(input: &RawExpenseInput<'_>, today: NaiveDate) -> AppResult<NewExpense> {
    let date = match input.date {
        Some(text) => parse_date_as_of(text, today)?,
        None => today,
    };
    let amount = parse_amount(input.amount)?;
    let category = validate_category(input.category)?;
    let description = validate_description(input.description)?;

    Ok(NewExpense {
        date,
        category,
        amount,
        description,
    })
}

/// `YYYY-MM-DD`形式の日付を検証する（未来日は拒否）
pub fn parse_date(text: &str) -> AppResult<NaiveDate> {
    parse_date_as_of(text, today())
}

/// `YYYY-MM-DD`形式の日付を検証する
///
/// # 引数
/// * `text` - 日付文字列
/// * `today` - 基準日（これより後の日付は拒否）
pub fn parse_date_as_of(text: &str, today: NaiveDate) -> AppResult<NaiveDate> {
    let date = parse_strict_date(text)
        .ok_or_else(|| AppError::invalid_input("Date must be in YYYY-MM-DD format."))?;

    if date > today {
        return Err(AppError::invalid_input("Date cannot be in the future."));
    }

    Ok(date)
}

/// 絞り込み用の日付を検証する（未来日も許可）
///
/// # 引数
/// * `text` - 日付文字列
/// * `flag` - エラーメッセージに表示するオプション名（例: `--from-date`）
pub fn parse_filter_date(text: &str, flag: &str) -> AppResult<NaiveDate> {
    parse_strict_date(text)
        .ok_or_else(|| AppError::invalid_input(format!("{flag} must be in YYYY-MM-DD format.")))
}

fn parse_strict_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if !DATE_PATTERN.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// 金額を検証する（0より大きい10進数）
pub fn parse_amount(text: &str) -> AppResult<Decimal> {
    let text = text.trim();
    let amount = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| AppError::invalid_input("Amount must be a valid number."))?;

    if amount <= Decimal::ZERO {
        return Err(AppError::invalid_input("Amount must be greater than zero."));
    }

    Ok(amount)
}

/// カテゴリを検証する（前後の空白を除去して1〜50文字）
pub fn validate_category(text: &str) -> AppResult<String> {
    let category = text.trim();

    if category.is_empty() {
        return Err(AppError::invalid_input("Category cannot be empty."));
    }
    if category.chars().count() > MAX_CATEGORY_CHARS {
        return Err(AppError::invalid_input(format!(
            "Category must be {MAX_CATEGORY_CHARS} characters or fewer."
        )));
    }

    Ok(category.to_string())
}

/// 説明を正規化する（前後の空白を除去し、空文字列はNoneにする）
pub fn normalize_description(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|description| !description.is_empty())
        .map(str::to_string)
}

/// 説明を正規化したうえで長さを検証する
pub fn validate_description(text: Option<&str>) -> AppResult<Option<String>> {
    let description = normalize_description(text);

    if let Some(ref d) = description {
        if d.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(AppError::invalid_input(format!(
                "Description must be {MAX_DESCRIPTION_CHARS} characters or fewer."
            )));
        }
    }

    Ok(description)
}

/// 月指定を検証する（`YYYY-MM`、または今年の月名）
pub fn validate_month(text: &str) -> AppResult<MonthKey> {
    validate_month_as_of(text, today().year())
}

/// 月指定を検証する
///
/// # 引数
/// * `text` - `YYYY-MM`形式、または月名（`July`、`jul`など大文字小文字を区別しない）
/// * `current_year` - 月名指定の場合に使用する年
pub fn validate_month_as_of(text: &str, current_year: i32) -> AppResult<MonthKey> {
    let text = text.trim();
    let invalid = || AppError::invalid_input("--month must be in YYYY-MM format or a month name.");

    if let Some(captures) = MONTH_PATTERN.captures(text) {
        let year = captures[1].parse::<i32>().map_err(|_| invalid())?;
        let month = captures[2].parse::<u32>().map_err(|_| invalid())?;
        return MonthKey::new(year, month).ok_or_else(invalid);
    }

    // chrono::Monthは完全な月名と3文字の省略形を受け付ける
    text.parse::<chrono::Month>()
        .ok()
        .and_then(|month| month_in_year(current_year, month))
        .ok_or_else(invalid)
}

/// 上位N件の指定を検証する
pub fn validate_top(n: i64) -> AppResult<NonZeroUsize> {
    usize::try_from(n)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| AppError::invalid_input("--top must be a positive integer."))
}

/// 上位N件の指定を文字列から検証する（対話入力用）
pub fn parse_top(text: &str) -> AppResult<NonZeroUsize> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_input("--top must be a positive integer."))
        .and_then(validate_top)
}
