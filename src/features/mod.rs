/// 機能別モジュール
///
/// 各機能モジュールは、その機能に関連するモデル・検証・データベース操作を含む自己完結型のユニットです。
pub mod expenses;
