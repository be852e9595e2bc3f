/// データベース接続とスキーマ管理
pub mod connection;

pub use connection::{create_tables, in_transaction, reset_schema, Database};
