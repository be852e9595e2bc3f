//! コマンドライン引数の定義

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Personal expense tracker
///
/// サブコマンドを省略すると対話メニューを表示する。
#[derive(Debug, Parser)]
#[command(name = "tracker")]
#[command(version, about = "Personal expense tracker backed by SQLite", long_about = None)]
pub struct Cli {
    /// Database file to use (overrides EXPENSES_DB_PATH)
    #[arg(long = "database", global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a new expense record
    Add(AddArgs),

    /// List expenses, with optional category and date filters
    List(ListArgs),

    /// Summarize spending totals, grouped by category
    Summary(SummaryArgs),

    /// Recreate the expenses table and load sample data
    #[command(name = "init-db")]
    InitDb(InitDbArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct AddArgs {
    /// Expense date in YYYY-MM-DD (defaults to today)
    #[arg(short = 'd', long = "date")]
    pub date: Option<String>,

    /// Expense category (prompted for when omitted)
    #[arg(short = 'c', long = "category")]
    pub category: Option<String>,

    /// Amount spent (prompted for when omitted)
    #[arg(short = 'a', long = "amount", allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Optional description
    #[arg(long = "description", visible_alias = "desc")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Filter by category (case-insensitive)
    #[arg(short = 'c', long = "category")]
    pub category: Option<String>,

    /// Start date (YYYY-MM-DD, inclusive)
    #[arg(short = 'f', long = "from-date")]
    pub from_date: Option<String>,

    /// End date (YYYY-MM-DD, inclusive)
    #[arg(short = 't', long = "to-date")]
    pub to_date: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SummaryArgs {
    /// Restrict to a single month (YYYY-MM or a month name)
    #[arg(short = 'm', long = "month")]
    pub month: Option<String>,

    /// Show only the top-N categories by total spent
    #[arg(short = 'n', long = "top", allow_negative_numbers = true)]
    pub top: Option<i64>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct InitDbArgs {
    /// Recreate the table without inserting sample data
    #[arg(long = "no-seed")]
    pub no_seed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["tracker"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.database.is_none());
    }

    #[test]
    fn test_parse_add_with_short_flags() {
        let cli = Cli::try_parse_from([
            "tracker", "add", "-d", "2025-07-20", "-c", "food", "-a", "-3", "--desc", "Tacos",
        ])
        .unwrap();

        let Some(Commands::Add(args)) = cli.command else {
            panic!("addコマンドとして解析されていません");
        };
        assert_eq!(args.date.as_deref(), Some("2025-07-20"));
        assert_eq!(args.category.as_deref(), Some("food"));
        // 負の金額は検証層で拒否するため、ここではそのまま受け取る
        assert_eq!(args.amount.as_deref(), Some("-3"));
        assert_eq!(args.description.as_deref(), Some("Tacos"));
    }

    #[test]
    fn test_parse_list_and_summary() {
        let cli = Cli::try_parse_from([
            "tracker", "list", "-c", "food", "-f", "2025-07-01", "-t", "2025-07-31",
        ])
        .unwrap();
        let Some(Commands::List(args)) = cli.command else {
            panic!("listコマンドとして解析されていません");
        };
        assert_eq!(args.from_date.as_deref(), Some("2025-07-01"));
        assert_eq!(args.to_date.as_deref(), Some("2025-07-31"));

        let cli = Cli::try_parse_from(["tracker", "summary", "-m", "July", "-n", "-1"]).unwrap();
        let Some(Commands::Summary(args)) = cli.command else {
            panic!("summaryコマンドとして解析されていません");
        };
        assert_eq!(args.month.as_deref(), Some("July"));
        assert_eq!(args.top, Some(-1));
    }

    #[test]
    fn test_parse_global_database_and_init_db() {
        let cli =
            Cli::try_parse_from(["tracker", "init-db", "--no-seed", "--database", "/tmp/x.db"])
                .unwrap();

        assert_eq!(cli.database, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(
            cli.command,
            Some(Commands::InitDb(InitDbArgs { no_seed: true }))
        ));
    }
}
