use thiserror::Error;

/// アプリケーション全体で使用される統一エラー型
#[derive(Debug, Error)]
pub enum AppError {
    /// 入力値の検証に失敗した場合のエラー（ストレージには到達しない）
    #[error("入力エラー: {0}")]
    InvalidInput(String),

    /// ストレージ（SQLite）操作でのエラー
    #[error("ストレージエラー: {0}")]
    Storage(#[from] rusqlite::Error),

    /// 設定関連のエラー
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// I/O関連のエラー
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),
}

/// エラーの重要度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 低重要度（ユーザー入力エラーなど）
    Low,
    /// 中重要度（端末I/Oエラーなど）
    Medium,
    /// 高重要度（ストレージエラーなど）
    High,
}

impl AppError {
    /// ユーザーに表示するためのメッセージを取得
    ///
    /// 入力エラーは修正方法を含む具体的なメッセージをそのまま返す。
    /// それ以外は汎用的なメッセージを返す（詳細はログに出力する）。
    pub fn user_message(&self) -> &str {
        match self {
            AppError::InvalidInput(msg) => msg,
            AppError::Storage(_) => "A storage error occurred; the operation was not completed.",
            AppError::Configuration(msg) => msg,
            AppError::Io(_) => "A terminal I/O error occurred.",
        }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::InvalidInput(_) => ErrorSeverity::Low,
            AppError::Io(_) => ErrorSeverity::Medium,
            AppError::Storage(_) => ErrorSeverity::High,
            AppError::Configuration(_) => ErrorSeverity::High,
        }
    }

    /// 入力エラーかどうか
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }

    /// プロセス終了コードを取得
    ///
    /// # 戻り値
    /// 入力エラーは2、それ以外は1
    pub fn exit_code(&self) -> u8 {
        if self.is_invalid_input() {
            2
        } else {
            1
        }
    }

    /// 重要度に応じたレベルでエラーをログに出力する
    pub fn log(&self) {
        match self.severity() {
            ErrorSeverity::Low => log::warn!("{self}"),
            ErrorSeverity::Medium | ErrorSeverity::High => log::error!("{self}"),
        }
    }

    /// 入力エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - ユーザーに表示する修正方法を含むメッセージ
    ///
    /// # 戻り値
    /// 入力エラー
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        AppError::InvalidInput(message.into())
    }

    /// 設定エラーを作成するヘルパー関数
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}

/// Result型のエイリアス（アプリケーション全体で使用）
pub type AppResult<T> = Result<T, AppError>;
