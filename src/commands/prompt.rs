use crate::shared::errors::AppResult;
use std::io::{BufRead, Write};

/// 端末入出力
///
/// 入力と出力を抽象化しているため、テストではバイト列を渡して実行できる。
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 出力先への参照を取得
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// 出力先を取り出す
    pub fn into_output(self) -> W {
        self.output
    }

    /// ラベルを表示して1行読み込む
    ///
    /// # 戻り値
    /// 改行を除いた入力行。入力が終端に達した場合はNone
    pub fn ask(&mut self, label: &str) -> AppResult<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// 省略可能な値を読み込む（空行はNone）
    ///
    /// # 戻り値
    /// 入力が終端に達した場合は外側がNone
    pub fn ask_optional(&mut self, label: &str) -> AppResult<Option<Option<String>>> {
        Ok(self.ask(label)?.map(|answer| {
            let trimmed = answer.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ask_reads_lines_until_eof() {
        let mut prompter = Prompter::new(Cursor::new("food\r\n\n"), Vec::new());

        assert_eq!(prompter.ask("Category").unwrap().as_deref(), Some("food"));
        assert_eq!(prompter.ask_optional("Description").unwrap(), Some(None));
        assert_eq!(prompter.ask("Amount").unwrap(), None);

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert_eq!(output, "Category: Description: Amount: \n");
    }
}
