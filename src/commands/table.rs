/// 列の揃え方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// 端末表示用のテキスト表
///
/// 見出し行、区切り線、データ行の順に出力する。
/// 列の幅は見出しとすべてのセルのうち最も長いものに合わせる。
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<(String, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(header, align)| (header.to_string(), *align))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// 行を追加する（列数に満たないセルは空文字で補う）
    pub fn push_row(&mut self, cells: Vec<String>) {
        let mut cells = cells;
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .map(|row| display_width(&row[i]))
                    .chain(std::iter::once(display_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let headers: Vec<&str> = self.columns.iter().map(|(h, _)| h.as_str()).collect();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut lines = vec![self.render_line(&headers, &widths)];
        lines.push(rule.join("  "));
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.render_line(&cells, &widths));
        }

        lines.join("\n")
    }

    fn render_line(&self, cells: &[&str], widths: &[usize]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .zip(&self.columns)
            .map(|((cell, width), (_, align))| {
                let padding = " ".repeat(width.saturating_sub(display_width(cell)));
                match align {
                    Align::Left => format!("{cell}{padding}"),
                    Align::Right => format!("{padding}{cell}"),
                }
            })
            .collect();

        padded.join("  ").trim_end().to_string()
    }
}

/// セルの表示幅（文字数）
///
/// 全角文字（CJKなど）も1文字として数えるため、全角を含む列は端末上で揃わない。
fn display_width(text: &str) -> usize {
    text.chars().count()
}
