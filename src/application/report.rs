use crate::domain::model::book::Book;
use crate::domain::model::library::LibraryStats;

/// 蔵書 → 表示用テキストへの変換
pub struct ReportService;

impl ReportService {
    /// 番号付きの一覧を返す。リンクは空でない場合のみ次行に出力する。
    ///
    /// ```text
    /// 1. The Hobbit by J.R.R. Tolkien (1937) - Fantasy - Read
    ///    Link: https://example.com/hobbit
    /// ```
    pub fn render_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
        let mut buf = String::new();
        for (i, book) in books.into_iter().enumerate() {
            Self::render_book(i + 1, book, &mut buf);
        }
        buf
    }

    /// 統計を返す。小数点以下2桁への丸めは表示時のみ行う。
    pub fn render_stats(stats: &LibraryStats) -> String {
        format!(
            "Total books: {}\nBooks read: {}\nPercentage read: {:.2}%\n",
            stats.total, stats.read, stats.percent_read
        )
    }

    fn render_book(number: usize, book: &Book, buf: &mut String) {
        let status = if book.is_read() { "Read" } else { "Unread" };
        buf.push_str(&format!(
            "{}. {} by {} ({}) - {} - {}\n",
            number,
            book.title(),
            book.author(),
            book.year(),
            book.genre(),
            status
        ));
        if let Some(link) = book.link() {
            let indent = " ".repeat(number.to_string().len() + 2);
            buf.push_str(&format!("{indent}Link: {link}\n"));
        }
    }
}
