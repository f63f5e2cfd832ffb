use serde::{Deserialize, Serialize};

use super::book::Book;

/// 検索対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    /// "title" / "author"（大文字小文字を区別しない）を解釈する。
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            _ => None,
        }
    }

    fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            Self::Title => book.title(),
            Self::Author => book.author(),
        }
    }
}

/// 蔵書統計
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryStats {
    pub total: usize,
    pub read: usize,
    /// 既読率（0.0〜100.0）。蔵書0件なら0.0。
    pub percent_read: f64,
}

/// Library — 集約ルート。挿入順がそのまま表示順になる。
///
/// タイトルの一意性は強制しない。削除は同一タイトルの全件が対象。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl From<Vec<Book>> for Library {
    fn from(books: Vec<Book>) -> Self {
        Self { books }
    }
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 削除候補として表示するタイトル一覧（挿入順、重複あり）
    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(|b| b.title()).collect()
    }

    /// 末尾に追加する。
    pub fn push(&mut self, book: Book) {
        self.books.push(book);
    }

    /// タイトルが完全一致（大文字小文字を区別）する全件を削除し、削除件数を返す。
    pub fn remove_by_title(&mut self, title: &str) -> usize {
        let before = self.books.len();
        self.books.retain(|b| b.title() != title);
        before - self.books.len()
    }

    /// 部分一致検索（大文字小文字を区別しない）。空クエリは常に空結果。
    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        if query.is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| field.value_of(b).to_lowercase().contains(&query))
            .collect()
    }

    pub fn stats(&self) -> LibraryStats {
        let total = self.books.len();
        let read = self.books.iter().filter(|b| b.is_read()).count();
        let percent_read = if total == 0 {
            0.0
        } else {
            read as f64 / total as f64 * 100.0
        };
        LibraryStats {
            total,
            read,
            percent_read,
        }
    }
}
