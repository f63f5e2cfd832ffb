//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use bookshelf_mcp::application::catalog::LibraryCatalog;
use bookshelf_mcp::domain::model::book::{Book, NewBook};
use bookshelf_mcp::domain::repository::LibraryRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。保存回数も記録する。
pub struct InMemoryRepo {
    store: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(None),
            saves: Cell::new(0),
        }
    }

    pub fn with_books(books: &[Book]) -> Self {
        let repo = Self::new();
        repo.save(books).unwrap();
        repo.saves.set(0);
        repo
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// 最後に保存された内容を読み直す。
    pub fn stored(&self) -> Vec<Book> {
        self.load().unwrap()
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Vec<Book>, Self::Error> {
        match self.store.borrow().as_deref() {
            Some(json) => Ok(serde_json::from_str(json).unwrap()),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, books: &[Book]) -> Result<(), Self::Error> {
        let json = serde_json::to_string(books).unwrap();
        *self.store.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl LibraryRepository for &InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Vec<Book>, Self::Error> {
        (**self).load()
    }

    fn save(&self, books: &[Book]) -> Result<(), Self::Error> {
        (**self).save(books)
    }
}

// =============================================================================
// FailingRepo — 保存が常に失敗するリポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
pub struct DiskFull;

pub struct FailingRepo {
    books: Vec<Book>,
}

impl FailingRepo {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self { books }
    }
}

impl LibraryRepository for FailingRepo {
    type Error = DiskFull;

    fn load(&self) -> Result<Vec<Book>, Self::Error> {
        Ok(self.books.clone())
    }

    fn save(&self, _books: &[Book]) -> Result<(), Self::Error> {
        Err(DiskFull)
    }
}

// =============================================================================
// TestLibrary — テスト用蔵書
// =============================================================================

pub fn new_book(title: &str, author: &str, year: u32, genre: &str, read: bool) -> NewBook {
    NewBook {
        title: title.into(),
        author: author.into(),
        year,
        genre: genre.into(),
        read,
        link: None,
    }
}

pub struct TestLibrary;

impl TestLibrary {
    /// 標準的なテスト用蔵書:
    /// ```text
    /// 1. The Hobbit        J.R.R. Tolkien  1937  Fantasy   read   (link)
    /// 2. Emma              Jane Austen     1815  Novel     unread
    /// 3. The Silmarillion  J.R.R. Tolkien  1977  Fantasy   read
    /// ```
    pub fn standard() -> Vec<Book> {
        let mut hobbit = new_book("The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", true);
        hobbit.link = Some("https://example.com/hobbit".into());
        vec![
            Book::from(hobbit),
            Book::from(new_book("Emma", "Jane Austen", 1815, "Novel", false)),
            Book::from(new_book(
                "The Silmarillion",
                "J.R.R. Tolkien",
                1977,
                "Fantasy",
                true,
            )),
        ]
    }

    pub fn catalog_with(books: &[Book]) -> LibraryCatalog<InMemoryRepo> {
        LibraryCatalog::open(InMemoryRepo::with_books(books)).unwrap()
    }

    pub fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.title()).collect()
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
