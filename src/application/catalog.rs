use crate::domain::model::book::{Book, NewBook};
use crate::domain::model::library::{Library, LibraryStats, SearchField};
use crate::domain::repository::LibraryRepository;

use super::error::AppError;

/// 蔵書カタログ。プロセス存続中はメモリ上のLibraryを唯一の所有者として保持する。
///
/// 変更系の操作は mutate(copy) → save → commit の順で行う。
/// saveが失敗した場合はメモリ上の状態を変更しない。
pub struct LibraryCatalog<R: LibraryRepository> {
    repo: R,
    library: Library,
}

impl<R: LibraryRepository> LibraryCatalog<R> {
    /// 保存先から蔵書を読み込んでカタログを構築する。保存先がなければ空。
    pub fn open(repo: R) -> Result<Self, AppError> {
        let books = repo.load().map_err(|e| AppError::Load(Box::new(e)))?;
        Ok(Self {
            repo,
            library: Library::from(books),
        })
    }

    /// 書籍を末尾に追加して永続化する。タイトルの重複・空文字は許容する。
    pub fn add_book(&mut self, req: NewBook) -> Result<Book, AppError> {
        let book = Book::from(req);
        let mut next = self.library.clone();
        next.push(book.clone());
        self.commit(next)?;
        Ok(book)
    }

    /// 同一タイトルの全件を削除して永続化し、削除件数を返す。
    /// 一致なしでも保存は行う（0件）。
    pub fn remove_book(&mut self, title: &str) -> Result<usize, AppError> {
        let mut next = self.library.clone();
        let removed = next.remove_by_title(title);
        self.commit(next)?;
        Ok(removed)
    }

    pub fn search_books(&self, field: SearchField, query: &str) -> Vec<&Book> {
        self.library.search(field, query)
    }

    pub fn list_books(&self) -> &[Book] {
        self.library.books()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.library.titles()
    }

    pub fn compute_stats(&self) -> LibraryStats {
        self.library.stats()
    }

    // --- private ---

    fn commit(&mut self, next: Library) -> Result<(), AppError> {
        self.repo
            .save(next.books())
            .map_err(|e| AppError::Save(Box::new(e)))?;
        self.library = next;
        Ok(())
    }
}
