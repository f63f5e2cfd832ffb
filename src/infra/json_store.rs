use std::path::PathBuf;

use serde::Serialize;

use crate::domain::model::book::Book;
use crate::domain::repository::LibraryRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed library document: {0}")]
    Format(#[from] serde_json::Error),
}

/// JSONファイルによるLibraryRepository実装。
/// 蔵書全体 = 1 JSON配列。保存のたびに全件を書き直す。
pub struct JsonLibraryRepository {
    path: PathBuf,
}

impl JsonLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LibraryRepository for JsonLibraryRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Vec<Book>, Self::Error> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let books: Vec<Book> = serde_json::from_str(&content)?;
        Ok(books)
    }

    fn save(&self, books: &[Book]) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // 既存のlibrary.jsonと同じ4スペースインデント
        let mut content = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut content, formatter);
        books.serialize(&mut ser)?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
