use super::model::book::Book;

/// 永続化の抽象。Infra層が実装する。
/// 保存は常に全件の上書き。保存先が存在しなければloadは空を返す。
pub trait LibraryRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<Vec<Book>, Self::Error>;
    fn save(&self, books: &[Book]) -> Result<(), Self::Error>;
}
