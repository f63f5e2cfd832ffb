use serde::{Deserialize, Serialize};

/// 書籍追加リクエスト
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: u32,
    pub genre: String,
    pub read: bool,
    /// 空文字列は「リンクなし」として扱う
    pub link: Option<String>,
}

/// 蔵書レコード。Libraryが所有し、Libraryを通じて追加・削除する。
///
/// 永続化フォーマットのフィールド順（title, author, year, genre, read, link）をそのまま保つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    year: u32,
    genre: String,
    read: bool,
    /// 古いファイルには存在しないことがあるため空文字列で補う
    #[serde(default)]
    link: String,
}

impl From<NewBook> for Book {
    fn from(req: NewBook) -> Self {
        Self {
            title: req.title,
            author: req.author,
            year: req.year,
            genre: req.genre,
            read: req.read,
            link: req.link.unwrap_or_default(),
        }
    }
}

impl Book {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    /// 空文字列のリンクはNoneとして返す。
    pub fn link(&self) -> Option<&str> {
        if self.link.is_empty() {
            None
        } else {
            Some(&self.link)
        }
    }
}
