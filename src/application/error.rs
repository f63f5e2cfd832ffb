#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 保存先が読めない、または内容が壊れている
    #[error("failed to load library: {0}")]
    Load(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 保存に失敗した。メモリ上の蔵書は変更前のまま。
    #[error("failed to save library: {0}")]
    Save(#[source] Box<dyn std::error::Error + Send + Sync>),
}
