//! MCP Server for bookshelf-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryCatalog / ReportService
//!
//! 5 tools: add_book, remove_book, search_books, list_books, library_stats

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::catalog::LibraryCatalog;
use crate::application::error::AppError;
use crate::application::report::ReportService;
use crate::domain::model::book::NewBook;
use crate::domain::model::library::SearchField;
use crate::infra::json_store::JsonLibraryRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。library_pathは蔵書JSONファイル。
/// 読み込みに失敗した場合は起動しない。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    let repo = JsonLibraryRepository::new(&library_path);
    let catalog = LibraryCatalog::open(repo)?;
    tracing::info!(
        path = %library_path.display(),
        books = catalog.list_books().len(),
        "Library loaded"
    );

    let server = BookshelfMcpServer::new(catalog);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

type Catalog = LibraryCatalog<JsonLibraryRepository>;

#[derive(Clone)]
struct BookshelfMcpServer {
    catalog: Arc<RwLock<Catalog>>,
    tool_router: ToolRouter<Self>,
}

impl BookshelfMcpServer {
    fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            tool_router: Self::tool_router(),
        }
    }

    fn read_catalog(&self) -> Result<RwLockReadGuard<'_, Catalog>, McpError> {
        self.catalog
            .read()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    fn write_catalog(&self) -> Result<RwLockWriteGuard<'_, Catalog>, McpError> {
        self.catalog
            .write()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    fn to_mcp_error(e: AppError) -> McpError {
        tracing::warn!(error = %e, "Library operation failed");
        McpError::internal_error(format!("{e}"), None)
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for BookshelfMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bookshelf-mcp".to_string(),
                title: Some("Bookshelf MCP — Personal Library Manager".to_string()),
                description: Some(
                    "Personal book catalog: record books with read status, \
                     then search, list, and summarize them."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal library of books.\n\
                 \n\
                 Tools: `add_book` to record a book, `list_books` to see everything, \
                 `search_books` by title or author, `remove_book` by exact title \
                 (removes every book with that title), `library_stats` for totals."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

/// "yes" / "no" の選択を既読フラグに変換する。
fn parse_read_status(s: &str) -> Result<bool, McpError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Ok(true),
        "no" | "n" => Ok(false),
        other => Err(McpError::invalid_params(
            format!("Unknown read status: '{other}'. Use: yes, no"),
            None,
        )),
    }
}

fn parse_search_field(s: &str) -> Result<SearchField, McpError> {
    SearchField::parse(s).ok_or_else(|| {
        McpError::invalid_params(
            format!("Unknown search field: '{s}'. Use: title, author"),
            None,
        )
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title")]
    pub title: String,
    #[schemars(description = "Author name")]
    pub author: String,
    #[schemars(description = "Publication year (non-negative)")]
    pub year: u32,
    #[schemars(description = "Genre")]
    pub genre: String,
    #[schemars(description = "Have you read this book? 'yes' or 'no'")]
    pub read: String,
    #[schemars(description = "Optional link to the book (URL)")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpRemoveBookRequest {
    #[schemars(
        description = "Exact title from `list_books` output. Every book with this title is removed."
    )]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchBooksRequest {
    #[schemars(description = "Field to search: 'title' or 'author'")]
    pub search_by: String,
    #[schemars(description = "Case-insensitive substring to look for")]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpListBooksRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpStatsRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl BookshelfMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a book to the library. Duplicate titles are allowed.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let read = parse_read_status(&req.read)?;
        let new_book = NewBook {
            title: req.title,
            author: req.author,
            year: req.year,
            genre: req.genre,
            read,
            link: req.link,
        };

        let mut catalog = self.write_catalog()?;
        let book = catalog.add_book(new_book).map_err(Self::to_mcp_error)?;
        tracing::info!(
            title = %book.title(),
            total = catalog.list_books().len(),
            "Book added"
        );

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Added: {} by {}",
            book.title(),
            book.author()
        ))]))
    }

    #[tool(
        name = "remove_book",
        description = "Remove every book whose title exactly matches (case-sensitive). Use a title from `list_books` output.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_book(
        &self,
        Parameters(req): Parameters<McpRemoveBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut catalog = self.write_catalog()?;
        if catalog.list_books().is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No books to remove.",
            )]));
        }

        let removed = catalog
            .remove_book(&req.title)
            .map_err(Self::to_mcp_error)?;
        tracing::info!(title = %req.title, removed, "Book removed");

        let message = match removed {
            0 => format!("No book titled '{}'", req.title),
            1 => format!("Removed 1 book titled '{}'", req.title),
            n => format!("Removed {} books titled '{}'", n, req.title),
        };
        Ok(CallToolResult::success(vec![Content::text(message)]))
    }

    #[tool(
        name = "search_books",
        description = "Search books by title or author (case-insensitive substring match). Results keep library order.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchBooksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let field = parse_search_field(&req.search_by)?;
        let catalog = self.read_catalog()?;
        let results = catalog.search_books(field, &req.query);

        if results.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No matching books found.",
            )]));
        }

        let output = format!(
            "# Matching Books ({})\n\n{}",
            results.len(),
            ReportService::render_books(results)
        );
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "list_books",
        description = "List all books in insertion order.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpListBooksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let catalog = self.read_catalog()?;
        let books = catalog.list_books();

        if books.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "Library is empty. Use `add_book` to add books.",
            )]));
        }

        let output = format!(
            "# All Books ({})\n\n{}",
            books.len(),
            ReportService::render_books(books)
        );
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "library_stats",
        description = "Show total number of books and the percentage read.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn library_stats(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpStatsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let catalog = self.read_catalog()?;
        let stats = catalog.compute_stats();
        Ok(CallToolResult::success(vec![Content::text(
            ReportService::render_stats(&stats),
        )]))
    }
}

// =============================================================================
// Tests
// =============================================================================
