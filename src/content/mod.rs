//! Web content retrieval
//!
//! - **paginator**: splits a fetched document into 30,000-char chunks with a
//!   continuation cursor
//! - **html**: HTML to plain text extraction
//! - **fetcher**: direct fetch with reader fallback for PDFs and failures

mod fetcher;
mod html;
mod paginator;

pub use fetcher::{is_pdf_content, is_pdf_url, WebContentFetcher};
pub use html::{collapse_whitespace, extract_text};
pub use paginator::{paginate, ContentChunk, CHUNK_SIZE};
