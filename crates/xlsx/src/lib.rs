//! XLSX (Office Open XML) writer backend for place detail exports.
//!
//! Produces .xlsx workbooks, which are ZIP archives containing XML parts, and
//! hands them to a host-provided [`SaveTarget`].

pub mod target;
pub mod writer;

pub use target::{DirectoryTarget, MemoryTarget, SaveTarget, SavedFile};
pub use writer::{ExportArtifact, XlsxExporter, DEFAULT_SHEET_NAME};
