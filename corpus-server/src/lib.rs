//! HTTP service for corpus.
//!
//! Exposes the upload-and-ask surface over the retrieval pipeline:
//! `POST /upload` archives and indexes a document, `POST /ask` answers a
//! question from the indexed corpus.

pub mod config;
pub mod error;
pub mod server;
pub mod storage;

pub use config::ServerConfig;
pub use error::AppError;
pub use server::{AppState, AskRequest, AskResponse, UploadResponse, app_router, run_server};
pub use storage::{FsObjectStore, ObjectStore, StorageError};
