// Resume records: creation from an upload and/or typed-in fields, owner-scoped
// reads and edits, deletion with best-effort file cleanup, file download.

pub mod handlers;
pub mod repo;
pub mod service;
pub mod upload;
