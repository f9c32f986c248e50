pub mod audio;
pub mod avatar;
pub mod diagnostics;
pub mod llm;
pub mod observability;
pub mod persistence;
pub mod speech;
pub mod storage;
