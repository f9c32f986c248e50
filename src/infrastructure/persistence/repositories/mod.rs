mod in_memory_session_repository;
mod pg_session_repository;

pub use in_memory_session_repository::InMemorySessionRepository;
pub use pg_session_repository::PgSessionRepository;
