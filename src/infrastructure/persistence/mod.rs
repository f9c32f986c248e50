mod repositories;
mod session_repository_factory;

pub use repositories::{InMemorySessionRepository, PgSessionRepository};
pub use session_repository_factory::SessionRepositoryFactory;
