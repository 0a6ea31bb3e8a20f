use axum::Router;
use domain_users::{InMemoryUserRepository, UserService, handlers};

pub fn router(config: &crate::config::Config) -> Router {
    let repository = InMemoryUserRepository::new();
    let service = UserService::new(repository, config.users);
    handlers::router(service)
}
