use users_api::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let repository = InMemoryUserRepository::new();
    let state = AppState::new(config.clone(), repository);

    let result = Server::new(config).serve(router(state)).await;
    shutdown_tracing();
    result
}
