use std::net::SocketAddr;
use lambda_http::{run, Error};
use tracing::info;
use restbooks::catalog::controller::build_router;
use restbooks::catalog::factory::create_catalog_service;
use restbooks::core::controller::AppState;
use restbooks::core::domain::Configuration;
use restbooks::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Configuration::from_env();
    setup_tracing(&config);

    let catalog = create_catalog_service(&config).await;
    let state = AppState::new(config.clone(), catalog);

    if config.lambda {
        info!("starting lambda handler with {} store", config.store);
        return run(build_router(state)).await;
    }

    let app = build_router(state);
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("listening on {} with {} store", addr, config.store);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
