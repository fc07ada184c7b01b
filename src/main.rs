use std::sync::Arc;

use dotenvy::dotenv;

use gatehouse::logging::init_tracing;
use gatehouse::router::init_router;
use gatehouse::routes;
use gatehouse::state::init_app_state;
use gatehouse_core::OperationRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let specs = routes::collect();
    let entries = specs
        .iter()
        .map(|spec| spec.entry())
        .collect::<Result<Vec<_>, _>>()?;
    let registry = Arc::new(OperationRegistry::build(&entries)?);

    let state = init_app_state(registry).await;
    let app = init_router(state, specs)?;

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app).await?;

    Ok(())
}
