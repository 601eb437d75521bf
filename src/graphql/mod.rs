//! GraphQL schema and resolvers for furrow.
//!
//! Exposes every farm operation over GraphQL so dashboards and scripts can
//! read and change the same records as the CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Start the GraphQL server
//! furrow serve --port 4000
//!
//! # Execute a query from CLI
//! furrow query '{ overview { poolBalance lowStock { name quantity } } }'
//!
//! # Execute a mutation from CLI
//! furrow mutate 'logWork(input: { companyId: "...", projectId: "tea", workers: 4, workType: "weeding" }) { id }'
//! ```
//!
//! ## Schema
//!
//! - **Queries**: `companies`, `items`, `lowStock`, `itemHistory`, `neededItems`, `collections`,
//!   `pickerTotals`, `collectionSummary`, `cashPools`, `workLogs`, `laborSummary`, `workCards`,
//!   `workCardVariance`, `challenges`, `challengeSummary`, `overview` and single-record lookups
//! - **Mutations**: one per operation, e.g. `restockItem`, `useItem`, `receiveNeededItem`,
//!   `recordWeight`, `payPickers`, `closeCollection`, `topUp`, `approveWorkCard`, `resolveChallenge`
//!
//! Money and weights are `Decimal` scalars sent as strings; dates are `YYYY-MM-DD` strings.

mod mutation;
mod query;
mod schema;
mod types;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::{Router, response::Html, routing::get};

pub use schema::{AppState, FurrowSchema, build_schema};
pub use types::*;

/// Serves GraphiQL on `GET /` and the API on `POST /` until the process is stopped.
pub async fn run_server(schema: FurrowSchema, port: u16) -> std::io::Result<()> {
    let app = Router::new().route(
        "/",
        get(|| async { Html(GraphiQLSource::build().endpoint("/").finish()) })
            .post_service(GraphQL::new(schema)),
    );

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!(port, "GraphQL server listening");
    axum::serve(listener, app).await
}
