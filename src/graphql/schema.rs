use std::path::PathBuf;
use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Schema};
use tokio::sync::Mutex;

use crate::config::FurrowConfig;
use crate::error::FurrowError;
use crate::store::Store;

use super::mutation::MutationRoot;
use super::query::QueryRoot;

pub type FurrowSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub struct AppState {
    pub config: FurrowConfig,
    pub project_root: PathBuf,
    /// Serializes mutations; each one reads, checks and writes several documents.
    pub write_lock: Mutex<()>,
}

impl AppState {
    pub fn store(&self) -> Store {
        Store::new(&self.config, &self.project_root)
    }
}

pub fn build_schema(config: FurrowConfig, project_root: PathBuf) -> FurrowSchema {
    let state = Arc::new(AppState {
        config,
        project_root,
        write_lock: Mutex::new(()),
    });

    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

pub(super) fn app_state<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<AppState>> {
    ctx.data::<Arc<AppState>>()
}

pub(super) fn get_store(ctx: &Context<'_>) -> async_graphql::Result<Store> {
    Ok(app_state(ctx)?.store())
}

/// Maps a missing document to `None` and converts the rest.
pub(super) fn optional<T, U: From<T>>(
    result: crate::error::Result<T>,
) -> async_graphql::Result<Option<U>> {
    match result {
        Ok(doc) => Ok(Some(doc.into())),
        Err(FurrowError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(super) fn list<T, U: From<T>>(
    result: crate::error::Result<Vec<T>>,
) -> async_graphql::Result<Vec<U>> {
    Ok(result?.into_iter().map(Into::into).collect())
}
