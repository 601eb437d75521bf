use crate::graphql::{build_schema, run_server};
use anyhow::Result;

use super::CommandContext;

fn variables(raw: Option<String>) -> Result<async_graphql::Variables> {
    Ok(match raw {
        Some(v) => serde_json::from_str(&v)?,
        None => async_graphql::Variables::default(),
    })
}

fn execute(ctx: CommandContext, query: String, vars: Option<String>) -> Result<()> {
    let schema = build_schema(ctx.config, ctx.root);
    let request = async_graphql::Request::new(query).variables(variables(vars)?);
    let response = tokio::runtime::Runtime::new()?.block_on(schema.execute(request));

    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.errors.is_empty() {
        anyhow::bail!("GraphQL request returned {} error(s)", response.errors.len());
    }
    Ok(())
}

pub fn handle_query(ctx: CommandContext, query: String, variables: Option<String>) -> Result<()> {
    execute(ctx, query, variables)
}

pub fn handle_mutate(ctx: CommandContext, mutation: String, variables: Option<String>) -> Result<()> {
    // Auto-wrap in mutation { }
    execute(ctx, format!("mutation {{ {} }}", mutation), variables)
}

pub fn handle_serve(ctx: CommandContext, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(ctx.config.server.port);
    let schema = build_schema(ctx.config, ctx.root);

    println!("Starting GraphQL server on http://localhost:{}", port);
    println!("GraphiQL: http://localhost:{}", port);

    tokio::runtime::Runtime::new()?.block_on(run_server(schema, port))?;
    Ok(())
}
