use crate::server::graphql::{GraphQLContext, Schema};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use juniper::http::GraphQLRequest;
use std::sync::Arc;

/// POST /graphql - admin schema; resolvers check the JWT themselves
pub async fn graphql_handler(
    State(schema): State<Arc<Schema>>,
    Extension(context): Extension<Arc<GraphQLContext>>,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    let response = request.execute(&*schema, &*context).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(response)).into_response()
}

/// GraphiQL, served in debug builds only
pub async fn graphql_playground() -> Html<String> {
    Html(juniper::http::graphiql::graphiql_source("/graphql", None))
}
