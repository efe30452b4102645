//! Paged listings: the front page (filtered or searched) and per-entity
//! shelves. Every response carries the `qos` token for the page it holds
//! so the next request can continue from it.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
};
use bookrack_core::catalog::DocumentPage;
use bookrack_core::query::{PageTurn, QueryOptions, RequestParams};
use bookrack_model::{Document, EntityFilter};
use serde::Serialize;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub count: u32,
    pub documents: Vec<Document>,
    pub qos: String,
}

impl ListingResponse {
    fn new(page: DocumentPage, options: &mut QueryOptions) -> Self {
        options.query_count = page.count;
        Self {
            count: page.count,
            documents: page.documents,
            qos: options.serialize(),
        }
    }
}

pub async fn browse(
    State(state): State<AppState>,
    Query(params): Query<RequestParams>,
) -> AppResult<Json<ListingResponse>> {
    listing(&state, &params).await.map(Json)
}

pub async fn browse_form(
    State(state): State<AppState>,
    Form(params): Form<RequestParams>,
) -> AppResult<Json<ListingResponse>> {
    listing(&state, &params).await.map(Json)
}

pub async fn by_entity(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, i64)>,
    Query(params): Query<RequestParams>,
) -> AppResult<Json<ListingResponse>> {
    entity_listing(&state, &entity, id, &params).await.map(Json)
}

/// Same as [`by_entity`]; the trailing name segment only makes the URL
/// readable.
pub async fn by_entity_named(
    State(state): State<AppState>,
    Path((entity, id, _name)): Path<(String, i64, String)>,
    Query(params): Query<RequestParams>,
) -> AppResult<Json<ListingResponse>> {
    entity_listing(&state, &entity, id, &params).await.map(Json)
}

async fn listing(
    state: &AppState,
    params: &RequestParams,
) -> AppResult<ListingResponse> {
    let mut options = state.restore_options(token(params));
    options.apply_request(params, state.libraries.as_ref());
    turn_page(&mut options, params);

    let page = if options.matching.is_empty() {
        state.repository.query_by(&options).await?
    } else {
        debug!(matching = %options.matching, "searching catalog");
        state.repository.query_search(&options).await?
    };

    Ok(ListingResponse::new(page, &mut options))
}

async fn entity_listing(
    state: &AppState,
    entity: &str,
    id: i64,
    params: &RequestParams,
) -> AppResult<ListingResponse> {
    let filter = EntityFilter::from_name(entity)
        .filter(|filter| *filter != EntityFilter::None)
        .ok_or_else(|| AppError::bad_request(format!("unknown entity: {entity}")))?;

    let mut options = state.restore_options(token(params));
    if options.entity != filter || options.id != id {
        options.entity = filter;
        options.id = id;
        options.matching.clear();
        options.virt_lib.clear();
        options.limit_start = 0;
    }
    turn_page(&mut options, params);

    let page = state.repository.query_by(&options).await?;
    Ok(ListingResponse::new(page, &mut options))
}

fn token(params: &RequestParams) -> Option<&str> {
    params.get("qos").map(String::as_str)
}

fn turn_page(options: &mut QueryOptions, params: &RequestParams) {
    if let Some(turn) = params
        .get("page")
        .and_then(|page| page.parse::<PageTurn>().ok())
    {
        options.turn_page(turn);
    }
}
