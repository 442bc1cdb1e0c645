//! Generic CRUD handlers over the foundation service.
//!
//! One handler set serves every entity; per-entity wiring reduces to mounting
//! [`router`] with the entity's broker. The handlers never interpret
//! failures themselves: a [`fleetops_core::ServiceError`] passes through
//! `AppError` and is shaped by its `IntoResponse` impl.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;

use fleetops_core::{Entity, EntityId, FoundationService, StorageBroker};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

type Service<E, B> = Arc<FoundationService<E, B>>;

/// Mount the uniform five-operation route set for one entity:
///
/// ```text
/// GET    /          list all
/// POST   /          create
/// GET    /{id}      fetch one
/// PUT    /{id}      replace
/// DELETE /{id}      remove
/// ```
pub fn router<E, B>(service: FoundationService<E, B>) -> Router
where
    E: Entity + Serialize + DeserializeOwned,
    B: StorageBroker<E> + 'static,
{
    Router::new()
        .route("/", get(list::<E, B>).post(create::<E, B>))
        .route(
            "/{id}",
            get(get_by_id::<E, B>)
                .put(update::<E, B>)
                .delete(remove::<E, B>),
        )
        .with_state(Arc::new(service))
}

async fn create<E, B>(
    State(service): State<Service<E, B>>,
    Json(entity): Json<E>,
) -> AppResult<(StatusCode, Json<DataResponse<E>>)>
where
    E: Entity + Serialize + DeserializeOwned,
    B: StorageBroker<E>,
{
    let created = service.add(entity).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

async fn list<E, B>(
    State(service): State<Service<E, B>>,
) -> AppResult<Json<DataResponse<Vec<E>>>>
where
    E: Entity + Serialize,
    B: StorageBroker<E>,
{
    let entities = service.retrieve_all().await?;
    Ok(Json(DataResponse { data: entities }))
}

async fn get_by_id<E, B>(
    State(service): State<Service<E, B>>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<E>>>
where
    E: Entity + Serialize,
    B: StorageBroker<E>,
{
    let entity = service.retrieve_by_id(id).await?;
    Ok(Json(DataResponse { data: entity }))
}

async fn update<E, B>(
    State(service): State<Service<E, B>>,
    Path(id): Path<EntityId>,
    Json(entity): Json<E>,
) -> AppResult<Json<DataResponse<E>>>
where
    E: Entity + Serialize + DeserializeOwned,
    B: StorageBroker<E>,
{
    if entity.id() != id {
        return Err(AppError::BadRequest(format!(
            "path id {id} does not match body id {}",
            entity.id()
        )));
    }
    let updated = service.modify(entity).await?;
    Ok(Json(DataResponse { data: updated }))
}

async fn remove<E, B>(
    State(service): State<Service<E, B>>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<E>>>
where
    E: Entity + Serialize,
    B: StorageBroker<E>,
{
    let removed = service.remove_by_id(id).await?;
    Ok(Json(DataResponse { data: removed }))
}
