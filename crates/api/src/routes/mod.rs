pub mod health;

use std::sync::Arc;

use axum::Router;

use serde::de::DeserializeOwned;
use serde::Serialize;

use fleetops_core::{
    Clock, Entity, FailureLogger, FoundationService, StorageBroker, SystemClock, TracingLogger,
};
use fleetops_db::brokers::{
    AddressBroker, CarBroker, CarModelBroker, CarTypeBroker, CategoryBroker, DriverLicenseBroker,
    OfferBroker, OfferTypeBroker, PenaltyBroker, ServiceBroker, ServiceTypeBroker, UserBroker,
};
use fleetops_db::DbPool;

use crate::handlers::crud;

/// Build the `/api/v1` route tree.
///
/// Every entity gets the same five-operation CRUD surface:
///
/// ```text
/// /users                  /users/{id}
/// /addresses              /addresses/{id}
/// /driver-licenses        /driver-licenses/{id}
/// /cars                   /cars/{id}
/// /car-models             /car-models/{id}
/// /car-types              /car-types/{id}
/// /offers                 /offers/{id}
/// /offer-types            /offer-types/{id}
/// /penalties              /penalties/{id}
/// /services               /services/{id}
/// /service-types          /service-types/{id}
/// /categories             /categories/{id}
/// ```
pub fn api_routes(pool: &DbPool) -> Router {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let logger: Arc<dyn FailureLogger> = Arc::new(TracingLogger);

    Router::new()
        .nest(
            "/users",
            entity_routes(UserBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/addresses",
            entity_routes(AddressBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/driver-licenses",
            entity_routes(DriverLicenseBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/cars",
            entity_routes(CarBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/car-models",
            entity_routes(CarModelBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/car-types",
            entity_routes(CarTypeBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/offers",
            entity_routes(OfferBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/offer-types",
            entity_routes(OfferTypeBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/penalties",
            entity_routes(PenaltyBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/services",
            entity_routes(ServiceBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/service-types",
            entity_routes(ServiceTypeBroker::new(pool.clone()), &clock, &logger),
        )
        .nest(
            "/categories",
            entity_routes(CategoryBroker::new(pool.clone()), &clock, &logger),
        )
}

fn entity_routes<E, B>(
    broker: B,
    clock: &Arc<dyn Clock>,
    logger: &Arc<dyn FailureLogger>,
) -> Router
where
    E: Entity + Serialize + DeserializeOwned,
    B: StorageBroker<E> + 'static,
{
    crud::router(FoundationService::new(
        broker,
        Arc::clone(clock),
        Arc::clone(logger),
    ))
}
