//! Entity row types, grouped by family.
//!
//! Every model carries `id`, its domain fields, and the two lifecycle
//! timestamps; each implements [`fleetops_core::Entity`] with its declared
//! required-field list, which is the only per-entity code in the system.
//!
//! Deserialization defaults (nil id, empty strings, epoch timestamps) are
//! deliberate: a sparse request body reaches the validation engine intact so
//! the caller gets every violation in one aggregated report instead of a
//! serde error per missing field.

pub mod address;
pub mod car;
pub mod driver_license;
pub mod offer;
pub mod penalty;
pub mod service;
pub mod user;

pub use address::Address;
pub use car::{Car, CarModel, CarType};
pub use driver_license::DriverLicense;
pub use offer::{Offer, OfferType};
pub use penalty::Penalty;
pub use service::{Category, Service, ServiceType};
pub use user::User;
