//! Typed Rust client for the CDEK integration API.
//!
//! The crate is split into a domain layer of strong types and request document builders,
//! a transport layer for the XML and JSON wire formats, and a small client layer
//! orchestrating requests.
//!
//! ```rust,no_run
//! use cdek::{CdekClient, CityRef, Credentials, Good, ShippingCostRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cdek::CdekError> {
//!     let client = CdekClient::new(Credentials::from_parts("account", "secure password")?);
//!     let request = ShippingCostRequest::builder(CityRef::Id(270), CityRef::Id(44))
//!         .good(Good::Dimensions { weight: 0.5, length: 10, width: 10, height: 10 })
//!         .tariffs([3_u32, 1])
//!         .build()?;
//!     let cost = client.shipping_cost(request).await?;
//!     println!("{} {}", cost.price, cost.currency.unwrap_or_default());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod signature;
pub mod transport;

pub use client::{
    CdekClient, CdekClientBuilder, CdekError, ConfigError, Credentials, DEFAULT_BASE_URL,
    EDUCATIONAL_BASE_URL,
};
pub use domain::{
    Account, ActNumber, CallCourier, CallOptions, CallWindow, City, CityRef, CourierAddress,
    DeleteRequest, DeliveryAddress, DeliveryPoint, DeliveryPoints, DeliveryPointsQuery,
    DeliveryRequest, DispatchNumber, Document, Element, Good, InfoRequest, ItemDetails,
    LocationQuery, OrderDetails, OrderNumber, OrderOptions, OrdersPackagesPrint, OrdersPrint,
    PackageOptions, PhoneNumber, PointType, PreAlert, PrintResponse, PvzCode, RawPhoneNumber,
    RecipientName, Record, Region, SecurePassword, ServiceParam, ShippingCost,
    ShippingCostRequest, StatusReport, TariffCode, ValidationError,
};
pub use signature::compute_signature;
