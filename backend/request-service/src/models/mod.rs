pub mod client;
pub mod request;
pub mod service;

pub use client::{Client, ClientSummary, NewClient};
pub use request::{Ack, RequestItem, RequestView};
pub use service::{CatalogService, NewCatalogService};
