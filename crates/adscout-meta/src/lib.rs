pub mod client;
pub mod error;
pub mod pager;
pub mod retry;
pub mod types;

pub use client::MetaClient;
pub use error::MetaError;
pub use pager::AdPager;
pub use retry::RetryPolicy;
pub use types::{AdQuery, AdsPage, Paging};
