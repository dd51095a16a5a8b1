pub mod cache;
pub mod client;
pub mod request;
pub mod response;

#[cfg(test)]
pub mod fake;

pub use cache::HttpCaller;
pub use client::ReqwestBackend;
pub use response::HttpResponse;
