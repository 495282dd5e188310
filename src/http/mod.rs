pub(crate) mod client;
pub(crate) mod request;

pub use client::HttpClient;
pub use request::HttpRequest;
