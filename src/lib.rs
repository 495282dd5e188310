pub mod browser;
pub mod core;
pub mod http;
pub mod parser;
pub mod report;
pub mod sources;
pub mod stats;

pub use self::core::{BatchRunner, ScraperConfig};
pub use self::core::{ScraperError, ScraperResult};
pub use self::core::{BatchResult, Outcome, ParcelRecord};
pub use http::{HttpClient, HttpRequest};
pub use sources::CountySource;
pub use stats::StatsTracker;
