mod batch;
mod errors;
pub mod config;
pub mod outcome;
pub mod record;
pub mod router;
pub mod validate;

pub use batch::{parse_parcel_list, BatchRunner};
pub use config::ScraperConfig;
pub use errors::{ScraperError, ScraperResult};
pub use outcome::{BatchEntry, BatchResult, ErrorKind, Outcome};
pub use record::{Field, FieldValue, ParcelRecord};
pub use router::{route, SourceKind};
pub use validate::check_parcel;
