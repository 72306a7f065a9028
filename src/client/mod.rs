pub mod extraction_client;
pub mod response;

pub use extraction_client::{ExtractionClient, ExtractionOptions};
pub use response::{truncate_chars, ExtractionOutcome, ExtractionResponse};
