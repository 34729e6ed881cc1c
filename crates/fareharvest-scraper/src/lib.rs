pub mod classify;
pub mod client;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod outcome;
pub mod pacing;
pub mod split;

pub use classify::{classify, PageStatus, CHALLENGE_MARKER};
pub use client::{KayakClient, SessionConfig};
pub use error::ScraperError;
pub use extract::extract_page;
pub use fetch::{PageFetcher, SearchTarget};
pub use outcome::PageOutcome;
pub use pacing::Pacing;
pub use split::{split_price_and_channel, PriceSplit};
