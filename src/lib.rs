//! Client for the Ancestry DNA match service.
//!
//! The service has no public API. This library borrows the cookies of a
//! browser that is already logged in and talks to the same endpoints the
//! website uses: test kits, ethnicity estimates, the paged match list,
//! shared ancestors and tree comparisons, and custom match groups.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ancestry_dna::{Config, DnaClient, FilterSet};
//! use ancestry_dna::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let mut client = DnaClient::connect(&config)?;
//!
//!     let tests = client.get_tests("completeTests").await?;
//!     println!("{} tests", tests.len());
//!
//!     client.use_test("00000000-0000-0000-0000-000000000000");
//!     let filters = FilterSet::new()
//!         .with("minshareddna", "20")
//!         .with("maxshareddna", "400");
//!     let matches = client.get_dna_matches("DATE", &filters, None).await?;
//!
//!     for (group, records) in matches.iter() {
//!         println!("{group}: {}", records.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod dna_api;
pub mod error;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use dna_api::{DnaClient, FilterSet, GroupAction, MatchGroups, Session, SortType};
pub use error::AppError;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
