//! Client facade.
//!
//! [`UtopianLabs`] owns the transport adapter; endpoint groups borrow it:
//!
//! ```rust,no_run
//! use utopian_labs::types::GetRunRequest;
//! use utopian_labs::UtopianLabs;
//!
//! # async fn run() -> utopian_labs::Result<()> {
//! let client = UtopianLabs::new("sk-...")?;
//! let run = client
//!     .agents()
//!     .runs()
//!     .get_typed(&GetRunRequest::new("run_1"))
//!     .await?;
//! println!("{} is {}", run.id(), run.status().as_str());
//! # Ok(())
//! # }
//! ```

mod builder;
mod core;
mod me;
mod runs;

pub use self::builder::UtopianLabsBuilder;
pub use self::core::UtopianLabs;
pub use self::runs::{AgentRuns, Agents};
