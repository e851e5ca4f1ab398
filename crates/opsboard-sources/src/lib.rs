//! opsboard-sources - LogSource implementations
//!
//! - [`LocalLogSource`] reads a real log directory (local mode)
//! - [`MockLogSource`] serves canned in-memory logs (hosted/mock mode)

pub mod fs;
pub mod mock;

pub use fs::{LocalLogSource, DEFAULT_READ_TIMEOUT};
pub use mock::{MockLogSource, MOCK_LOCATION};
