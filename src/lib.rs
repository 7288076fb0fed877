pub mod cli;
pub mod config;
pub mod error;
pub mod framework;
pub mod logging;
pub mod replay;
pub mod report;
pub mod state;
pub mod time;
pub mod transport;
pub mod value;

pub use error::{Error, Result};
pub use report::{EventReporter, Reporter};
pub use transport::{EventSink, Transport};
