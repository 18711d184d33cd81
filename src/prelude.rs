pub use anyhow::{anyhow, bail, Error, Result};
pub use log::{debug, error, info, trace, warn};
pub use tokio::sync::broadcast;

pub use crate::channels::Channels;
pub use crate::config::{self, Config, ConfigWrapper};
pub use crate::file_error;
pub use crate::options::Options;
pub use crate::poller::{self, Poller};
pub use crate::sunspec::{self, SunSpecConnection};
