//! Service layer for decode/encode collaborators

pub mod io;

pub use io::{ChannelPolicy, ImageIoService};
