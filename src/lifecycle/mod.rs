//! Process lifecycle helpers for the replay binary

mod shutdown;

pub use shutdown::ShutdownSignal;
