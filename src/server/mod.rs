// Server module entry
// Listener setup, connection handling, accept loop and signal handling

pub mod accept_loop;
pub mod connection;
pub mod listener;
pub mod signal;

pub use accept_loop::start_server_loop;
pub use listener::create_listener;
pub use signal::{start_signal_handler, SignalHandler};
