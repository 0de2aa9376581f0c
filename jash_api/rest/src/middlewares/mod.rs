pub mod no_store;
pub mod panic_handler;
pub mod request_id;
pub mod trace;
