pub mod dispatch;
pub mod hook;
pub mod hooks;
pub mod impact;
pub mod ingest;
pub mod link;
pub mod shared;
