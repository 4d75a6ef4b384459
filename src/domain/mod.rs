pub mod clock;
pub mod event_queue;
pub mod ledger;
pub mod mapping;
pub mod request;
pub mod router;
pub mod substrate;
