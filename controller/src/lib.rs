pub mod dispatch;
pub mod elevator;
pub mod floor;
pub mod inputs;
pub mod request_queue;
pub mod scheduler;
pub mod selector;
pub mod state_machine;
