pub mod account;
pub mod task;

pub use account::{AccountRecord, ContractAddresses, LookupField};
pub use task::{NewTask, TaskId, TaskRecord, TaskTime};
