pub mod event;
pub mod month;
pub mod mood;
pub mod task;
