pub mod generation;
pub mod images;
pub mod prompts;
pub mod queue;
pub mod storage;
