pub mod completion;
pub mod feed;
pub mod storage;
pub mod tools;
