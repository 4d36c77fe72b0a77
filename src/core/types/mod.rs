// 请求类型

pub mod batch;

pub use batch::{BatchRequest, BatchRequestBuilder};
