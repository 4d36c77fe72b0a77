pub mod error;
pub mod graph_element;
pub mod types;
pub mod update_strategy;
pub mod value;

// 错误和结果类型
pub use error::{BatchError, BatchResult, SchemaError, StorageError, ValidationError};

// 核心数据类型
pub use graph_element::{Edge, ElementKey, ElementKind, GraphElement, Properties, Vertex};
pub use types::{BatchRequest, BatchRequestBuilder};
pub use update_strategy::{MergeError, UpdateStrategy};
pub use value::*;
