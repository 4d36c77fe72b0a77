pub mod schema_manager;
pub mod types;

pub use self::schema_manager::{MemorySchemaManager, SchemaManager};
pub use self::types::{Cardinality, DataType, EdgeLabel, PropertyKey, SchemaDefinition, VertexLabel};
