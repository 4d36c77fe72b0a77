use crate::core::graph_element::{ElementKey, GraphElement, Properties};
use crate::core::{StorageError, Value};

/// 批量更新所需的存储接口
///
/// 每个写操作对单个元素是原子的；跨元素的原子性由上层的锁与两阶段执行保证
pub trait StorageClient: Send + Sync + std::fmt::Debug {
    /// 按键查找元素
    fn find_by_key(&self, key: &ElementKey) -> Result<Option<GraphElement>, StorageError>;

    /// 顶点id是否存在
    fn vertex_exists(&self, id: &Value) -> Result<bool, StorageError>;

    /// 创建元素，由存储根据键分配id并返回创建后的元素
    ///
    /// 键已存在时返回 `StorageError::AlreadyExists`
    fn create(&mut self, key: &ElementKey, element: GraphElement) -> Result<GraphElement, StorageError>;

    /// 用新的属性集整体替换已存在元素的属性
    fn replace_properties(
        &mut self,
        key: &ElementKey,
        properties: Properties,
    ) -> Result<GraphElement, StorageError>;

    fn get_storage_stats(&self) -> StorageStats;
}

/// 存储统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub total_vertices: usize,
    pub total_edges: usize,
    /// 累计成功的写操作次数（创建与替换）
    pub total_writes: u64,
}
