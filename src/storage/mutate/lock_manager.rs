//! 内存锁管理器
//!
//! 以元素键为粒度的互斥锁，保证同一键同时至多有一个批次在修改。
//! 一个批次的所有键一次性获取（全部或等待），避免加锁顺序导致的死锁

use crate::core::graph_element::ElementKey;
use crate::core::StorageError;
use parking_lot::{Condvar, Mutex};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 默认的等锁超时
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_millis(5000);

/// 内存锁管理器
#[derive(Debug)]
pub struct MemoryLockManager {
    /// 已锁定的键集合
    locked_keys: Mutex<HashSet<ElementKey>>,
    released: Condvar,
    wait_timeout: Duration,
}

impl MemoryLockManager {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_LOCK_WAIT)
    }

    pub fn with_timeout(wait_timeout: Duration) -> Self {
        Self {
            locked_keys: Mutex::new(HashSet::new()),
            released: Condvar::new(),
            wait_timeout,
        }
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// 尝试批量获取锁，不等待
    ///
    /// # Returns
    /// * `true` - 所有键都已锁定
    /// * `false` - 有键被占用，不会获取任何锁
    pub fn try_lock_batch(&self, keys: &[ElementKey]) -> bool {
        let mut locked = self.locked_keys.lock();
        if keys.iter().any(|k| locked.contains(k)) {
            return false;
        }
        locked.extend(keys.iter().cloned());
        true
    }

    /// 批量获取锁，最多等待管理器的默认超时
    pub fn lock_batch<I>(self: &Arc<Self>, keys: I) -> Result<LockGuard, StorageError>
    where
        I: IntoIterator<Item = ElementKey>,
    {
        self.lock_batch_within(keys, self.wait_timeout)
    }

    /// 批量获取锁，键被占用时等待，超过 `timeout` 返回 `StorageError::LockTimeout`
    ///
    /// 重复的键只锁一次；返回的守卫在 Drop 时释放所有键
    pub fn lock_batch_within<I>(self: &Arc<Self>, keys: I, timeout: Duration) -> Result<LockGuard, StorageError>
    where
        I: IntoIterator<Item = ElementKey>,
    {
        let keys: Vec<ElementKey> = keys.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let deadline = Instant::now() + timeout;

        let mut locked = self.locked_keys.lock();
        while let Some(busy) = keys.iter().find(|k| locked.contains(*k)) {
            let busy = busy.to_string();
            if self.released.wait_until(&mut locked, deadline).timed_out()
                && keys.iter().any(|k| locked.contains(k))
            {
                log::warn!("等待元素锁超时: {}", busy);
                return Err(StorageError::LockTimeout(busy));
            }
        }
        locked.extend(keys.iter().cloned());
        drop(locked);

        Ok(LockGuard {
            lock_manager: Arc::clone(self),
            keys,
        })
    }

    /// 批量释放锁并唤醒等待者
    pub fn unlock_batch(&self, keys: &[ElementKey]) {
        let mut locked = self.locked_keys.lock();
        for key in keys {
            locked.remove(key);
        }
        drop(locked);
        self.released.notify_all();
    }

    pub fn is_locked(&self, key: &ElementKey) -> bool {
        self.locked_keys.lock().contains(key)
    }
}

impl Default for MemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 锁守卫
///
/// 自动管理锁的生命周期，在 Drop 时自动释放锁
#[derive(Debug)]
pub struct LockGuard {
    lock_manager: Arc<MemoryLockManager>,
    keys: Vec<ElementKey>,
}

impl LockGuard {
    /// 获取锁定的键，已去重并排序
    pub fn keys(&self) -> &[ElementKey] {
        &self.keys
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.lock_manager.unlock_batch(&self.keys);
    }
}
