//! 编码表缓存
//! 进程级缓存对象：初始为空 -> 首次使用时填充 -> 可手动失效。
//! 同一键的并发未命中只发出一次请求，其余调用方等待同一结果；
//! 请求失败时清除该键，下次调用重新请求

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::debug;

use super::model::CodeItem;
use crate::error::{RegionPickError, RpResult};

type CodeList = Arc<Vec<CodeItem>>;
type Outcome = Result<CodeList, Arc<RegionPickError>>;

enum Slot {
    Ready(CodeList),
    Pending(watch::Receiver<Option<Outcome>>),
}

enum Role {
    Leader(watch::Sender<Option<Outcome>>),
    Follower(watch::Receiver<Option<Outcome>>),
}

/// 编码表缓存
#[derive(Default)]
pub struct CodeCache {
    slots: Mutex<HashMap<String, Slot>>,
}

/// 发起请求的一方被取消（Future 被丢弃）时清理挂起条目
struct PendingGuard<'a> {
    cache: &'a CodeCache,
    key: &'a str,
    settled: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let mut slots = self.cache.lock();
            if matches!(slots.get(self.key), Some(Slot::Pending(_))) {
                slots.remove(self.key);
            }
            debug!("编码表请求被取消，清除挂起条目：{}", self.key);
        }
    }
}

impl CodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // 锁内不会 panic，中毒时直接沿用内部数据
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 已缓存的值
    pub fn get(&self, key: &str) -> Option<CodeList> {
        match self.lock().get(key) {
            Some(Slot::Ready(list)) => Some(list.clone()),
            _ => None,
        }
    }

    /// 命中直接返回；未命中时由第一个调用方执行 fetch，其余调用方合并等待
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> RpResult<CodeList>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RpResult<Vec<CodeItem>>>,
    {
        loop {
            let role = {
                let mut slots = self.lock();
                match slots.get(key) {
                    Some(Slot::Ready(list)) => {
                        debug!("编码表缓存命中：{}", key);
                        return Ok(list.clone());
                    }
                    Some(Slot::Pending(rx)) => Role::Follower(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        slots.insert(key.to_string(), Slot::Pending(rx));
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Follower(rx) => {
                    debug!("编码表请求合并：{}", key);
                    match Self::wait(rx).await {
                        Some(Ok(list)) => return Ok(list),
                        Some(Err(err)) => return Err(RegionPickError::SharedFetchError(err)),
                        // 发起方被取消，重新竞争
                        None => continue,
                    }
                }
                Role::Leader(tx) => {
                    debug!("编码表缓存未命中，发起请求：{}", key);
                    let mut guard = PendingGuard {
                        cache: self,
                        key,
                        settled: false,
                    };
                    let result = fetch().await;
                    guard.settled = true;
                    return self.settle(key, tx, result);
                }
            }
        }
    }

    fn settle(
        &self,
        key: &str,
        tx: watch::Sender<Option<Outcome>>,
        result: RpResult<Vec<CodeItem>>,
    ) -> RpResult<CodeList> {
        match result {
            Ok(items) => {
                let list: CodeList = Arc::new(items);
                self.lock().insert(key.to_string(), Slot::Ready(list.clone()));
                // 没有等待方时发送失败，忽略即可
                let _ = tx.send(Some(Ok(list.clone())));
                Ok(list)
            }
            Err(err) => {
                self.lock().remove(key);
                let shared = Arc::new(err);
                let _ = tx.send(Some(Err(shared.clone())));
                drop(tx);
                // 无人共享时把原始错误还给发起方
                Err(Arc::try_unwrap(shared).unwrap_or_else(RegionPickError::SharedFetchError))
            }
        }
    }

    async fn wait(mut rx: watch::Receiver<Option<Outcome>>) -> Option<Outcome> {
        loop {
            if let Some(outcome) = rx.borrow_and_update().clone() {
                return Some(outcome);
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }

    /// 使某个键失效；进行中的请求不受影响
    pub fn invalidate(&self, key: &str) -> bool {
        let mut slots = self.lock();
        if matches!(slots.get(key), Some(Slot::Ready(_))) {
            slots.remove(key);
            true
        } else {
            false
        }
    }

    /// 清空所有已完成的缓存
    pub fn clear(&self) {
        self.lock().retain(|_, slot| matches!(slot, Slot::Pending(_)));
    }

    /// 已缓存（已完成）的键数量
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn items(codes: &[&str]) -> Vec<CodeItem> {
        codes
            .iter()
            .map(|c| CodeItem {
                code: c.to_string(),
                name: format!("name-{}", c),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_populates_once() {
        let cache = CodeCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let list = cache
                .get_or_fetch("sido", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(items(&["11", "26"]))
                })
                .await
                .unwrap();
            assert_eq!(list.len(), 2);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let cache = CodeCache::new();
        let calls = AtomicUsize::new(0);
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let leader = cache.get_or_fetch("jobTop", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            release_rx.await.ok();
            Ok(items(&["01"]))
        });
        let follower = cache.get_or_fetch("jobTop", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(items(&["never"]))
        });
        let release = async {
            tokio::task::yield_now().await;
            release_tx.send(()).ok();
        };

        let (a, b, _) = tokio::join!(leader, follower, release);
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a[0].code, "01");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_shared_then_cleared() {
        let cache = CodeCache::new();
        let calls = AtomicUsize::new(0);
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let leader = cache.get_or_fetch("supportTag", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            release_rx.await.ok();
            Err(RegionPickError::InvalidInput("boom".to_string()))
        });
        let follower = cache.get_or_fetch("supportTag", || async { Ok(items(&["x"])) });
        let release = async {
            tokio::task::yield_now().await;
            release_tx.send(()).ok();
        };

        let (a, b, _) = tokio::join!(leader, follower, release);
        assert!(a.is_err());
        assert!(matches!(b, Err(RegionPickError::SharedFetchError(_))));
        assert!(cache.get("supportTag").is_none());

        // 失败不会被缓存，下一次调用重新请求
        let retried = cache
            .get_or_fetch("supportTag", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(items(&["HOUSING_SUPPORT"]))
            })
            .await
            .unwrap();
        assert_eq!(retried[0].code, "HOUSING_SUPPORT");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lone_failure_returns_fetch_error() {
        let cache = CodeCache::new();
        let err = cache
            .get_or_fetch("sido", || async { Err(RegionPickError::InvalidInput("x".to_string())) })
            .await
            .unwrap_err();
        assert!(matches!(err, RegionPickError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_cancelled_leader_clears_pending() {
        let cache = CodeCache::new();
        let stalled = tokio::time::timeout(
            Duration::from_millis(20),
            cache.get_or_fetch("sigungu:11", || std::future::pending::<RpResult<Vec<CodeItem>>>()),
        )
        .await;
        assert!(stalled.is_err());

        let list = cache
            .get_or_fetch("sigungu:11", || async { Ok(items(&["11110"])) })
            .await
            .unwrap();
        assert_eq!(list[0].code, "11110");
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = CodeCache::new();
        cache.get_or_fetch("a", || async { Ok(items(&["1"])) }).await.unwrap();
        cache.get_or_fetch("b", || async { Ok(items(&["2"])) }).await.unwrap();

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
