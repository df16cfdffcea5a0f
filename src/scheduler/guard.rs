use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 守卫序列的进行中标志
///
/// 同一时刻最多一个持有者；标志由 [`CyclePermit`] 在 drop 时清除，
/// 所以提前返回、跳过或超时都不会把标志永久留在 `true`
#[derive(Clone, Debug, Default)]
pub struct CycleGuard {
    in_progress: Arc<AtomicBool>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<CyclePermit> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CyclePermit {
                flag: Arc::clone(&self.in_progress),
            })
    }

    pub fn is_running(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct CyclePermit {
    flag: Arc<AtomicBool>,
}

impl Drop for CyclePermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_permit_at_a_time() {
        let guard = CycleGuard::new();
        let permit = guard.try_acquire().expect("first acquire");
        assert!(guard.is_running());
        assert!(guard.try_acquire().is_none());
        assert!(guard.clone().try_acquire().is_none());

        drop(permit);
        assert!(!guard.is_running());
        assert!(guard.try_acquire().is_some());
    }
}
