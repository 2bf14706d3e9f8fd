//! # Timers 模块
//!
//! 延迟动作队列。按截止时间排序，同一时刻按插入顺序出队。

use std::collections::BTreeMap;
use std::time::Duration;

/// 延迟动作队列
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    entries: BTreeMap<(Duration, u64), A>,
    next_seq: u64,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// 在 `at` 时刻执行 `action`
    pub fn schedule(&mut self, at: Duration, action: A) {
        self.entries.insert((at, self.next_seq), action);
        self.next_seq += 1;
    }

    /// 取出一个已到期的动作及其截止时间
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, A)> {
        let (&(at, _), _) = self.entries.first_key_value()?;
        if at > now {
            return None;
        }
        self.entries.pop_first().map(|((at, _), action)| (at, action))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
