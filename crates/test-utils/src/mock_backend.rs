use std::collections::{HashSet, VecDeque};
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use watchsup::errors::{Result, SupervisorError};
use watchsup::exec::ProcessBackend;

/// One entry in the recorded lifecycle log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Started(u32),
    Stopped(u32),
    LaunchFailed,
}

/// Handle returned by [`MockBackend`].
#[derive(Debug)]
pub struct MockHandle {
    pub id: u32,
}

#[derive(Debug, Default)]
struct Inner {
    log: Vec<Lifecycle>,
    live: HashSet<u32>,
    max_live: usize,
    next_id: u32,
    /// Scripted launch outcomes; `true` = succeed. Empty = always succeed.
    script: VecDeque<bool>,
}

/// A fake process backend that:
/// - records every start/stop in order
/// - tracks how many "children" were live at the same time
/// - can be scripted to fail specific launches
///
/// Clones share state, so a test can keep one handle for assertions while the
/// supervisor owns another.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue launch outcomes, consumed one per launch attempt.
    pub fn script_launches(&self, outcomes: &[bool]) {
        self.inner.lock().unwrap().script.extend(outcomes.iter().copied());
    }

    pub fn log(&self) -> Vec<Lifecycle> {
        self.inner.lock().unwrap().log.clone()
    }

    pub fn starts(&self) -> usize {
        self.count(|e| matches!(e, Lifecycle::Started(_)))
    }

    pub fn stops(&self) -> usize {
        self.count(|e| matches!(e, Lifecycle::Stopped(_)))
    }

    pub fn failures(&self) -> usize {
        self.count(|e| matches!(e, Lifecycle::LaunchFailed))
    }

    pub fn live(&self) -> usize {
        self.inner.lock().unwrap().live.len()
    }

    /// Largest number of simultaneously live children ever observed.
    pub fn max_live(&self) -> usize {
        self.inner.lock().unwrap().max_live
    }

    fn count(&self, pred: impl Fn(&Lifecycle) -> bool) -> usize {
        self.inner.lock().unwrap().log.iter().filter(|&e| pred(e)).count()
    }
}

impl ProcessBackend for MockBackend {
    type Handle = MockHandle;

    fn launch(&mut self) -> Pin<Box<dyn Future<Output = Result<Self::Handle>> + Send + '_>> {
        let result = {
            let mut guard = self.inner.lock().unwrap();
            if guard.script.pop_front().unwrap_or(true) {
                guard.next_id += 1;
                let id = guard.next_id;
                guard.live.insert(id);
                guard.max_live = guard.max_live.max(guard.live.len());
                guard.log.push(Lifecycle::Started(id));
                Ok(MockHandle { id })
            } else {
                guard.log.push(Lifecycle::LaunchFailed);
                Err(SupervisorError::LaunchError(
                    "scripted launch failure".to_string(),
                ))
            }
        };
        Box::pin(future::ready(result))
    }

    fn terminate(
        &mut self,
        handle: Self::Handle,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        {
            let mut guard = self.inner.lock().unwrap();
            guard.live.remove(&handle.id);
            guard.log.push(Lifecycle::Stopped(handle.id));
        }
        Box::pin(future::ready(Ok(())))
    }
}

/// Assert that lifetimes in `log` never overlap: every start after the first
/// is preceded by the stop of the previous child.
pub fn assert_no_overlap(log: &[Lifecycle]) {
    let mut live: Option<u32> = None;
    for event in log {
        match *event {
            Lifecycle::Started(id) => {
                assert!(
                    live.is_none(),
                    "child {id} started while {live:?} was still live: {log:?}"
                );
                live = Some(id);
            }
            Lifecycle::Stopped(id) => {
                assert_eq!(live, Some(id), "stopped unknown child {id}: {log:?}");
                live = None;
            }
            Lifecycle::LaunchFailed => {}
        }
    }
}
