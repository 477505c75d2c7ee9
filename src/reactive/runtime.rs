use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

pub type SignalId = usize;
pub type EffectId = usize;

pub(crate) type EffectCallback = Rc<RefCell<Box<dyn FnMut()>>>;

/// Thread-local bookkeeping for signals and effects.
///
/// Callbacks are never invoked while the runtime is borrowed: `run_effect`
/// clones the callback handle out, releases the borrow, then calls it. This
/// lets effects read and write signals (and create or drop other effects)
/// freely.
#[derive(Default)]
pub struct Runtime {
    current_effect: Option<EffectId>,
    pending_effects: VecDeque<EffectId>,
    effect_callbacks: Vec<Option<EffectCallback>>,
    effect_dependencies: Vec<HashSet<SignalId>>,
    signal_subscribers: Vec<HashSet<EffectId>>,
    batch_depth: usize,
    flushing: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_signal(&mut self) -> SignalId {
        let id = self.signal_subscribers.len();
        self.signal_subscribers.push(HashSet::new());
        id
    }

    pub fn release_signal(&mut self, signal_id: SignalId) {
        if let Some(subscribers) = self.signal_subscribers.get_mut(signal_id) {
            for effect_id in subscribers.drain() {
                if let Some(deps) = self.effect_dependencies.get_mut(effect_id) {
                    deps.remove(&signal_id);
                }
            }
        }
    }

    pub(crate) fn allocate_effect(&mut self, callback: Box<dyn FnMut()>) -> EffectId {
        let id = self.effect_callbacks.len();
        self.effect_callbacks
            .push(Some(Rc::new(RefCell::new(callback))));
        self.effect_dependencies.push(HashSet::new());
        id
    }

    pub fn track_read(&mut self, signal_id: SignalId) {
        if signal_id >= self.signal_subscribers.len() {
            return;
        }

        if let Some(effect_id) = self.current_effect
            && self.effect_callbacks[effect_id].is_some()
        {
            self.signal_subscribers[signal_id].insert(effect_id);
            self.effect_dependencies[effect_id].insert(signal_id);
        }
    }

    /// Queue every subscriber of `signal_id`. Returns true when the caller
    /// should flush (not batching and no flush already running).
    fn queue_subscribers(&mut self, signal_id: SignalId) -> bool {
        let Some(subscribers) = self.signal_subscribers.get(signal_id) else {
            return false;
        };

        // Sorted so that effects created earlier run first.
        let mut subscribers: Vec<_> = subscribers.iter().copied().collect();
        subscribers.sort_unstable();
        for effect_id in subscribers {
            if !self.pending_effects.contains(&effect_id) {
                self.pending_effects.push_back(effect_id);
            }
        }

        self.batch_depth == 0 && !self.flushing
    }

    /// Detach `effect_id` from its previous dependencies and make it current.
    /// Returns the callback to run and the effect that was current before.
    fn begin_run(&mut self, effect_id: EffectId) -> Option<(EffectCallback, Option<EffectId>)> {
        let callback = self.effect_callbacks.get(effect_id)?.clone()?;

        let old_deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in old_deps {
            self.signal_subscribers[signal_id].remove(&effect_id);
        }

        let prev_effect = self.current_effect.replace(effect_id);
        Some((callback, prev_effect))
    }

    /// Forget an effect. The callback is handed back so the caller can drop
    /// it after releasing the runtime borrow (dropping captured state may
    /// dispose further effects).
    pub(crate) fn dispose_effect(&mut self, effect_id: EffectId) -> Option<EffectCallback> {
        let deps = std::mem::take(self.effect_dependencies.get_mut(effect_id)?);
        for signal_id in deps {
            if let Some(subscribers) = self.signal_subscribers.get_mut(signal_id) {
                subscribers.remove(&effect_id);
            }
        }
        self.pending_effects.retain(|&id| id != effect_id);
        self.effect_callbacks[effect_id].take()
    }

    pub fn is_effect_alive(&self, effect_id: EffectId) -> bool {
        matches!(self.effect_callbacks.get(effect_id), Some(Some(_)))
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Try to access the runtime. Does nothing if the runtime is already
/// borrowed or the thread-local has been torn down.
pub fn try_with_runtime<F>(f: F)
where
    F: FnOnce(&mut Runtime),
{
    let _ = RUNTIME.try_with(|rt| {
        if let Ok(mut runtime) = rt.try_borrow_mut() {
            f(&mut runtime);
        }
    });
}

/// Run an effect with dependency tracking.
pub(crate) fn run_effect(effect_id: EffectId) {
    let Some((callback, prev_effect)) = with_runtime(|rt| rt.begin_run(effect_id)) else {
        return;
    };

    // An effect that (indirectly) re-triggers itself is not re-entered.
    if let Ok(mut callback) = callback.try_borrow_mut() {
        (callback)();
    }

    with_runtime(|rt| rt.current_effect = prev_effect);
}

/// Record a write to `signal_id` and run dependent effects.
pub(crate) fn notify_write(signal_id: SignalId) {
    let should_flush = RUNTIME
        .try_with(|rt| rt.borrow_mut().queue_subscribers(signal_id))
        .unwrap_or(false);
    if should_flush {
        flush_effects();
    }
}

/// Run queued effects in FIFO order until the queue is empty.
pub(crate) fn flush_effects() {
    with_runtime(|rt| rt.flushing = true);
    while let Some(effect_id) = with_runtime(|rt| rt.pending_effects.pop_front()) {
        run_effect(effect_id);
    }
    with_runtime(|rt| rt.flushing = false);
}

/// Dispose an effect, dropping its callback outside the runtime borrow.
pub(crate) fn dispose_effect(effect_id: EffectId) {
    let mut callback = None;
    try_with_runtime(|rt| callback = rt.dispose_effect(effect_id));
    drop(callback);
}

/// Run `f` without running effects until it returns; queued effects are
/// flushed afterwards.
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_runtime(|rt| rt.batch_depth += 1);
    let result = f();
    let should_flush = with_runtime(|rt| {
        rt.batch_depth -= 1;
        rt.batch_depth == 0 && !rt.flushing
    });

    if should_flush {
        flush_effects();
    }

    result
}

/// Run `f` without tracking reads into the current effect.
pub fn untrack<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let prev = with_runtime(|rt| rt.current_effect.take());
    let result = f();
    with_runtime(|rt| rt.current_effect = prev);
    result
}
