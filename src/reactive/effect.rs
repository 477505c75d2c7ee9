use super::owner::register_effect;
use super::runtime::{EffectId, dispose_effect, run_effect, with_runtime};

/// A side effect that re-runs whenever a signal it read last time changes.
///
/// The effect runs once immediately on creation. Dropping the handle (or
/// disposing the owner it was created under) stops it.
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let id = with_runtime(|rt| rt.allocate_effect(Box::new(f)));
        register_effect(id);
        run_effect(id);
        Self { id }
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Whether the effect is still subscribed.
    pub fn is_alive(&self) -> bool {
        with_runtime(|rt| rt.is_effect_alive(self.id))
    }

    /// Stop the effect now. Idempotent.
    pub fn dispose(&self) {
        dispose_effect(self.id);
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        dispose_effect(self.id);
    }
}

pub fn create_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    Effect::new(f)
}
