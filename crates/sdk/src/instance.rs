//! Process-wide instance slot.
//!
//! Convenience for hosts that want a single shared SDK handle instead of
//! threading one through their code. There is exactly one slot; installing
//! a new instance replaces the previous one, and callers own the decision
//! to destroy what they replace.

use std::sync::{Arc, Mutex};

use crate::orchestrator::Feedbackly;

lazy_static::lazy_static! {
    static ref CURRENT: Mutex<Option<Arc<Feedbackly>>> = Mutex::new(None);
}

/// Install an instance as the process-wide current one.
///
/// Returns the previously installed instance, if any.
pub fn set_instance(instance: Arc<Feedbackly>) -> Option<Arc<Feedbackly>> {
    CURRENT.lock().unwrap().replace(instance)
}

/// The currently installed instance, if any.
pub fn current_instance() -> Option<Arc<Feedbackly>> {
    CURRENT.lock().unwrap().clone()
}

/// Remove and return the currently installed instance.
pub fn clear_instance() -> Option<Arc<Feedbackly>> {
    CURRENT.lock().unwrap().take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::Environment;

    #[test]
    fn test_slot_set_get_clear() {
        clear_instance();
        assert!(current_instance().is_none());

        let first = Arc::new(Feedbackly::headless(Environment::default()));
        assert!(set_instance(first.clone()).is_none());
        assert!(Arc::ptr_eq(&current_instance().unwrap(), &first));

        let second = Arc::new(Feedbackly::headless(Environment::default()));
        let replaced = set_instance(second.clone()).unwrap();
        assert!(Arc::ptr_eq(&replaced, &first));
        assert!(Arc::ptr_eq(&current_instance().unwrap(), &second));

        assert!(clear_instance().is_some());
        assert!(current_instance().is_none());
    }
}
