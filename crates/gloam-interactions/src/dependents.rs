//! Dependent-node capabilities
//!
//! Interactions broadcast their progress to a list of dependent objects:
//! a switch drives a drawbridge, a keypad unlocks a door. Dependents expose
//! capabilities through accessor methods; an object registered without a
//! given capability is silently skipped, which is a capability check rather
//! than an error.

use std::collections::HashMap;

use gloam_core::ObjectId;

/// Receives the actuation percentage (0-100) of a mechanism
pub trait Actuated {
    fn execute(&mut self, percentage: f32);
}

/// Can be unlocked by a successful keypad entry
pub trait Unlockable {
    fn unlock(&mut self);
}

/// A world object that reacts to interaction progress
pub trait DependentNode {
    fn as_actuated(&mut self) -> Option<&mut dyn Actuated> {
        None
    }
    fn as_unlockable(&mut self) -> Option<&mut dyn Unlockable> {
        None
    }
}

/// Registry mapping world objects to their dependent behaviors
#[derive(Default)]
pub struct DependentRegistry {
    nodes: HashMap<ObjectId, Box<dyn DependentNode>>,
}

impl DependentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the dependent behavior of an object
    pub fn register(&mut self, object: ObjectId, node: Box<dyn DependentNode>) {
        self.nodes.insert(object, node);
    }

    pub fn remove(&mut self, object: ObjectId) {
        self.nodes.remove(&object);
    }

    /// Invoke `execute(percentage)` on every listed object exposing the
    /// actuation capability. Unregistered ids and non-actuated dependents
    /// are skipped.
    pub fn notify(&mut self, affected: &[ObjectId], percentage: f32) {
        for id in affected {
            if let Some(node) = self.nodes.get_mut(id) {
                if let Some(actuated) = node.as_actuated() {
                    actuated.execute(percentage);
                }
            }
        }
    }

    /// Invoke `unlock` on every listed object exposing the capability
    pub fn unlock(&mut self, affected: &[ObjectId]) {
        for id in affected {
            if let Some(node) = self.nodes.get_mut(id) {
                if let Some(unlockable) = node.as_unlockable() {
                    unlockable.unlock();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Bridge {
        executed: Rc<RefCell<Vec<f32>>>,
    }

    impl Actuated for Bridge {
        fn execute(&mut self, percentage: f32) {
            self.executed.borrow_mut().push(percentage);
        }
    }

    impl DependentNode for Bridge {
        fn as_actuated(&mut self) -> Option<&mut dyn Actuated> {
            Some(self)
        }
    }

    struct Inert;
    impl DependentNode for Inert {}

    #[test]
    fn test_notify_skips_missing_capability() {
        let executed = Rc::new(RefCell::new(Vec::new()));
        let mut registry = DependentRegistry::new();
        registry.register(
            ObjectId(1),
            Box::new(Bridge {
                executed: executed.clone(),
            }),
        );
        registry.register(ObjectId(2), Box::new(Inert));

        // Includes an id that was never registered at all
        registry.notify(&[ObjectId(1), ObjectId(2), ObjectId(3)], 42.0);
        assert_eq!(*executed.borrow(), vec![42.0]);
    }
}
