//! `World`: the registry plus a priority-ordered processor schedule.

use std::ops::{Deref, DerefMut};
use std::time::Instant;

use crate::processor::{Processor, ProcessorRun, TickReport};
use crate::registry::Registry;

struct Scheduled<R> {
    priority: i32,
    processor: Box<dyn Processor<R>>,
    initialized: bool,
}

/// Entities, components and the processors that run over them.
///
/// `World` dereferences to [`Registry`], so entity and component calls can
/// be made on it directly.
pub struct World<R> {
    registry: Registry,
    processors: Vec<Scheduled<R>>,
    tick: u64,
}

impl<R> World<R> {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            processors: Vec::new(),
            tick: 0,
        }
    }

    /// Schedule `processor`.  Lower priorities run first; processors with
    /// equal priority keep their registration order.
    pub fn add_processor(&mut self, processor: impl Processor<R> + 'static, priority: i32) {
        self.add_boxed_processor(Box::new(processor), priority);
    }

    pub fn add_boxed_processor(&mut self, processor: Box<dyn Processor<R>>, priority: i32) {
        let at = self
            .processors
            .partition_point(|p| p.priority <= priority);
        log::debug!(
            "scheduling processor `{}` at priority {priority}",
            processor.name()
        );
        self.processors.insert(
            at,
            Scheduled {
                priority,
                processor,
                initialized: false,
            },
        );
    }

    /// Remove every processor called `name`.  Returns how many were removed.
    pub fn remove_processor(&mut self, name: &str) -> usize {
        let before = self.processors.len();
        self.processors.retain(|p| p.processor.name() != name);
        before - self.processors.len()
    }

    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.processor.name()).collect()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Run one tick: every processor in ascending priority.
    ///
    /// A processor that fails (in `init` or `process`) is logged and
    /// recorded in the report; the remaining processors still run.
    pub fn process(&mut self, resources: &mut R) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            runs: Vec::with_capacity(self.processors.len()),
        };

        for scheduled in &mut self.processors {
            let start = Instant::now();
            let mut result = Ok(());
            if !scheduled.initialized {
                scheduled.initialized = true;
                result = scheduled.processor.init(&mut self.registry, resources);
            }
            if result.is_ok() {
                result = scheduled.processor.process(&mut self.registry, resources);
            }

            let name = scheduled.processor.name().to_string();
            let error = match result {
                Ok(()) => None,
                Err(err) => {
                    log::error!("processor `{name}` failed on tick {}: {err}", self.tick);
                    Some(err.to_string())
                }
            };
            report.runs.push(ProcessorRun {
                name,
                priority: scheduled.priority,
                elapsed: start.elapsed(),
                error,
            });
        }

        report
    }
}

impl<R> Default for World<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Deref for World<R> {
    type Target = Registry;

    fn deref(&self) -> &Registry {
        &self.registry
    }
}

impl<R> DerefMut for World<R> {
    fn deref_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::component::Component;
    use crate::error::BoxError;

    struct Logger {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
        inits: Rc<RefCell<u32>>,
    }

    impl Processor<()> for Logger {
        fn name(&self) -> &str {
            &self.name
        }

        fn init(&mut self, _: &mut Registry, _: &mut ()) -> Result<(), BoxError> {
            *self.inits.borrow_mut() += 1;
            Ok(())
        }

        fn process(&mut self, _: &mut Registry, _: &mut ()) -> Result<(), BoxError> {
            self.log.borrow_mut().push(self.name.clone());
            Ok(())
        }
    }

    fn logger(name: &str, log: &Rc<RefCell<Vec<String>>>, inits: &Rc<RefCell<u32>>) -> Logger {
        Logger {
            name: name.to_string(),
            log: log.clone(),
            inits: inits.clone(),
        }
    }

    #[test]
    fn processors_run_in_ascending_priority_every_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let inits = Rc::new(RefCell::new(0));
        let mut world: World<()> = World::new();
        world.add_processor(logger("p0", &log, &inits), 0);
        world.add_processor(logger("p5", &log, &inits), 5);
        world.add_processor(logger("p1", &log, &inits), 1);

        for _ in 0..3 {
            log.borrow_mut().clear();
            let report = world.process(&mut ());
            assert_eq!(*log.borrow(), vec!["p0", "p1", "p5"]);
            assert_eq!(report.order(), vec!["p0", "p1", "p5"]);
        }
        assert_eq!(*inits.borrow(), 3);
        assert_eq!(world.tick_count(), 3);
    }

    #[test]
    fn equal_priorities_keep_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let inits = Rc::new(RefCell::new(0));
        let mut world: World<()> = World::new();
        world.add_processor(logger("a", &log, &inits), 2);
        world.add_processor(logger("b", &log, &inits), 2);
        world.add_processor(logger("c", &log, &inits), -1);
        world.process(&mut ());
        assert_eq!(*log.borrow(), vec!["c", "a", "b"]);
    }

    struct Counter(u32);
    impl Component for Counter {}

    struct Increment;
    impl Processor<u32> for Increment {
        fn name(&self) -> &str {
            "increment"
        }
        fn process(&mut self, registry: &mut Registry, total: &mut u32) -> Result<(), BoxError> {
            for (_, c) in registry.get_component_mut::<Counter>() {
                c.0 += 1;
                *total += 1;
            }
            Ok(())
        }
    }

    struct Broken;
    impl Processor<u32> for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn process(&mut self, _: &mut Registry, _: &mut u32) -> Result<(), BoxError> {
            Err("boom".into())
        }
    }

    struct Doubler;
    impl Processor<u32> for Doubler {
        fn name(&self) -> &str {
            "doubler"
        }
        fn process(&mut self, registry: &mut Registry, _: &mut u32) -> Result<(), BoxError> {
            for (_, c) in registry.get_component_mut::<Counter>() {
                c.0 *= 2;
            }
            Ok(())
        }
    }

    #[test]
    fn later_processors_see_earlier_writes_and_failures_do_not_abort() {
        let mut world: World<u32> = World::new();
        let e = world.create_entity();
        world.add_component(e, Counter(1)).unwrap();
        world.add_processor(Doubler, 10);
        world.add_processor(Broken, 5);
        world.add_processor(Increment, 0);

        let mut total = 0;
        let report = world.process(&mut total);
        // (1 + 1) * 2
        assert_eq!(world.component_for_entity::<Counter>(e).unwrap().0, 4);
        assert_eq!(total, 1);
        let failed: Vec<&str> = report.failures().map(|r| r.name.as_str()).collect();
        assert_eq!(failed, vec!["broken"]);
        assert_eq!(report.runs.len(), 3);
    }

    #[test]
    fn remove_processor_by_name() {
        let mut world: World<u32> = World::new();
        world.add_processor(Increment, 0);
        world.add_processor(Broken, 1);
        assert_eq!(world.remove_processor("broken"), 1);
        assert_eq!(world.processor_names(), vec!["increment"]);
    }
}
