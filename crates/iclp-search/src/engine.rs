//! The top-level search engine: a compiled node graph plus the
//! contractor registry, statistics, and configuration needed to run it to
//! a fixed point (spec §11 "Search Layer", §13 "Engine construction").

use iclp_compile::Compiler;
use iclp_core::{
    propagate, ContractorRegistry, EngineConfig, IclpError, IclpResult, IntervalId, IntervalStore,
    Node, PropagationOutcome, Stats, Trail,
};

pub struct Engine {
    pub store: IntervalStore,
    pub nodes: Vec<Node>,
    pub agenda: iclp_core::Agenda,
    pub trail: Trail,
    pub stats: Stats,
    pub registry: ContractorRegistry,
    pub config: EngineConfig,
}

impl Engine {
    /// Build an engine from a finished [`Compiler`]. Checked here rather
    /// than at every propagation call: the host must have IEEE-754
    /// double precision (spec §13 `HostEnvironment`).
    pub fn from_compiler(compiler: Compiler) -> IclpResult<Engine> {
        if std::mem::size_of::<f64>() != 8 {
            return Err(IclpError::HostEnvironment(
                "platform f64 is not IEEE-754 double precision".into(),
            ));
        }
        Ok(Engine {
            store: compiler.store,
            nodes: compiler.nodes,
            agenda: compiler.agenda,
            trail: compiler.trail,
            stats: Stats::default(),
            registry: ContractorRegistry::with_defaults(),
            config: EngineConfig::default(),
        })
    }

    pub fn with_config(mut self, config: EngineConfig) -> Engine {
        self.config = config;
        self
    }

    /// Drain the agenda to a fixed point.
    pub fn propagate(&mut self) -> PropagationOutcome {
        propagate(
            &mut self.nodes,
            &mut self.store,
            &mut self.agenda,
            &mut self.trail,
            &mut self.stats,
            &self.registry,
            &self.config,
        )
    }

    pub fn checkpoint(&self) -> iclp_core::Checkpoint {
        self.trail.mark()
    }

    pub fn undo_to(&mut self, checkpoint: iclp_core::Checkpoint) {
        iclp_core::undo_to(&mut self.nodes, &mut self.store, &mut self.stats, &mut self.trail, checkpoint);
    }

    /// Narrow `id` to `(lo, hi)` and wake its watchers so the next
    /// `propagate` call sees the restriction (used by the splitting
    /// strategies in [`crate::split`], which narrow a variable directly
    /// rather than through a contractor).
    pub fn narrow_and_wake(&mut self, id: IntervalId, lo: iclp_core::Bound, hi: iclp_core::Bound) -> bool {
        use iclp_core::NarrowOutcome;
        match self.store.intersect_set(id, lo, hi, &mut self.trail, &mut self.stats) {
            NarrowOutcome::Failed => false,
            NarrowOutcome::Unchanged => true,
            NarrowOutcome::Updated | NarrowOutcome::CollapsedToPoint(_) => {
                for &watcher in self.store.watchers(id) {
                    let w = &mut self.nodes[watcher.index()];
                    if !w.linked && !w.persistent {
                        w.linked = true;
                        self.trail.push(iclp_core::UndoEntry::LinkedFlag {
                            id: watcher,
                            was_linked: false,
                        });
                        self.agenda.push_back(watcher);
                    }
                }
                true
            }
        }
    }
}
