//! Build pipeline
//!
//! A [`Pipeline`] stores the levels of a module set. Each module of a level
//! can be built concurrently; a level can't be started until every previous
//! level is done. Alongside the levels the pipeline keeps a name index of
//! every module's direct in-repo dependencies.

use std::collections::HashMap;

use crate::core::levels::Level;
use crate::core::module::Module;
use crate::error::ResolverError;

/// Frozen result of a pipeline build
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    levels: Vec<Level>,
    /// Module name -> (level index, position in level)
    positions: HashMap<String, (usize, usize)>,
    /// Module name -> direct dependency names
    dependencies: HashMap<String, Vec<String>>,
}

impl Pipeline {
    /// Assemble a pipeline from partitioned levels and a dependency index
    pub fn new(levels: Vec<Level>, dependencies: HashMap<String, Vec<String>>) -> Self {
        let positions = levels
            .iter()
            .enumerate()
            .flat_map(|(li, level)| {
                level
                    .iter()
                    .enumerate()
                    .map(move |(mi, m)| (m.name().to_string(), (li, mi)))
            })
            .collect();

        Self {
            levels,
            positions,
            dependencies,
        }
    }

    /// Ordered levels
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Cursor over the levels
    pub fn cursor(&self) -> LevelCursor<'_> {
        LevelCursor::new(&self.levels)
    }

    /// Look a module up by name
    pub fn module(&self, name: &str) -> Option<&Module> {
        let (li, mi) = self.positions.get(name)?;
        self.levels.get(*li)?.modules().get(*mi)
    }

    /// Index of the level holding `name`
    pub fn level_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).map(|(li, _)| *li)
    }

    /// Direct in-repo dependencies of `module`
    ///
    /// Declared dependencies that are not part of the pipeline are not
    /// returned.
    pub fn dependencies(&self, module: &Module) -> Result<Vec<&Module>, ResolverError> {
        self.dependencies_of(module.name())
    }

    /// Direct in-repo dependencies of the module called `name`
    pub fn dependencies_of(&self, name: &str) -> Result<Vec<&Module>, ResolverError> {
        let deps = self
            .dependencies
            .get(name)
            .ok_or_else(|| ResolverError::UnknownModule {
                name: name.to_string(),
            })?;

        Ok(deps.iter().filter_map(|dep| self.module(dep)).collect())
    }

    /// Every module, level by level
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.levels.iter().flat_map(Level::iter)
    }

    /// Number of modules
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the pipeline holds no module
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

/// Lifecycle of a [`LevelCursor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// `start` was never called
    NotStarted,
    /// Pointing at a level
    Running,
    /// Past the last level or stopped explicitly
    Stopped,
}

/// Restartable cursor over pipeline levels
///
/// ```
/// # use linfra::core::pipeline::Pipeline;
/// let pipeline = Pipeline::default();
/// let mut cursor = pipeline.cursor();
/// cursor.start(0);
/// while !cursor.is_stopped() {
///     let _level = cursor.value();
///     cursor.next();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LevelCursor<'a> {
    levels: &'a [Level],
    index: usize,
    start_index: usize,
    stopped: bool,
    started: bool,
}

impl<'a> LevelCursor<'a> {
    /// Create a cursor that has not been started
    pub fn new(levels: &'a [Level]) -> Self {
        Self {
            levels,
            index: 0,
            start_index: 0,
            stopped: false,
            started: false,
        }
    }

    /// Point the cursor at level `index`
    pub fn start(&mut self, index: usize) {
        self.index = index;
        self.start_index = index;
        self.stopped = false;
        self.started = true;
    }

    /// Stop the cursor
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Whether the cursor is past the last level or was stopped
    ///
    /// A cursor that was never started reports `true`.
    pub fn is_stopped(&self) -> bool {
        !self.started || self.stopped || self.index >= self.levels.len()
    }

    /// Move to the next level, no-op once stopped
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if self.is_stopped() {
            return;
        }
        self.index += 1;
    }

    /// Start again from `index`, or from the index of the last `start`
    pub fn restart(&mut self, index: Option<usize>) {
        self.start(index.unwrap_or(self.start_index));
    }

    /// Current level, `None` once stopped
    pub fn value(&self) -> Option<&'a Level> {
        if self.is_stopped() {
            return None;
        }
        self.levels.get(self.index)
    }

    /// Current level index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of levels the cursor walks over
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if there is no level to walk over
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Lifecycle state
    pub fn state(&self) -> CursorState {
        if !self.started {
            CursorState::NotStarted
        } else if self.is_stopped() {
            CursorState::Stopped
        } else {
            CursorState::Running
        }
    }
}
