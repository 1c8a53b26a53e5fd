//! Injection chain: the frames currently under construction in one
//! resolution call. Drives contextual binding selection and cycle detection.

use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

#[cfg(feature = "smallvec")]
type Frames = smallvec::SmallVec<[Frame; 8]>;
#[cfg(not(feature = "smallvec"))]
type Frames = Vec<Frame>;

/// One type being built.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    /// Type that was asked for
    pub(crate) requested: TypeKey,
    /// Type whose constructor (or factory) is running
    pub(crate) concrete: TypeKey,
    /// Declared ancestors of `concrete`
    pub(crate) ancestors: Vec<TypeKey>,
}

impl Frame {
    pub(crate) fn factory(requested: TypeKey) -> Self {
        Self {
            requested,
            concrete: requested,
            ancestors: Vec::new(),
        }
    }

    /// True when `target` is this frame's concrete type, its requested type
    /// or one of its ancestors.
    pub(crate) fn is_a(&self, target: TypeKey) -> bool {
        self.concrete == target || self.requested == target || self.ancestors.contains(&target)
    }
}

pub(crate) struct InjectionChain {
    frames: Frames,
    max_depth: usize,
}

impl InjectionChain {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            frames: Frames::new(),
            max_depth,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The frame that is asking for the next dependency.
    pub(crate) fn requester(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Fails when `key` is already under construction or the chain is too deep.
    pub(crate) fn check(&self, key: TypeKey) -> DiResult<()> {
        if self.frames.iter().any(|f| f.requested == key || f.concrete == key) {
            let mut path = self.path();
            path.push(key.type_name());
            return Err(DiError::CyclicDependency(path));
        }
        if self.frames.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.frames.len()));
        }
        Ok(())
    }

    /// Like [`check`](Self::check) for a concrete type reached through
    /// `requested`; the cycle path names both.
    pub(crate) fn check_concrete(&self, requested: TypeKey, concrete: TypeKey) -> DiResult<()> {
        match self.check(concrete) {
            Err(DiError::CyclicDependency(mut path)) => {
                path.insert(path.len() - 1, requested.type_name());
                Err(DiError::CyclicDependency(path))
            }
            other => other,
        }
    }

    /// Runs `f` with `frame` pushed on top of the chain.
    pub(crate) fn enter<R, F>(&mut self, frame: Frame, f: F) -> DiResult<R>
    where
        F: FnOnce(&mut InjectionChain) -> DiResult<R>,
    {
        self.frames.push(frame);
        let result = f(self);
        self.frames.pop();
        result
    }

    /// The frame below the requester, i.e. whoever asked for the type that
    /// is currently being built.
    pub(crate) fn parent(&self) -> Option<&Frame> {
        self.frames.iter().rev().nth(1)
    }

    pub(crate) fn path(&self) -> Vec<&'static str> {
        self.frames.iter().map(|f| f.requested.type_name()).collect()
    }
}
