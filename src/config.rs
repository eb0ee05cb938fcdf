/// Options consumed by [`Pool::initialize`] and [`Pool::with_config`].
///
/// `S` is the factory spec, `C` the entity container and `P` the entity
/// position type. Only the spec and the default container are required.
///
/// [`Pool::initialize`]: crate::Pool::initialize
/// [`Pool::with_config`]: crate::Pool::with_config
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig<S, C, P> {
    pub(crate) count: usize,
    pub(crate) spec: S,
    pub(crate) container: C,
    pub(crate) position: P,
    pub(crate) start_active: bool,
}

impl<S, C, P: Default> PoolConfig<S, C, P> {
    /// Creates a configuration that pre-warms nothing, places new entities at
    /// the default position and starts them inactive.
    pub fn new(spec: S, container: C) -> Self {
        PoolConfig {
            count: 0,
            spec,
            container,
            position: P::default(),
            start_active: false,
        }
    }
}

impl<S, C, P> PoolConfig<S, C, P> {
    /// Number of entities built up front.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Default position for entities built or collected without one.
    pub fn position(mut self, position: P) -> Self {
        self.position = position;
        self
    }

    /// Whether pre-warmed entities start active instead of inactive.
    pub fn start_active(mut self, start_active: bool) -> Self {
        self.start_active = start_active;
        self
    }

    /// Gets the configured pre-warm count.
    pub fn pre_warm_count(&self) -> usize {
        self.count
    }
}
