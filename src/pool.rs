use crate::{EntityFactory, PoolConfig, Poolable, Space};
use alloc::{boxed::Box, format, vec::Vec};
use core::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(0);

fn next_pool_id() -> u32 {
    NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to an entity owned by a [`Pool`].
///
/// Keys carry the id of the pool that issued them and that pool's generation.
/// A key presented to any other pool resolves to nothing, and re-initializing
/// the pool bumps its generation so keys handed out before that resolve to
/// nothing instead of aliasing a newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pool: u32,
    index: usize,
    generation: u64,
}

impl EntityKey {
    /// Position of the entity in creation order.
    pub fn index(self) -> usize {
        self.index
    }

    /// Pool generation this key was issued in.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Where [`Pool::collect`] should put the entity it hands out.
///
/// Unset fields fall back to the pool's default container and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<C, P> {
    container: Option<C>,
    position: Option<P>,
    space: Space,
}

impl<C, P> Placement<C, P> {
    /// Uses the pool defaults, applying the position in local space.
    pub fn new() -> Self {
        Placement {
            container: None,
            position: None,
            space: Space::Local,
        }
    }

    /// Places the entity under `container`.
    pub fn under(mut self, container: C) -> Self {
        self.container = Some(container);
        self
    }

    /// Moves the entity to `position`.
    pub fn at(mut self, position: P) -> Self {
        self.position = Some(position);
        self
    }

    /// Interprets the position in `space`.
    pub fn in_space(mut self, space: Space) -> Self {
        self.space = space;
        self
    }

    /// Interprets the position in world space.
    pub fn in_world_space(self) -> Self {
        self.in_space(Space::World)
    }
}

impl<C, P> Default for Placement<C, P> {
    fn default() -> Self {
        Placement::new()
    }
}

type Observer<T> = Box<dyn FnMut(&mut T)>;

/// A single-threaded pool of reusable entities.
///
/// The pool owns every entity it builds and never destroys one on release:
/// [`Self::release`] only deactivates, and [`Self::collect`] hands out the
/// first inactive entity in creation order, building a new one through the
/// factory only when none is left and growth is allowed.
///
/// Every mutating operation takes `&mut self`, so creation observers cannot
/// call back into the pool that is notifying them.
pub struct Pool<T: Poolable, F: EntityFactory<T>> {
    factory: F,
    spec: F::Spec,
    container: T::Container,
    position: T::Position,
    entities: Vec<T>,
    id: u32,
    generation: u64,
    grow_if_exhausted: bool,
    observers: Vec<Observer<T>>,
}

impl<T: Poolable, F: EntityFactory<T>> Pool<T, F> {
    /// Creates an empty pool that builds entities from `spec` under
    /// `container` at the default position.
    ///
    /// Growth is enabled. Register observers before calling
    /// [`Self::initialize`] to be notified about pre-warmed entities.
    pub fn new(factory: F, spec: F::Spec, container: T::Container) -> Self {
        Pool {
            factory,
            spec,
            container,
            position: T::Position::default(),
            entities: Vec::new(),
            id: next_pool_id(),
            generation: 0,
            grow_if_exhausted: true,
            observers: Vec::new(),
        }
    }

    /// Creates a pool and immediately pre-warms it as described by `config`.
    ///
    /// No observer can be registered before the pre-warm runs, so the
    /// entities built here are never reported. To observe them, create the
    /// pool with [`Self::new`], register observers with [`Self::on_created`]
    /// and then call [`Self::initialize`].
    pub fn with_config(
        factory: F,
        config: PoolConfig<F::Spec, T::Container, T::Position>,
    ) -> Result<Self, F::Error> {
        let PoolConfig {
            count,
            spec,
            container,
            position,
            start_active,
        } = config;
        let mut pool = Pool {
            factory,
            spec,
            container,
            position,
            entities: Vec::with_capacity(count),
            id: next_pool_id(),
            generation: 0,
            grow_if_exhausted: true,
            observers: Vec::new(),
        };
        pool.pre_warm(count, start_active)?;
        Ok(pool)
    }

    /// Discards every entity and rebuilds the pool as described by `config`.
    ///
    /// Discarded entities are dropped without being deactivated or reported.
    /// If the factory fails part way, the entities built before the failure
    /// stay in the pool and the error is returned.
    pub fn initialize(
        &mut self,
        config: PoolConfig<F::Spec, T::Container, T::Position>,
    ) -> Result<&mut Self, F::Error> {
        let PoolConfig {
            count,
            spec,
            container,
            position,
            start_active,
        } = config;
        self.entities.clear();
        self.generation += 1;
        self.spec = spec;
        self.container = container;
        self.position = position;
        tracing::debug!(
            count,
            start_active,
            generation = self.generation,
            "initializing entity pool"
        );
        self.pre_warm(count, start_active)?;
        Ok(self)
    }

    fn pre_warm(&mut self, count: usize, start_active: bool) -> Result<(), F::Error> {
        self.entities.reserve(count);
        for _ in 0..count {
            let mut entity = self.construct(None, None)?;
            if start_active {
                entity.activate();
            } else {
                entity.deactivate();
            }
            self.entities.push(entity);
        }
        Ok(())
    }

    /// Hands out an active entity placed as requested.
    ///
    /// The first inactive entity in creation order is reused. When every
    /// entity is in use a new one is built if growth is enabled; otherwise
    /// `Ok(None)` is returned and nothing is touched. Factory errors are
    /// returned as is.
    pub fn collect(
        &mut self,
        placement: Placement<T::Container, T::Position>,
    ) -> Result<Option<EntityKey>, F::Error> {
        let Placement {
            container,
            position,
            space,
        } = placement;
        let free = self.entities.iter().position(|entity| !entity.is_active());
        let index = match free {
            Some(index) => index,
            None if self.grow_if_exhausted => {
                let entity = self.construct(container.clone(), position.clone())?;
                self.entities.push(entity);
                self.entities.len() - 1
            }
            None => {
                tracing::debug!(
                    len = self.entities.len(),
                    "entity pool exhausted and growth is disabled"
                );
                return Ok(None);
            }
        };

        let container = container.unwrap_or_else(|| self.container.clone());
        let position = position.unwrap_or_else(|| self.position.clone());
        let entity = &mut self.entities[index];
        entity.set_container(container);
        entity.set_position(position, space);
        entity.activate();
        tracing::trace!(index, "collected entity");
        Ok(Some(self.key(index)))
    }

    /// Returns an entity to the inactive state.
    ///
    /// `None`, already inactive entities, keys issued by another pool and
    /// keys from before the last re-initialization are all accepted and leave
    /// the pool as it was.
    pub fn release(&mut self, key: impl Into<Option<EntityKey>>) {
        let Some(key) = key.into() else {
            return;
        };
        if let Some(entity) = self.get_mut(key) {
            entity.deactivate();
            tracing::trace!(index = key.index, "released entity");
        }
    }

    fn construct(
        &mut self,
        container: Option<T::Container>,
        position: Option<T::Position>,
    ) -> Result<T, F::Error> {
        let container = container.unwrap_or_else(|| self.container.clone());
        let position = position.unwrap_or_else(|| self.position.clone());
        let mut entity = self.factory.construct(&self.spec, &position, &container)?;
        entity.set_position(position, Space::Local);

        let name = format!("{}{}", entity.base_name(), self.entities.len());
        tracing::debug!(%name, "constructed pooled entity");
        entity.set_name(name);

        for observer in self.observers.iter_mut() {
            observer(&mut entity);
        }
        Ok(entity)
    }

    /// Registers a callback run once for every entity the pool builds, after
    /// it is placed and named and before it is handed out.
    pub fn on_created(&mut self, observer: impl FnMut(&mut T) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Removes every creation observer.
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Iterates over the entities whose state matches `active`, in creation
    /// order.
    pub fn with_state(&self, active: bool) -> impl Iterator<Item = (EntityKey, &T)> + '_ {
        self.iter()
            .filter(move |(_, entity)| entity.is_active() == active)
    }

    /// Iterates over every entity in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &T)> + '_ {
        let (pool, generation) = (self.id, self.generation);
        self.entities.iter().enumerate().map(move |(index, entity)| {
            let key = EntityKey {
                pool,
                index,
                generation,
            };
            (key, entity)
        })
    }

    /// Gets the entity behind `key`, if it is still part of this pool.
    pub fn get(&self, key: EntityKey) -> Option<&T> {
        if !self.issued(key) {
            return None;
        }
        self.entities.get(key.index)
    }

    /// Mutable form of [`Self::get`].
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut T> {
        if !self.issued(key) {
            return None;
        }
        self.entities.get_mut(key.index)
    }

    fn issued(&self, key: EntityKey) -> bool {
        key.pool == self.id && key.generation == self.generation
    }

    fn key(&self, index: usize) -> EntityKey {
        EntityKey {
            pool: self.id,
            index,
            generation: self.generation,
        }
    }

    /// Gets the number of entities owned by the pool, active or not.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Checks if the pool owns no entity at all.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether [`Self::collect`] builds a new entity when none is inactive.
    pub fn grows_if_exhausted(&self) -> bool {
        self.grow_if_exhausted
    }

    /// Enables or disables growth on exhaustion. Takes effect on the next
    /// collect.
    pub fn set_grow_if_exhausted(&mut self, grow: bool) {
        self.grow_if_exhausted = grow;
    }

    /// Reference spec handed to the factory.
    pub fn spec(&self) -> &F::Spec {
        &self.spec
    }

    /// Container used when a placement names none.
    pub fn default_container(&self) -> &T::Container {
        &self.container
    }

    /// Position used when a placement names none.
    pub fn default_position(&self) -> &T::Position {
        &self.position
    }

    /// The factory this pool builds entities with.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<T: Poolable + fmt::Debug, F: EntityFactory<T>> fmt::Debug for Pool<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("entities", &self.entities)
            .field("generation", &self.generation)
            .field("grow_if_exhausted", &self.grow_if_exhausted)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
