use alloc::string::String;

/// Coordinate space in which a position is applied to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Space {
    /// Relative to the entity's container.
    #[default]
    Local,
    /// Absolute, independent of the container.
    World,
}

/// A trait defining the capabilities an entity needs to live in a [`Pool`].
///
/// The pool never creates or destroys entities on collect and release, it
/// only flips them between the active and inactive states through
/// [`Self::activate`] and [`Self::deactivate`].
///
/// [`Pool`]: crate::Pool
pub trait Poolable {
    /// Placement context an entity lives under, such as a parent node.
    type Container: Clone;

    /// Spatial placement value.
    type Position: Clone + Default;

    /// Returns `true` while the entity is in use.
    fn is_active(&self) -> bool;

    /// Moves the entity into the in-use state and runs any local setup.
    fn activate(&mut self);

    /// Moves the entity into the inactive state and runs any local teardown.
    ///
    /// Must be idempotent: the pool may call it on an entity that is already
    /// inactive.
    fn deactivate(&mut self);

    /// Fixed prefix used when the pool names a freshly built entity.
    fn base_name(&self) -> &str;

    /// Sets the display name assigned by the pool.
    fn set_name(&mut self, name: String);

    /// Places the entity under `container`.
    fn set_container(&mut self, container: Self::Container);

    /// Moves the entity to `position`, interpreted in `space`.
    fn set_position(&mut self, position: Self::Position, space: Space);
}
