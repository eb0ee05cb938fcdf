use crate::{Poolable, Space};
use alloc::{collections::BTreeMap, string::String};
use core::{convert::Infallible, fmt, marker::PhantomData};

/// A trait defining how a pool builds new entities.
///
/// The pool treats construction as opaque: it hands over its reference spec
/// together with the resolved position and container and expects a fresh,
/// inactive entity back, or an error that it passes on to its caller
/// untouched.
pub trait EntityFactory<T: Poolable> {
    /// Reference input describing what to build, e.g. a prototype or a
    /// template name.
    type Spec;

    /// Error raised when construction fails.
    type Error;

    /// Creates a new entity of type T at `position` under `container`.
    fn construct(
        &self,
        spec: &Self::Spec,
        position: &T::Position,
        container: &T::Container,
    ) -> Result<T, Self::Error>;
}

/// Errors raised by the factories bundled with this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    /// The requested template has not been registered.
    #[error("no template registered under `{0}`")]
    UnknownTemplate(String),
}

fn instantiate<T: Poolable + Clone>(
    prototype: &T,
    position: &T::Position,
    container: &T::Container,
) -> T {
    let mut entity = prototype.clone();
    entity.set_container(container.clone());
    entity.set_position(position.clone(), Space::World);
    entity.deactivate();
    entity
}

/// Builds entities by cloning the spec itself, which acts as the prototype.
///
/// The clone is placed in world space under the requested container and
/// handed back inactive.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrototypeFactory;

impl<T: Poolable + Clone> EntityFactory<T> for PrototypeFactory {
    type Spec = T;
    type Error = Infallible;

    #[inline]
    fn construct(
        &self,
        spec: &T,
        position: &T::Position,
        container: &T::Container,
    ) -> Result<T, Infallible> {
        Ok(instantiate(spec, position, container))
    }
}

/// Builds entities from named prototypes registered ahead of time.
///
/// The pool's spec is the template name; asking for a name that was never
/// registered fails with [`FactoryError::UnknownTemplate`].
#[derive(Debug, Clone)]
pub struct RegistryFactory<T> {
    templates: BTreeMap<String, T>,
}

impl<T> RegistryFactory<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        RegistryFactory {
            templates: BTreeMap::new(),
        }
    }

    /// Registers `prototype` under `name`, returning the prototype it
    /// replaced, if any.
    pub fn register(&mut self, name: impl Into<String>, prototype: T) -> Option<T> {
        self.templates.insert(name.into(), prototype)
    }

    /// Builder form of [`Self::register`].
    pub fn with_template(mut self, name: impl Into<String>, prototype: T) -> Self {
        self.register(name, prototype);
        self
    }

    /// Returns `true` if a prototype is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Gets the number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Checks if no template is registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<T> Default for RegistryFactory<T> {
    fn default() -> Self {
        RegistryFactory::new()
    }
}

impl<T: Poolable + Clone> EntityFactory<T> for RegistryFactory<T> {
    type Spec = String;
    type Error = FactoryError;

    fn construct(
        &self,
        spec: &String,
        position: &T::Position,
        container: &T::Container,
    ) -> Result<T, FactoryError> {
        let prototype = self
            .templates
            .get(spec)
            .ok_or_else(|| FactoryError::UnknownTemplate(spec.clone()))?;
        Ok(instantiate(prototype, position, container))
    }
}

/// Adapts a closure into an [`EntityFactory`].
///
/// This is the hook for construction paths owned by someone else, such as
/// an injected instantiator: the closure receives the spec, position and
/// container and decides everything else.
pub struct FnFactory<S, Func> {
    func: Func,
    _spec: PhantomData<fn(&S)>,
}

impl<S, Func> FnFactory<S, Func> {
    /// Wraps `func` as a factory taking specs of type `S`.
    pub fn new(func: Func) -> Self {
        FnFactory {
            func,
            _spec: PhantomData,
        }
    }
}

impl<S, Func> fmt::Debug for FnFactory<S, Func> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactory").finish_non_exhaustive()
    }
}

impl<T, S, E, Func> EntityFactory<T> for FnFactory<S, Func>
where
    T: Poolable,
    Func: Fn(&S, &T::Position, &T::Container) -> Result<T, E>,
{
    type Spec = S;
    type Error = E;

    #[inline(always)]
    fn construct(
        &self,
        spec: &S,
        position: &T::Position,
        container: &T::Container,
    ) -> Result<T, E> {
        (self.func)(spec, position, container)
    }
}
