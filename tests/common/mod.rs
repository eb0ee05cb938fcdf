#![allow(dead_code)]

use repool::*;
use std::{cell::Cell, rc::Rc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub active: bool,
    pub parent: &'static str,
    pub local: (i32, i32),
    pub world: (i32, i32),
    pub activations: usize,
    pub deactivations: usize,
}

impl Poolable for Sprite {
    type Container = &'static str;
    type Position = (i32, i32);

    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) {
        self.active = true;
        self.activations += 1;
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.deactivations += 1;
    }

    fn base_name(&self) -> &str {
        "sprite"
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn set_container(&mut self, container: &'static str) {
        self.parent = container;
    }

    fn set_position(&mut self, position: (i32, i32), space: Space) {
        match space {
            Space::Local => self.local = position,
            Space::World => self.world = position,
        }
    }
}

type BuildSprite = dyn Fn(&&'static str, &(i32, i32), &&'static str) -> Result<Sprite, String>;

pub type SpriteFactory = FnFactory<&'static str, Box<BuildSprite>>;

/// Builds sprites, counting every call in `built`. The spec `"broken"` always
/// fails, and construction fails once `built` reaches `limit`.
pub fn sprite_factory(built: Rc<Cell<usize>>, limit: Option<usize>) -> SpriteFactory {
    let build: Box<BuildSprite> = Box::new(
        move |spec: &&'static str, position: &(i32, i32), container: &&'static str| {
            if *spec == "broken" {
                return Err(format!("cannot build {spec}"));
            }
            if limit.is_some_and(|limit| built.get() >= limit) {
                return Err(format!("limit of {} reached", built.get()));
            }
            built.set(built.get() + 1);
            Ok(Sprite {
                parent: *container,
                world: *position,
                ..Sprite::default()
            })
        },
    );
    FnFactory::new(build)
}

pub fn sprite_pool(built: Rc<Cell<usize>>) -> Pool<Sprite, SpriteFactory> {
    Pool::new(sprite_factory(built, None), "sprite", "root")
}
