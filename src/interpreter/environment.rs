use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::interpreter::error::RuntimeErrorKind;
use crate::interpreter::value::Value;


pub type EnvironmentRef = Rc<RefCell<Environment>>;

/// One scope frame. Frames are shared by reference: a closure keeps its defining
/// frame (and every frame above it) alive for as long as the closure exists.
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    parent: Option<EnvironmentRef>,
}

impl Environment {
    pub fn new_global() -> EnvironmentRef {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            parent: None,
        }))
    }

    pub fn new_with_parent(parent: EnvironmentRef) -> EnvironmentRef {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            parent: Some(parent),
        }))
    }

    pub fn parent(&self) -> Option<EnvironmentRef> {
        self.parent.as_ref().map(Rc::clone)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Binds `name` in this frame. A name can only be defined once per frame.
    pub fn define(&mut self, name: &str, value: Value) -> Result<(), RuntimeErrorKind> {
        if self.values.contains_key(name) {
            return Err(RuntimeErrorKind::AlreadyDefined(name.to_owned()));
        }

        self.values.insert(name.to_owned(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeErrorKind> {
        match self.values.get(name) {
            Some(value) => Ok(value.clone()),
            None => match &self.parent {
                Some(parent) => parent.borrow().get(name),
                None => Err(RuntimeErrorKind::UndefinedVariable(name.to_owned())),
            },
        }
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeErrorKind> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            },
            None => match &self.parent {
                Some(parent) => parent.borrow_mut().assign(name, value),
                None => Err(RuntimeErrorKind::UndefinedVariable(name.to_owned())),
            },
        }
    }

    pub fn ancestor(this: &EnvironmentRef, distance: usize) -> Option<EnvironmentRef> {
        let mut environment = Rc::clone(this);

        for _ in 0..distance {
            let parent = environment.borrow().parent()?;
            environment = parent;
        }

        Some(environment)
    }

    /// Reads `name` from exactly the frame `distance` levels up, without walking further.
    pub fn get_at(this: &EnvironmentRef, distance: usize, name: &str) -> Result<Value, RuntimeErrorKind> {
        let environment = Environment::ancestor(this, distance)
            .ok_or_else(|| RuntimeErrorKind::UndefinedVariable(name.to_owned()))?;
        let value = environment.borrow().values.get(name).cloned();

        value.ok_or_else(|| RuntimeErrorKind::UndefinedVariable(name.to_owned()))
    }

    pub fn assign_at(this: &EnvironmentRef, distance: usize, name: &str, value: Value) -> Result<(), RuntimeErrorKind> {
        let environment = Environment::ancestor(this, distance)
            .ok_or_else(|| RuntimeErrorKind::UndefinedVariable(name.to_owned()))?;
        let mut environment = environment.borrow_mut();

        match environment.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            },
            None => Err(RuntimeErrorKind::UndefinedVariable(name.to_owned())),
        }
    }
}
