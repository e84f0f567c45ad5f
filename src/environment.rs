// Lexically scoped environment: a frame of bindings plus an optional outer
// frame. Reads walk the chain outward; writes stay in the innermost frame.
// Struct and enum definitions are registered in the root frame only and are
// visible through every child.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::value::{EnumDefinition, StructDefinition, Value};

pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Value>,
    struct_definitions: HashMap<String, Rc<StructDefinition>>,
    enum_definitions: HashMap<String, Rc<EnumDefinition>>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// A child frame for a function call: lookups fall through to `outer`,
    /// writes stay local.
    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Environment {
            outer: Some(Rc::clone(outer)),
            ..Environment::default()
        }))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }

    pub fn register_struct_definition(
        &mut self,
        definition: Rc<StructDefinition>,
    ) -> Result<(), String> {
        if let Some(outer) = &self.outer {
            return outer.borrow_mut().register_struct_definition(definition);
        }
        if self.struct_definitions.contains_key(&definition.name)
            || self.enum_definitions.contains_key(&definition.name)
        {
            return Err(format!("Struct '{}' already defined", definition.name));
        }
        self.struct_definitions
            .insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get_struct_definition(&self, name: &str) -> Option<Rc<StructDefinition>> {
        match self.struct_definitions.get(name) {
            Some(definition) => Some(Rc::clone(definition)),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get_struct_definition(name)),
        }
    }

    pub fn register_enum_definition(
        &mut self,
        definition: Rc<EnumDefinition>,
    ) -> Result<(), String> {
        if let Some(outer) = &self.outer {
            return outer.borrow_mut().register_enum_definition(definition);
        }
        if self.enum_definitions.contains_key(&definition.name)
            || self.struct_definitions.contains_key(&definition.name)
        {
            return Err(format!("Enum '{}' already defined", definition.name));
        }
        self.enum_definitions
            .insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get_enum_definition(&self, name: &str) -> Option<Rc<EnumDefinition>> {
        match self.enum_definitions.get(name) {
            Some(definition) => Some(Rc::clone(definition)),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get_enum_definition(name)),
        }
    }

    // -----------------------------------------------------------------------
    // Diagnostics over the top frame
    // -----------------------------------------------------------------------

    /// Names bound in this frame, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// `name: inspect-string` lines for this frame, sorted by name.
    pub fn to_strings(&self) -> Vec<String> {
        self.keys()
            .into_iter()
            .map(|name| {
                let value = &self.store[&name];
                format!("{}: {}", name, value.inspect())
            })
            .collect()
    }

    /// JSON object mapping each bound name to its inspect string. Keys are
    /// sorted, so identical environments export identical documents.
    pub fn to_json(&self) -> String {
        let vars: BTreeMap<&str, String> = self
            .store
            .iter()
            .map(|(name, value)| (name.as_str(), value.inspect()))
            .collect();
        serde_json::to_string(&vars).expect("string map always serializes")
    }
}
