use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::value::{Function, TypeId, Value};

/// Two parallel stacks of scopes: one for values, one for function
/// overloads. The bottom frame lives for the whole interpreter lifetime;
/// `enter_scope`/`exit_scope` must stay paired (see `Interpreter::scoped`).
pub struct Environment {
    values: Vec<HashMap<String, Value>>,
    functions: Vec<HashMap<String, Vec<Rc<Function>>>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            values: vec![HashMap::new()],
            functions: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.values.push(HashMap::new());
        self.functions.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        debug_assert!(self.values.len() > 1);
        self.values.pop();
        self.functions.pop();
    }

    pub fn depth(&self) -> usize {
        self.values.len()
    }

    /// Pushes a pre-populated frame pair, as when merging a module.
    pub fn push_frames(
        &mut self,
        values: HashMap<String, Value>,
        functions: HashMap<String, Vec<Rc<Function>>>,
    ) {
        self.values.push(values);
        self.functions.push(functions);
    }

    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.values.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Mutates the binding wherever it already exists, innermost first;
    /// otherwise creates it in the innermost scope. This keeps REPL
    /// top-level assignments persistent while parameter binding still
    /// shadows via [`Environment::add_local_value`].
    pub fn set_value(&mut self, name: &str, value: Value) {
        for scope in self.values.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return;
            }
        }
        self.values
            .last_mut()
            .unwrap()
            .insert(name.to_string(), value);
    }

    pub fn add_local_value(&mut self, name: impl Into<String>, value: Value) {
        self.values.last_mut().unwrap().insert(name.into(), value);
    }

    /// All overloads registered under `name`, innermost scope first.
    /// Within a scope, overloads keep their registration order.
    pub fn find_functions(&self, name: &str) -> Vec<Rc<Function>> {
        let mut found = Vec::new();
        for scope in self.functions.iter().rev() {
            if let Some(overloads) = scope.get(name) {
                found.extend(overloads.iter().cloned());
            }
        }
        found
    }

    pub fn add_function(&mut self, name: impl Into<String>, function: Function) -> Rc<Function> {
        let function = Rc::new(function);
        self.functions
            .last_mut()
            .unwrap()
            .entry(name.into())
            .or_default()
            .push(Rc::clone(&function));
        function
    }

    /// Whether a conversion from `from` to `to` is registered, i.e. a
    /// function named `__<to>` with signature `[to, from]` exists in any
    /// scope. A pure lookup; no dispatch is attempted.
    pub fn has_constructor(&self, to: TypeId, from: TypeId) -> bool {
        self.find_functions(&to.constructor_name())
            .iter()
            .any(|f| f.signature() == [to, from])
    }

    /// Every name from either stack that starts with `prefix` and is
    /// strictly longer than it, sorted.
    pub fn completions(&self, prefix: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let candidates = self
            .values
            .iter()
            .flat_map(|scope| scope.keys())
            .chain(self.functions.iter().flat_map(|scope| scope.keys()));
        for name in candidates {
            if name.len() > prefix.len() && name.starts_with(prefix) {
                names.insert(name.clone());
            }
        }
        names
    }
}
