use std::rc::Rc;

use log::{debug, trace};

use crate::ast::Expr;
use crate::env::Environment;
use crate::module::Module;
use crate::value::{Function, TypeId, Value};

pub type EvalResult = Result<Value, EvalError>;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EvalError {
    #[error("no such variable: {0}")]
    NoSuchName(String),

    #[error("no such function: {name}, arguments are: ( {arg_types} )")]
    NoSuchFunction { name: String, arg_types: String },

    #[error("ambiguous call to {name}, candidates are: {candidates}")]
    AmbiguousCall { name: String, candidates: String },

    #[error("cannot convert {from} to {to}: {source}")]
    BadCoercion {
        from: TypeId,
        to: TypeId,
        #[source]
        source: Box<EvalError>,
    },

    #[error("invalid assignment target")]
    InvalidAssignment,

    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Default)]
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a module's bindings as one scope frame above whatever is
    /// already on the stacks.
    pub fn add_module(&mut self, module: Module) {
        let (values, functions) = module.into_frames();
        self.env.push_frames(values, functions);
    }

    /// Runs `f` inside a fresh scope; the frame pair is popped on every
    /// exit path, errors included, since errors propagate as values.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Interpreter) -> T) -> T {
        self.env.enter_scope();
        let result = f(self);
        self.env.exit_scope();
        result
    }

    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.env.get_value(name)
    }

    pub fn set_value(&mut self, name: &str, value: Value) {
        self.env.set_value(name, value);
    }

    pub fn add_local_value(&mut self, name: impl Into<String>, value: Value) {
        self.env.add_local_value(name, value);
    }

    pub fn add_function(&mut self, name: impl Into<String>, function: Function) -> Rc<Function> {
        self.env.add_function(name, function)
    }

    pub fn completions(&self, prefix: &str) -> std::collections::BTreeSet<String> {
        self.env.completions(prefix)
    }

    pub fn scope_depth(&self) -> usize {
        self.env.depth()
    }

    /// Lex, parse and evaluate a single source line. Empty input
    /// evaluates to nil.
    pub fn eval_line(&mut self, source: &str) -> Result<Value, crate::Error> {
        match crate::parse(source)? {
            Some(expr) => {
                debug!("parsed: {expr:?}");
                Ok(self.eval(&expr)?)
            }
            None => Ok(Value::Nil),
        }
    }

    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Const(value) => Ok(value.clone()),
            Expr::Ident(name) => self
                .env
                .get_value(name)
                .cloned()
                .ok_or_else(|| EvalError::NoSuchName(name.clone())),
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                self.call(&format!("operator{op}"), vec![operand])
            }
            Expr::Binary { op: '=', lhs, rhs } => self.eval_assign(lhs, rhs),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                self.call(&format!("operator{op}"), vec![lhs, rhs])
            }
            Expr::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                self.call(name, values)
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond)?.truthy() {
                    self.eval(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval(else_branch)
                } else {
                    Ok(Value::Nil)
                }
            }
            Expr::While { cond, body } => {
                let mut last = Value::Nil;
                while self.eval(cond)?.truthy() {
                    last = self.eval(body)?;
                }
                Ok(last)
            }
        }
    }

    /// The two shapes of `=`: plain assignment to a name, and function
    /// definition when the left side looks like `f(x, y)`.
    fn eval_assign(&mut self, lhs: &Expr, rhs: &Expr) -> EvalResult {
        match lhs {
            Expr::Ident(name) => {
                let value = self.eval(rhs)?;
                self.env.set_value(name, value.clone());
                Ok(value)
            }
            Expr::Call { name, args } => {
                let mut params = Vec::with_capacity(args.len());
                for arg in args {
                    match arg {
                        Expr::Ident(param) => params.push(param.clone()),
                        _ => return Err(EvalError::InvalidAssignment),
                    }
                }
                // The body subtree is shared by every future invocation.
                let body = Rc::new(rhs.clone());
                let handle = self
                    .env
                    .add_function(name.clone(), Function::dynamic(params, body));
                Ok(Value::Function(handle))
            }
            _ => Err(EvalError::InvalidAssignment),
        }
    }

    /// Overload resolution in three phases: exact signature match,
    /// single conversion-compatible candidate (coercing arguments through
    /// registered constructors), then the dynamically typed fallback.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> EvalResult {
        let arg_types: Vec<TypeId> = args.iter().map(Value::type_id).collect();
        let candidates = self.env.find_functions(name);
        trace!(
            "dispatching {name}({arg_types:?}) over {} candidate(s)",
            candidates.len()
        );

        if let Some(exact) = candidates
            .iter()
            .find(|f| f.params() == arg_types.as_slice())
        {
            let exact = Rc::clone(exact);
            return exact.invoke(self, args);
        }

        let convertible: Vec<Rc<Function>> = candidates
            .iter()
            .filter(|f| self.all_convertible(&arg_types, f.params()))
            .cloned()
            .collect();
        match convertible.as_slice() {
            [] => {}
            [only] => {
                let target = Rc::clone(only);
                return self.coerce_and_invoke(&target, args);
            }
            many => {
                let candidates = many
                    .iter()
                    .map(|f| f.signature_display())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(EvalError::AmbiguousCall {
                    name: name.to_string(),
                    candidates,
                });
            }
        }

        if let Some(dynamic) = candidates.iter().find(|f| {
            f.params().len() == args.len() && f.params().iter().all(|&ty| ty == TypeId::Any)
        }) {
            let dynamic = Rc::clone(dynamic);
            return dynamic.invoke(self, args);
        }

        let arg_types = arg_types
            .iter()
            .map(|ty| ty.name())
            .collect::<Vec<_>>()
            .join(", ");
        Err(EvalError::NoSuchFunction {
            name: name.to_string(),
            arg_types,
        })
    }

    fn all_convertible(&self, arg_types: &[TypeId], params: &[TypeId]) -> bool {
        arg_types.len() == params.len()
            && arg_types
                .iter()
                .zip(params)
                .all(|(&from, &to)| from == to || self.env.has_constructor(to, from))
    }

    /// Converts every argument whose type differs from the target
    /// parameter by dispatching the matching constructor, then invokes.
    /// Constructors carry exact signatures, so the nested dispatch
    /// resolves in the exact phase and cannot recurse further.
    fn coerce_and_invoke(&mut self, function: &Rc<Function>, args: Vec<Value>) -> EvalResult {
        let mut coerced = Vec::with_capacity(args.len());
        for (arg, &want) in args.into_iter().zip(function.params()) {
            let from = arg.type_id();
            if from == want {
                coerced.push(arg);
                continue;
            }
            let converted = self
                .call(&want.constructor_name(), vec![arg])
                .map_err(|e| EvalError::BadCoercion {
                    from,
                    to: want,
                    source: Box::new(e),
                })?;
            coerced.push(converted);
        }
        function.invoke(self, coerced)
    }
}
