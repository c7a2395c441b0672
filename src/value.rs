use std::fmt;
use std::rc::Rc;

use crate::ast::Expr;
use crate::interpreter::{EvalResult, Interpreter};

/// Tag identifying a [`Value`] variant. `Any` never tags a runtime value;
/// it only appears in the signatures of dynamically typed functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeId {
    Any,
    Nil,
    Bool,
    Int,
    Double,
    String,
    Function,
}

impl TypeId {
    pub fn name(self) -> &'static str {
        match self {
            TypeId::Any => "Any",
            TypeId::Nil => "Nil",
            TypeId::Bool => "Bool",
            TypeId::Int => "Int",
            TypeId::Double => "Double",
            TypeId::String => "String",
            TypeId::Function => "Function",
        }
    }

    /// Name under which the conversion function into this type is
    /// registered, e.g. `__Double`.
    pub fn constructor_name(self) -> String {
        format!("__{}", self.name())
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(Rc<str>),
    Function(Rc<Function>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::from(s.into().as_str()))
    }

    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Nil => TypeId::Nil,
            Value::Bool(_) => TypeId::Bool,
            Value::Int(_) => TypeId::Int,
            Value::Double(_) => TypeId::Double,
            Value::String(_) => TypeId::String,
            Value::Function(_) => TypeId::Function,
        }
    }

    /// Nil is false, booleans are themselves, integers compare against
    /// zero. Everything else is true, including `0.0` and `""`.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            _ => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Double(x) => write!(f, "{x:.6}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Function(_) => write!(f, "<Function>"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Int(l), Value::Int(r)) => l == r,
            (Value::Double(l), Value::Double(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Function(l), Value::Function(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

type Body = Box<dyn Fn(&mut Interpreter, Vec<Value>) -> EvalResult>;

/// A callable. `signature[0]` is the return type, `signature[1..]` the
/// parameter types; dispatch selects among same-name functions by the
/// parameter list.
pub struct Function {
    signature: Vec<TypeId>,
    body: Body,
}

impl Function {
    pub fn native(
        signature: Vec<TypeId>,
        body: impl Fn(&mut Interpreter, Vec<Value>) -> EvalResult + 'static,
    ) -> Self {
        debug_assert!(!signature.is_empty());
        Self {
            signature,
            body: Box::new(body),
        }
    }

    /// A user-defined function: dynamically typed all over, its body a
    /// shared expression evaluated in a fresh child scope with the
    /// parameters bound positionally.
    pub fn dynamic(params: Vec<String>, body: Rc<Expr>) -> Self {
        let signature = vec![TypeId::Any; params.len() + 1];
        Self::native(signature, move |interp, args| {
            interp.scoped(|interp| {
                for (param, arg) in params.iter().zip(args) {
                    interp.add_local_value(param.clone(), arg);
                }
                interp.eval(&body)
            })
        })
    }

    pub fn signature(&self) -> &[TypeId] {
        &self.signature
    }

    pub fn params(&self) -> &[TypeId] {
        &self.signature[1..]
    }

    pub fn invoke(&self, interp: &mut Interpreter, args: Vec<Value>) -> EvalResult {
        (self.body)(interp, args)
    }

    pub fn signature_display(&self) -> String {
        let params: Vec<&str> = self.params().iter().map(|ty| ty.name()).collect();
        format!("({}) -> {}", params.join(", "), self.signature[0])
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.signature)
            .field("body", &"...")
            .finish()
    }
}
