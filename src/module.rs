use std::collections::HashMap;
use std::rc::Rc;

use crate::interpreter::EvalError;
use crate::value::{Function, TypeId, Value};

/// A bundle of bindings merged into the interpreter as one scope frame.
#[derive(Default)]
pub struct Module {
    values: HashMap<String, Value>,
    functions: HashMap<String, Vec<Rc<Function>>>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn add_function(&mut self, name: impl Into<String>, function: Function) {
        self.functions
            .entry(name.into())
            .or_default()
            .push(Rc::new(function));
    }

    pub(crate) fn into_frames(
        self,
    ) -> (
        HashMap<String, Value>,
        HashMap<String, Vec<Rc<Function>>>,
    ) {
        (self.values, self.functions)
    }
}

/// The built-in constants, math functions, typed operator overloads and
/// the Int-to-Double constructor.
pub fn prelude() -> Module {
    let mut module = Module::new();

    module.add_value("pi", Value::Double(std::f64::consts::PI));
    module.add_value("e", Value::Double(std::f64::consts::E));
    module.add_value("phi", Value::Double((1.0 + 5.0_f64.sqrt()) / 2.0));

    for (name, f) in [
        ("sqrt", f64::sqrt as fn(f64) -> f64),
        ("exp", f64::exp),
        ("sin", f64::sin),
        ("cos", f64::cos),
        ("tan", f64::tan),
        ("cbrt", f64::cbrt),
        ("abs", f64::abs),
        ("log", f64::ln),
        ("log10", f64::log10),
    ] {
        module.add_function(name, unary_double(f));
    }

    module.add_function("operator-", unary_double(|x| -x));
    module.add_function("operator-", unary_int(|n| n.wrapping_neg()));

    module.add_function("operator+", binary_double(|l, r| l + r));
    module.add_function("operator-", binary_double(|l, r| l - r));
    module.add_function("operator*", binary_double(|l, r| l * r));
    module.add_function("operator/", binary_double(|l, r| l / r));
    module.add_function("operator^", binary_double(f64::powf));

    module.add_function("operator+", binary_int(i64::wrapping_add));
    module.add_function("operator-", binary_int(i64::wrapping_sub));
    module.add_function("operator*", binary_int(i64::wrapping_mul));
    module.add_function("operator/", int_division());

    module.add_function("operator+", string_concat());
    module.add_function("operator*", string_repeat());

    module.add_function(TypeId::Double.constructor_name(), int_to_double());

    module
}

fn unary_double(f: fn(f64) -> f64) -> Function {
    Function::native(vec![TypeId::Double; 2], move |_, args| {
        match args.as_slice() {
            [Value::Double(x)] => Ok(Value::Double(f(*x))),
            _ => unreachable!("dispatch guarantees a Double argument"),
        }
    })
}

fn binary_double(f: fn(f64, f64) -> f64) -> Function {
    Function::native(vec![TypeId::Double; 3], move |_, args| {
        match args.as_slice() {
            [Value::Double(l), Value::Double(r)] => Ok(Value::Double(f(*l, *r))),
            _ => unreachable!("dispatch guarantees Double arguments"),
        }
    })
}

fn unary_int(f: fn(i64) -> i64) -> Function {
    Function::native(vec![TypeId::Int; 2], move |_, args| {
        match args.as_slice() {
            [Value::Int(n)] => Ok(Value::Int(f(*n))),
            _ => unreachable!("dispatch guarantees an Int argument"),
        }
    })
}

fn binary_int(f: fn(i64, i64) -> i64) -> Function {
    Function::native(vec![TypeId::Int; 3], move |_, args| {
        match args.as_slice() {
            [Value::Int(l), Value::Int(r)] => Ok(Value::Int(f(*l, *r))),
            _ => unreachable!("dispatch guarantees Int arguments"),
        }
    })
}

fn int_division() -> Function {
    Function::native(vec![TypeId::Int; 3], |_, args| match args.as_slice() {
        [Value::Int(_), Value::Int(0)] => Err(EvalError::DivisionByZero),
        [Value::Int(l), Value::Int(r)] => Ok(Value::Int(l.wrapping_div(*r))),
        _ => unreachable!("dispatch guarantees Int arguments"),
    })
}

fn string_concat() -> Function {
    Function::native(vec![TypeId::String; 3], |_, args| {
        match args.as_slice() {
            [Value::String(l), Value::String(r)] => Ok(Value::string(format!("{l}{r}"))),
            _ => unreachable!("dispatch guarantees String arguments"),
        }
    })
}

fn string_repeat() -> Function {
    let signature = vec![TypeId::String, TypeId::String, TypeId::Int];
    Function::native(signature, |_, args| match args.as_slice() {
        [Value::String(s), Value::Int(n)] => {
            // A non-positive count collapses to the empty string.
            let count = usize::try_from(*n).unwrap_or(0);
            Ok(Value::string(s.repeat(count)))
        }
        _ => unreachable!("dispatch guarantees String and Int arguments"),
    })
}

fn int_to_double() -> Function {
    let signature = vec![TypeId::Double, TypeId::Int];
    Function::native(signature, |_, args| match args.as_slice() {
        [Value::Int(n)] => Ok(Value::Double(*n as f64)),
        _ => unreachable!("dispatch guarantees an Int argument"),
    })
}
