//! Execution of generated code against instance data.
//!
//! JSON values carry no inherited members, so an [`Instance`] can be given a
//! prototype: a map of properties every object in the instance exposes without
//! owning them. Presence tests compiled with the own-properties option ignore
//! the prototype; all other lookups fall back to it.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::codegen::{Block, ErrorSite, Expr, Name, ParamValue, Stmt};
use crate::error::{ExecError, SchemaError};
use crate::keyword::ErrorParams;
use crate::path::JsonPointer;
use crate::schema::JsonType;

static UNDEFINED: Value = Value::Null;

/// Instance data handed to a validator.
///
/// # Example
///
/// ```rust
/// use depgen::{compile, CompileOptions, Instance};
/// use serde_json::{json, Map};
///
/// let schema = json!({"dependencies": {"a": ["b"]}});
/// let mut prototype = Map::new();
/// prototype.insert("b".to_string(), json!("inherited"));
///
/// let value = json!({"a": 1});
/// let instance = Instance::new(&value).with_prototype(&prototype);
///
/// let loose = compile(&schema, &CompileOptions::new()).unwrap();
/// assert!(loose.validate_instance(&instance).unwrap().is_success());
///
/// let strict = compile(&schema, &CompileOptions::new().own_properties(true)).unwrap();
/// assert!(strict.validate_instance(&instance).unwrap().is_failure());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Instance<'a> {
    value: &'a Value,
    prototype: Option<&'a Map<String, Value>>,
}

impl<'a> Instance<'a> {
    /// Wraps a JSON value with no inherited properties.
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            prototype: None,
        }
    }

    /// Sets the properties inherited by every object in the instance.
    pub fn with_prototype(mut self, prototype: &'a Map<String, Value>) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// The root value.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Looks up `property` on `target`, consulting the prototype unless `own`.
    ///
    /// Non-objects have no properties.
    pub fn lookup(&self, target: &'a Value, property: &str, own: bool) -> Option<&'a Value> {
        let obj = target.as_object()?;
        match obj.get(property) {
            Some(v) => Some(v),
            None if own => None,
            None => self.prototype.and_then(|p| p.get(property)),
        }
    }
}

/// Runs generated code and returns the errors it reported, in order.
pub fn run(code: &Block, instance: &Instance<'_>) -> Result<Vec<SchemaError>, ExecError> {
    let mut machine = Machine::new(instance);
    machine.block(code)?;
    Ok(machine.errors)
}

enum Flow<'b> {
    Next,
    Enter(&'b Block),
    Return,
}

struct Machine<'i, 'a> {
    instance: &'i Instance<'a>,
    vars: HashMap<Name, Value>,
    data: HashMap<Name, (&'a Value, JsonPointer)>,
    errors: Vec<SchemaError>,
}

impl<'i, 'a> Machine<'i, 'a> {
    fn new(instance: &'i Instance<'a>) -> Self {
        let mut data = HashMap::new();
        data.insert(Name::data(), (instance.value(), JsonPointer::root()));
        Self {
            instance,
            vars: HashMap::new(),
            data,
            errors: Vec::new(),
        }
    }

    /// Runs `block` until it ends or a statement stops validation.
    ///
    /// Branches are entered through an explicit stack, so deep else chains
    /// do not grow the call stack.
    fn block(&mut self, block: &Block) -> Result<(), ExecError> {
        let mut frames = vec![block.stmts().iter()];
        while let Some(frame) = frames.last_mut() {
            let Some(stmt) = frame.next() else {
                frames.pop();
                continue;
            };
            match self.stmt(stmt)? {
                Flow::Next => {}
                Flow::Enter(branch) => frames.push(branch.stmts().iter()),
                Flow::Return => return Ok(()),
            }
        }
        Ok(())
    }

    fn stmt<'b>(&mut self, stmt: &'b Stmt) -> Result<Flow<'b>, ExecError> {
        match stmt {
            Stmt::Let { name, value } | Stmt::Assign { name, value } => {
                let value = self.eval(value)?;
                self.vars.insert(name.clone(), value);
            }
            Stmt::BindData {
                name,
                parent,
                property,
            } => {
                let (target, path) = self.data_ref(parent)?;
                let path = path.push_key(property);
                let value = self
                    .instance
                    .lookup(target, property, false)
                    .unwrap_or(&UNDEFINED);
                self.data.insert(name.clone(), (value, path));
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                let taken = truthy(&self.eval(cond)?);
                return Ok(match (taken, otherwise) {
                    (true, _) => Flow::Enter(then),
                    (false, Some(otherwise)) => Flow::Enter(otherwise),
                    (false, None) => Flow::Next,
                });
            }
            Stmt::Report(site) => self.report(site)?,
            Stmt::Fail(site) => {
                self.report(site)?;
                return Ok(Flow::Return);
            }
            Stmt::Return(_) => return Ok(Flow::Return),
        }
        Ok(Flow::Next)
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, ExecError> {
        let value = match expr {
            Expr::Undefined => Value::Null,
            Expr::Bool(b) => Value::Bool(*b),
            Expr::Str(s) => Value::String(s.clone()),
            Expr::Var(name) => self.var(name)?.clone(),
            Expr::Not(inner) => Value::Bool(!truthy(&self.eval(inner)?)),
            Expr::And(exprs) => {
                for e in exprs {
                    if !truthy(&self.eval(e)?) {
                        return Ok(Value::Bool(false));
                    }
                }
                Value::Bool(true)
            }
            Expr::Or(exprs) => {
                for e in exprs {
                    if truthy(&self.eval(e)?) {
                        return Ok(Value::Bool(true));
                    }
                }
                Value::Bool(false)
            }
            Expr::IsType { data, ty } => {
                let (target, _) = self.data_ref(data)?;
                Value::Bool(JsonType::of(target) == *ty)
            }
            Expr::HasProperty {
                data,
                property,
                own,
            } => {
                let (target, _) = self.data_ref(data)?;
                Value::Bool(self.instance.lookup(target, property, *own).is_some())
            }
            Expr::Bind { name, value } => {
                let value = self.eval(value)?;
                self.vars.insert(name.clone(), value);
                Value::Bool(true)
            }
            Expr::ErrorCount => Value::from(self.errors.len()),
            Expr::NoErrorsSince(name) => {
                let before = self.var(name)?.as_u64();
                Value::Bool(before == Some(self.errors.len() as u64))
            }
        };
        Ok(value)
    }

    fn var(&self, name: &Name) -> Result<&Value, ExecError> {
        self.vars
            .get(name)
            .ok_or_else(|| ExecError::UnboundName(name.to_string()))
    }

    fn data_ref(&self, name: &Name) -> Result<(&'a Value, JsonPointer), ExecError> {
        self.data
            .get(name)
            .map(|(value, path)| (*value, path.clone()))
            .ok_or_else(|| ExecError::UnboundData(name.to_string()))
    }

    fn report(&mut self, site: &ErrorSite) -> Result<(), ExecError> {
        let mut raw = ErrorParams::new();
        for (key, value) in &site.params {
            let value = match value {
                ParamValue::Literal(v) => v.clone(),
                ParamValue::Var(name) => self.var(name)?.clone(),
            };
            raw.insert(key.clone(), value);
        }

        let (_, instance_path) = self.data_ref(&site.data)?;
        let error = SchemaError::new(site.keyword, instance_path, (site.descriptor.message)(&raw))
            .with_schema_path(site.schema_path.clone())
            .with_params((site.descriptor.params)(&raw));
        self.errors.push(error);
        Ok(())
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::CodeGen;
    use serde_json::json;

    #[test]
    fn test_lookup_own_and_inherited() {
        let value = json!({"a": 1});
        let mut proto = Map::new();
        proto.insert("b".to_string(), json!(2));
        let instance = Instance::new(&value).with_prototype(&proto);

        assert_eq!(instance.lookup(&value, "a", true), Some(&json!(1)));
        assert_eq!(instance.lookup(&value, "b", false), Some(&json!(2)));
        assert_eq!(instance.lookup(&value, "b", true), None);
        assert_eq!(instance.lookup(&json!("str"), "b", false), None);
    }

    #[test]
    fn test_null_valued_property_is_present() {
        let value = json!({"a": null});
        let instance = Instance::new(&value);
        assert!(instance.lookup(&value, "a", true).is_some());
    }

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!("b")));
        assert!(truthy(&json!(3)));
        assert!(truthy(&json!({})));
    }

    #[test]
    fn test_bind_inside_or_short_circuits() {
        let mut gen = CodeGen::new();
        let missing = gen.declare("missing");
        let first = gen.let_(
            "found",
            Expr::or([
                Expr::and([Expr::Bool(false), Expr::bind(&missing, Expr::Str("a".into()))]),
                Expr::bind(&missing, Expr::Str("b".into())),
                Expr::bind(&missing, Expr::Str("c".into())),
            ]),
        );
        gen.if_(Expr::var(&first));
        gen.push(Stmt::Return(true));
        gen.end_if();
        let code = gen.finish().unwrap();

        let value = json!({});
        let instance = Instance::new(&value);
        let mut machine = Machine::new(&instance);
        machine.block(&code).unwrap();
        assert_eq!(machine.vars[&missing], json!("b"));
    }

    #[test]
    fn test_unbound_name_is_an_error() {
        let mut gen = CodeGen::new();
        let ghost = gen.name("ghost");
        gen.if_(Expr::var(&ghost));
        gen.end_if();
        let code = gen.finish().unwrap();

        let value = json!({});
        let err = run(&code, &Instance::new(&value)).unwrap_err();
        assert_eq!(err, ExecError::UnboundName("ghost0".to_string()));
    }

    #[test]
    fn test_bind_data_tracks_path() {
        let mut gen = CodeGen::new();
        let child = gen.bind_data(&Name::data(), "user");
        gen.if_(Expr::IsType {
            data: child.clone(),
            ty: JsonType::Object,
        });
        gen.push(Stmt::Return(false));
        gen.end_if();
        let code = gen.finish().unwrap();

        let value = json!({"user": {}});
        let instance = Instance::new(&value);
        let mut machine = Machine::new(&instance);
        machine.block(&code).unwrap();
        assert_eq!(machine.data[&child].1.to_string(), "/user");
    }
}
