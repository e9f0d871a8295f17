//! # Schema Compiler
//!
//! Recursive descent from a raw schema value to registered [`SchemaNode`]s.
//!
//! ## Scoping
//!
//! The compiler tracks the current document base and the JSON Pointer
//! tokens from the document root. `$id` is read only at the document root
//! (empty token path); a nested `$id` is not a scope boundary. Each node is
//! registered under `base#pointer`, which is exactly the key a `$ref` to
//! that location resolves to.
//!
//! ## Failure
//!
//! Every keyword is optional, but a present keyword with the wrong shape
//! aborts the whole compile with [`SchemaError::Malformed`]. `$ref` may sit
//! beside other keywords; all of them are compiled.

use std::collections::HashMap;

use jsv_core::{number_value, BaseUri, JsonPointer, JsonType, SchemaError};
use regex::Regex;
use serde_json::{Map, Value};

use crate::registry::Registry;
use crate::schema::{
    Dependency, Items, Keywords, NodeIndex, PatternProperty, Reference, SchemaKind, SchemaNode,
};

/// A compiled root document: its resolved base URI and root node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRoot {
    pub base: BaseUri,
    pub index: NodeIndex,
}

/// Compiles raw schemas into a [`Registry`].
pub struct Compiler<'r> {
    registry: &'r mut Registry,
    base: BaseUri,
    tokens: Vec<String>,
}

impl<'r> Compiler<'r> {
    /// Compile a root document. Its `$id`, if any, becomes the base URI.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Malformed`] for any ill-shaped keyword.
    pub fn compile_root(
        registry: &'r mut Registry,
        document: &Value,
    ) -> Result<CompiledRoot, SchemaError> {
        let mut compiler = Self {
            registry,
            base: BaseUri::anonymous(),
            tokens: Vec::new(),
        };
        let index = compiler.compile(document)?;
        Ok(CompiledRoot {
            base: compiler.base,
            index,
        })
    }

    /// Compile the sub-schema found at `pointer` inside the document whose
    /// base is `base`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Malformed`] for any ill-shaped keyword.
    pub fn compile_sub(
        registry: &'r mut Registry,
        base: BaseUri,
        pointer: JsonPointer,
        schema: &Value,
    ) -> Result<NodeIndex, SchemaError> {
        Self {
            registry,
            base,
            tokens: pointer.into_tokens(),
        }
        .compile(schema)
    }

    fn compile(&mut self, input: &Value) -> Result<NodeIndex, SchemaError> {
        let kind = match input {
            Value::Bool(value) => SchemaKind::Bool(*value),
            Value::Object(map) => SchemaKind::Keywords(Box::new(self.keywords(map)?)),
            other => {
                return Err(SchemaError::Malformed {
                    location: self.location(None),
                    reason: format!("expected an object or boolean schema, found {}", JsonType::of(other)),
                })
            }
        };
        let uri = self.base.key(&self.pointer());
        Ok(self.registry.add(SchemaNode::new(uri, kind)))
    }

    fn keywords(&mut self, map: &Map<String, Value>) -> Result<Keywords, SchemaError> {
        if self.tokens.is_empty() {
            match map.get("$id") {
                None => {}
                Some(Value::String(id)) => {
                    self.base = BaseUri::parse_id(id)
                        .map_err(|e| self.malformed("$id", e.to_string()))?;
                }
                Some(_) => return Err(self.malformed("$id", "must be a string")),
            }
        }

        let mut keywords = Keywords::default();

        match map.get("$ref") {
            None => {}
            Some(Value::String(reference)) => {
                let target = self
                    .base
                    .resolve(reference)
                    .map_err(|e| self.malformed("$ref", e.to_string()))?;
                keywords.reference = Some(Reference::new(target));
            }
            Some(_) => return Err(self.malformed("$ref", "must be a string")),
        }

        keywords.types = self.types(map)?;
        keywords.constant = map.get("const").cloned();
        keywords.enumeration = match map.get("enum") {
            None => None,
            Some(Value::Array(values)) => Some(values.clone()),
            Some(_) => return Err(self.malformed("enum", "must be an array")),
        };

        keywords.not = self.subschema(map, "not")?;
        keywords.if_ = self.subschema(map, "if")?;
        keywords.then = self.subschema(map, "then")?;
        keywords.else_ = self.subschema(map, "else")?;
        keywords.all_of = self.subschema_list(map, "allOf")?;
        keywords.any_of = self.subschema_list(map, "anyOf")?;
        keywords.one_of = self.subschema_list(map, "oneOf")?;

        keywords.multiple_of = self.number(map, "multipleOf")?;
        if keywords.multiple_of.is_some_and(|m| m <= 0.0) {
            return Err(self.malformed("multipleOf", "must be greater than zero"));
        }
        keywords.maximum = self.number(map, "maximum")?;
        keywords.minimum = self.number(map, "minimum")?;
        keywords.exclusive_maximum = self.number(map, "exclusiveMaximum")?;
        keywords.exclusive_minimum = self.number(map, "exclusiveMinimum")?;

        keywords.max_length = self.count(map, "maxLength")?;
        keywords.min_length = self.count(map, "minLength")?;
        keywords.pattern = match map.get("pattern") {
            None => None,
            Some(Value::String(pattern)) => Some(self.regex("pattern", pattern)?),
            Some(_) => return Err(self.malformed("pattern", "must be a string")),
        };

        keywords.items = self.items(map)?;
        keywords.additional_items = self.subschema(map, "additionalItems")?;
        keywords.max_items = self.count(map, "maxItems")?;
        keywords.min_items = self.count(map, "minItems")?;
        keywords.unique_items = match map.get("uniqueItems") {
            None => false,
            Some(Value::Bool(unique)) => *unique,
            Some(_) => return Err(self.malformed("uniqueItems", "must be a boolean")),
        };
        keywords.contains = self.subschema(map, "contains")?;

        keywords.max_properties = self.count(map, "maxProperties")?;
        keywords.min_properties = self.count(map, "minProperties")?;
        keywords.required = match map.get("required") {
            None => None,
            Some(value) => Some(self.string_list("required", value)?),
        };
        keywords.properties = self.properties(map)?;
        keywords.pattern_properties = self.pattern_properties(map)?;
        keywords.additional_properties = self.subschema(map, "additionalProperties")?;
        keywords.dependencies = self.dependencies(map)?;
        keywords.property_names = self.subschema(map, "propertyNames")?;

        Ok(keywords)
    }

    fn types(&self, map: &Map<String, Value>) -> Result<Option<Vec<JsonType>>, SchemaError> {
        let parse = |value: &Value| match value {
            Value::String(name) => JsonType::parse(name)
                .ok_or_else(|| self.malformed("type", format!("unknown type name '{name}'"))),
            _ => Err(self.malformed("type", "type names must be strings")),
        };
        match map.get("type") {
            None => Ok(None),
            Some(Value::Array(names)) => names.iter().map(parse).collect::<Result<_, _>>().map(Some),
            Some(single @ Value::String(_)) => Ok(Some(vec![parse(single)?])),
            Some(_) => Err(self.malformed("type", "must be a string or an array of strings")),
        }
    }

    fn items(&mut self, map: &Map<String, Value>) -> Result<Option<Items>, SchemaError> {
        match map.get("items") {
            None => Ok(None),
            Some(Value::Array(schemas)) => {
                let indices = self.with_token("items", |c| {
                    schemas
                        .iter()
                        .enumerate()
                        .map(|(i, schema)| c.with_token(i.to_string(), |c| c.compile(schema)))
                        .collect::<Result<Vec<_>, _>>()
                })?;
                Ok(Some(Items::Positional(indices)))
            }
            Some(schema @ (Value::Object(_) | Value::Bool(_))) => {
                let index = self.with_token("items", |c| c.compile(schema))?;
                Ok(Some(Items::Single(index)))
            }
            Some(_) => Err(self.malformed("items", "must be a schema or an array of schemas")),
        }
    }

    fn properties(
        &mut self,
        map: &Map<String, Value>,
    ) -> Result<Option<HashMap<String, NodeIndex>>, SchemaError> {
        let Some(value) = map.get("properties") else {
            return Ok(None);
        };
        let Value::Object(properties) = value else {
            return Err(self.malformed("properties", "must be an object"));
        };
        let compiled = self.with_token("properties", |c| {
            properties
                .iter()
                .map(|(name, schema)| {
                    let index = c.with_token(name.as_str(), |c| c.compile(schema))?;
                    Ok((name.clone(), index))
                })
                .collect::<Result<HashMap<_, _>, SchemaError>>()
        })?;
        Ok(Some(compiled))
    }

    fn pattern_properties(
        &mut self,
        map: &Map<String, Value>,
    ) -> Result<Option<Vec<PatternProperty>>, SchemaError> {
        let Some(value) = map.get("patternProperties") else {
            return Ok(None);
        };
        let Value::Object(patterns) = value else {
            return Err(self.malformed("patternProperties", "must be an object"));
        };
        let compiled = self.with_token("patternProperties", |c| {
            patterns
                .iter()
                .map(|(pattern, schema)| {
                    let regex = c.regex(pattern, pattern)?;
                    let schema = c.with_token(pattern.as_str(), |c| c.compile(schema))?;
                    Ok(PatternProperty { regex, schema })
                })
                .collect::<Result<Vec<_>, SchemaError>>()
        })?;
        Ok(Some(compiled))
    }

    fn dependencies(
        &mut self,
        map: &Map<String, Value>,
    ) -> Result<Option<Vec<(String, Dependency)>>, SchemaError> {
        let Some(value) = map.get("dependencies") else {
            return Ok(None);
        };
        let Value::Object(dependencies) = value else {
            return Err(self.malformed("dependencies", "must be an object"));
        };
        let compiled = self.with_token("dependencies", |c| {
            dependencies
                .iter()
                .map(|(name, dependency)| {
                    let dependency = match dependency {
                        Value::Array(_) => {
                            Dependency::Required(c.string_list(name, dependency)?)
                        }
                        Value::Object(_) | Value::Bool(_) => {
                            Dependency::Schema(c.with_token(name.as_str(), |c| c.compile(dependency))?)
                        }
                        _ => {
                            return Err(c.malformed(
                                name,
                                "must be a schema or an array of property names",
                            ))
                        }
                    };
                    Ok((name.clone(), dependency))
                })
                .collect::<Result<Vec<_>, SchemaError>>()
        })?;
        Ok(Some(compiled))
    }

    fn subschema(
        &mut self,
        map: &Map<String, Value>,
        keyword: &str,
    ) -> Result<Option<NodeIndex>, SchemaError> {
        map.get(keyword)
            .map(|schema| self.with_token(keyword, |c| c.compile(schema)))
            .transpose()
    }

    fn subschema_list(
        &mut self,
        map: &Map<String, Value>,
        keyword: &str,
    ) -> Result<Option<Vec<NodeIndex>>, SchemaError> {
        match map.get(keyword) {
            None => Ok(None),
            Some(Value::Array(schemas)) if !schemas.is_empty() => self
                .with_token(keyword, |c| {
                    schemas
                        .iter()
                        .enumerate()
                        .map(|(i, schema)| c.with_token(i.to_string(), |c| c.compile(schema)))
                        .collect::<Result<Vec<_>, _>>()
                })
                .map(Some),
            Some(_) => Err(self.malformed(keyword, "must be a non-empty array of schemas")),
        }
    }

    fn number(&self, map: &Map<String, Value>, keyword: &str) -> Result<Option<f64>, SchemaError> {
        match map.get(keyword) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(number_value(n))),
            Some(_) => Err(self.malformed(keyword, "must be a number")),
        }
    }

    /// A non-negative integer; `3.0` is accepted as `3`.
    fn count(&self, map: &Map<String, Value>, keyword: &str) -> Result<Option<usize>, SchemaError> {
        let invalid = || self.malformed(keyword, "must be a non-negative integer");
        match map.get(keyword) {
            None => Ok(None),
            Some(Value::Number(n)) => {
                if let Some(count) = n.as_u64() {
                    return Ok(Some(usize::try_from(count).unwrap_or(usize::MAX)));
                }
                let f = number_value(n);
                if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
                    Ok(Some(f as usize))
                } else {
                    Err(invalid())
                }
            }
            Some(_) => Err(invalid()),
        }
    }

    fn string_list(&self, keyword: &str, value: &Value) -> Result<Vec<String>, SchemaError> {
        let invalid = || self.malformed(keyword, "must be an array of strings");
        let Value::Array(values) = value else {
            return Err(invalid());
        };
        values
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
            .collect()
    }

    fn regex(&self, keyword: &str, pattern: &str) -> Result<Regex, SchemaError> {
        Regex::new(pattern)
            .map_err(|e| self.malformed(keyword, format!("invalid regular expression '{pattern}': {e}")))
    }

    fn with_token<T>(
        &mut self,
        token: impl Into<String>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.tokens.push(token.into());
        let result = f(self);
        self.tokens.pop();
        result
    }

    fn pointer(&self) -> JsonPointer {
        JsonPointer::from_tokens(self.tokens.iter().cloned())
    }

    fn location(&self, keyword: Option<&str>) -> String {
        let mut tokens = self.tokens.clone();
        tokens.extend(keyword.map(str::to_string));
        let key = self.base.key(&JsonPointer::from_tokens(tokens));
        if key.is_empty() {
            "#".to_string()
        } else {
            key
        }
    }

    fn malformed(&self, keyword: &str, reason: impl Into<String>) -> SchemaError {
        SchemaError::Malformed {
            location: self.location(Some(keyword)),
            reason: reason.into(),
        }
    }
}
