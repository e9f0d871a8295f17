//! # Validation Engine
//!
//! A recursive tree-walk of the compiled graph against one instance value.
//!
//! ## Evaluation Order
//!
//! For a keyword schema: `$ref`, `not`, `if`/`then`/`else`, `const`,
//! `enum`, `allOf`/`anyOf`/`oneOf`, then exactly one branch chosen by the
//! instance's runtime shape (null, boolean, number, string, array, object),
//! which checks `type` and the shape-specific keywords. A violation never
//! stops sibling keywords from running; all violations are collected.
//!
//! ## Trial Evaluation
//!
//! `not`, `if`, `contains`, `anyOf` and `oneOf` only need pass/fail. They
//! evaluate into a fresh violation list that is discarded afterwards, so
//! nothing from a trial leaks into the caller's result.
//!
//! ## Depth Guard
//!
//! Following a `$ref` pushes a schema frame. Once the frame stack reaches
//! `max_stack_depth` the call fails with
//! [`EvaluationError::StackOverflow`]. Nesting through `allOf`,
//! `properties`, `items` and friends is bounded only by the schema and
//! instance themselves.

use jsv_core::{code_point_len, json_equal, number_value, EvaluationError};
use serde_json::{Map, Number, Value};

use crate::registry::Registry;
use crate::result::ValidationError;
use crate::schema::{Dependency, Items, Keywords, NodeIndex, Reference, SchemaKind};
use crate::stack::EvalStack;

/// Tolerance for the remainder of `multipleOf` division.
pub const MULTIPLE_OF_EPSILON: f64 = 0.001;

/// Accumulated violations, optionally capped.
#[derive(Debug)]
struct Violations {
    errors: Vec<ValidationError>,
    /// Zero means unlimited.
    limit: usize,
}

impl Violations {
    fn with_limit(limit: usize) -> Self {
        Self {
            errors: Vec::new(),
            limit,
        }
    }

    /// A scratch list for pass/fail checks; one violation settles it.
    fn trial() -> Self {
        Self::with_limit(1)
    }

    fn is_full(&self) -> bool {
        self.limit != 0 && self.errors.len() >= self.limit
    }

    fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

pub(crate) struct Vm<'a> {
    registry: &'a Registry,
    max_stack_depth: usize,
    stack: EvalStack,
}

impl<'a> Vm<'a> {
    pub(crate) fn new(registry: &'a Registry, max_stack_depth: usize) -> Self {
        Self {
            registry,
            max_stack_depth,
            stack: EvalStack::new(),
        }
    }

    /// Evaluate `instance` against the node at `root`, located at `tokens`
    /// inside the document `uri`. `max_errors` of zero collects everything.
    pub(crate) fn exec(
        mut self,
        uri: &str,
        tokens: Vec<String>,
        root: NodeIndex,
        instance: &Value,
        max_errors: usize,
    ) -> Result<Vec<ValidationError>, EvaluationError> {
        self.stack.push_schema(uri, tokens);
        let mut out = Violations::with_limit(max_errors);
        self.eval(root, instance, &mut out)?;
        self.stack.pop_schema();

        if out.is_full() {
            tracing::debug!(max_errors, "validation stopped at error limit");
        }
        Ok(out.errors)
    }

    fn eval(
        &mut self,
        index: NodeIndex,
        instance: &Value,
        out: &mut Violations,
    ) -> Result<(), EvaluationError> {
        if out.is_full() {
            return Ok(());
        }
        let registry = self.registry;
        let keywords = match registry.get(index).kind() {
            SchemaKind::Bool(true) => return Ok(()),
            SchemaKind::Bool(false) => {
                self.report(&[], out);
                return Ok(());
            }
            SchemaKind::Keywords(keywords) => keywords,
        };

        if let Some(reference) = &keywords.reference {
            self.follow(reference, instance, out)?;
        }

        if let Some(not) = keywords.not {
            if self.trial(&["not"], None, not, instance)? {
                self.report(&["not"], out);
            }
        }

        if let Some(condition) = keywords.if_ {
            let branch = if self.trial(&["if"], None, condition, instance)? {
                keywords.then.map(|then| ("then", then))
            } else {
                keywords.else_.map(|else_| ("else", else_))
            };
            if let Some((token, branch)) = branch {
                self.descend(&[token], None, branch, instance, out)?;
            }
        }

        if let Some(constant) = &keywords.constant {
            if !json_equal(constant, instance) {
                self.report(&["const"], out);
            }
        }

        if let Some(values) = &keywords.enumeration {
            if !values.iter().any(|value| json_equal(value, instance)) {
                self.report(&["enum"], out);
            }
        }

        self.combinators(keywords, instance, out)?;

        match instance {
            Value::Null => self.check_type(keywords, instance, out),
            Value::Bool(_) => self.check_type(keywords, instance, out),
            Value::Number(n) => {
                self.check_type(keywords, instance, out);
                self.number(keywords, n, out);
            }
            Value::String(s) => {
                self.check_type(keywords, instance, out);
                self.string(keywords, s, out);
            }
            Value::Array(items) => {
                self.check_type(keywords, instance, out);
                self.array(keywords, items, out)?;
            }
            Value::Object(map) => {
                self.check_type(keywords, instance, out);
                self.object(keywords, instance, map, out)?;
            }
        }
        Ok(())
    }

    fn follow(
        &mut self,
        reference: &Reference,
        instance: &Value,
        out: &mut Violations,
    ) -> Result<(), EvaluationError> {
        let Some(target) = reference.resolved() else {
            let uri = reference.target().key();
            tracing::error!(uri = %uri, "reached an unlinked $ref");
            return Err(EvaluationError::UnlinkedReference { uri });
        };
        if self.stack.schema_depth() >= self.max_stack_depth {
            return Err(EvaluationError::StackOverflow {
                max_depth: self.max_stack_depth,
            });
        }
        let location = reference.target();
        self.stack
            .push_schema(location.base().as_str(), location.pointer().tokens().to_vec());
        let result = self.eval(target, instance, out);
        self.stack.pop_schema();
        result
    }

    fn combinators(
        &mut self,
        keywords: &Keywords,
        instance: &Value,
        out: &mut Violations,
    ) -> Result<(), EvaluationError> {
        if let Some(all_of) = &keywords.all_of {
            for (i, &schema) in all_of.iter().enumerate() {
                self.descend(&["allOf", &i.to_string()], None, schema, instance, out)?;
            }
        }

        if let Some(any_of) = &keywords.any_of {
            let mut passed = false;
            for (i, &schema) in any_of.iter().enumerate() {
                if self.trial(&["anyOf", &i.to_string()], None, schema, instance)? {
                    passed = true;
                    break;
                }
            }
            if !passed {
                self.report(&["anyOf"], out);
            }
        }

        if let Some(one_of) = &keywords.one_of {
            let mut passed = 0usize;
            for (i, &schema) in one_of.iter().enumerate() {
                if self.trial(&["oneOf", &i.to_string()], None, schema, instance)? {
                    passed += 1;
                    if passed > 1 {
                        break;
                    }
                }
            }
            if passed != 1 {
                self.report(&["oneOf"], out);
            }
        }
        Ok(())
    }

    fn check_type(&mut self, keywords: &Keywords, instance: &Value, out: &mut Violations) {
        if let Some(types) = &keywords.types {
            if !types.iter().any(|ty| ty.matches(instance)) {
                self.report(&["type"], out);
            }
        }
    }

    fn number(&mut self, keywords: &Keywords, n: &Number, out: &mut Violations) {
        let value = number_value(n);

        if let Some(divisor) = keywords.multiple_of {
            if (value % divisor).abs() > MULTIPLE_OF_EPSILON {
                self.report(&["multipleOf"], out);
            }
        }
        if keywords.maximum.is_some_and(|max| value > max) {
            self.report(&["maximum"], out);
        }
        if keywords.minimum.is_some_and(|min| value < min) {
            self.report(&["minimum"], out);
        }
        if keywords.exclusive_maximum.is_some_and(|max| value >= max) {
            self.report(&["exclusiveMaximum"], out);
        }
        if keywords.exclusive_minimum.is_some_and(|min| value <= min) {
            self.report(&["exclusiveMinimum"], out);
        }
    }

    fn string(&mut self, keywords: &Keywords, s: &str, out: &mut Violations) {
        if keywords.max_length.is_some() || keywords.min_length.is_some() {
            let len = code_point_len(s);
            if keywords.max_length.is_some_and(|max| len > max) {
                self.report(&["maxLength"], out);
            }
            if keywords.min_length.is_some_and(|min| len < min) {
                self.report(&["minLength"], out);
            }
        }
        if let Some(pattern) = &keywords.pattern {
            if !pattern.is_match(s) {
                self.report(&["pattern"], out);
            }
        }
    }

    fn array(
        &mut self,
        keywords: &Keywords,
        items: &[Value],
        out: &mut Violations,
    ) -> Result<(), EvaluationError> {
        match &keywords.items {
            None => {}
            Some(Items::Single(schema)) => {
                for (i, item) in items.iter().enumerate() {
                    if out.is_full() {
                        break;
                    }
                    self.descend(&["items"], Some(&i.to_string()), *schema, item, out)?;
                }
            }
            Some(Items::Positional(schemas)) => {
                for (i, (&schema, item)) in schemas.iter().zip(items).enumerate() {
                    if out.is_full() {
                        break;
                    }
                    let index = i.to_string();
                    self.descend(&["items", &index], Some(&index), schema, item, out)?;
                }
                if let Some(additional) = keywords.additional_items {
                    for (i, item) in items.iter().enumerate().skip(schemas.len()) {
                        if out.is_full() {
                            break;
                        }
                        self.descend(&["additionalItems"], Some(&i.to_string()), additional, item, out)?;
                    }
                }
            }
        }

        if keywords.max_items.is_some_and(|max| items.len() > max) {
            self.report(&["maxItems"], out);
        }
        if keywords.min_items.is_some_and(|min| items.len() < min) {
            self.report(&["minItems"], out);
        }

        if keywords.unique_items {
            let duplicated = items
                .iter()
                .enumerate()
                .any(|(i, a)| items[i + 1..].iter().any(|b| json_equal(a, b)));
            if duplicated {
                self.report(&["uniqueItems"], out);
            }
        }

        if let Some(contains) = keywords.contains {
            let mut found = false;
            for (i, item) in items.iter().enumerate() {
                if self.trial(&["contains"], Some(&i.to_string()), contains, item)? {
                    found = true;
                    break;
                }
            }
            if !found {
                self.report(&["contains"], out);
            }
        }
        Ok(())
    }

    fn object(
        &mut self,
        keywords: &Keywords,
        instance: &Value,
        map: &Map<String, Value>,
        out: &mut Violations,
    ) -> Result<(), EvaluationError> {
        if keywords.max_properties.is_some_and(|max| map.len() > max) {
            self.report(&["maxProperties"], out);
        }
        if keywords.min_properties.is_some_and(|min| map.len() < min) {
            self.report(&["minProperties"], out);
        }

        if let Some(required) = &keywords.required {
            for (i, name) in required.iter().enumerate() {
                if !map.contains_key(name) {
                    self.report(&["required", &i.to_string()], out);
                }
            }
        }

        for (key, value) in map {
            if out.is_full() {
                break;
            }
            let mut matched = false;

            if let Some(&schema) = keywords.properties.as_ref().and_then(|p| p.get(key)) {
                self.descend(&["properties", key], Some(key), schema, value, out)?;
                matched = true;
            }

            for entry in keywords.pattern_properties.iter().flatten() {
                if entry.regex.is_match(key) {
                    self.descend(
                        &["patternProperties", entry.regex.as_str()],
                        Some(key),
                        entry.schema,
                        value,
                        out,
                    )?;
                    matched = true;
                }
            }

            if !matched {
                if let Some(additional) = keywords.additional_properties {
                    self.descend(&["additionalProperties"], Some(key), additional, value, out)?;
                }
            }
        }

        if let Some(dependencies) = &keywords.dependencies {
            for (name, dependency) in dependencies {
                if !map.contains_key(name) {
                    continue;
                }
                match dependency {
                    Dependency::Schema(schema) => {
                        self.descend(&["dependencies", name], None, *schema, instance, out)?;
                    }
                    Dependency::Required(names) => {
                        for (i, required) in names.iter().enumerate() {
                            if !map.contains_key(required) {
                                self.report(&["dependencies", name, &i.to_string()], out);
                            }
                        }
                    }
                }
            }
        }

        if let Some(property_names) = keywords.property_names {
            for key in map.keys() {
                if out.is_full() {
                    break;
                }
                let name = Value::String(key.clone());
                self.descend(&["propertyNames"], Some(key), property_names, &name, out)?;
            }
        }
        Ok(())
    }

    /// Evaluate a child schema for real, under the given path tokens.
    fn descend(
        &mut self,
        schema_tokens: &[&str],
        instance_token: Option<&str>,
        index: NodeIndex,
        instance: &Value,
        out: &mut Violations,
    ) -> Result<(), EvaluationError> {
        for token in schema_tokens {
            self.stack.push_schema_token(*token);
        }
        if let Some(token) = instance_token {
            self.stack.push_instance_token(token);
        }
        let result = self.eval(index, instance, out);
        if instance_token.is_some() {
            self.stack.pop_instance_token();
        }
        for _ in schema_tokens {
            self.stack.pop_schema_token();
        }
        result
    }

    /// Evaluate a child schema into a scratch list; true if it passed.
    fn trial(
        &mut self,
        schema_tokens: &[&str],
        instance_token: Option<&str>,
        index: NodeIndex,
        instance: &Value,
    ) -> Result<bool, EvaluationError> {
        let mut scratch = Violations::trial();
        self.descend(schema_tokens, instance_token, index, instance, &mut scratch)?;
        Ok(scratch.is_empty())
    }

    fn report(&mut self, schema_tokens: &[&str], out: &mut Violations) {
        if out.is_full() {
            return;
        }
        for token in schema_tokens {
            self.stack.push_schema_token(*token);
        }
        out.errors.push(self.stack.error());
        for _ in schema_tokens {
            self.stack.pop_schema_token();
        }
    }
}
