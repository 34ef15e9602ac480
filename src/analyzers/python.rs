//! Python outline via tree-sitter
//!
//! Top-level assignments, functions and classes, plus the methods and
//! `property(...)` assignments directly inside each class body.

use std::collections::HashMap;

use tree_sitter::{Node, Parser, Tree};

use crate::analysis::{Analyzer, AnalyzerError};
use crate::model::{PropertyAccessors, StructureItem};

pub const CONTENT_TYPE: &str = "text/x-python";

#[derive(Debug, Default, Clone, Copy)]
pub struct PythonAnalyzer;

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, source: &str) -> Result<Tree, AnalyzerError> {
        // Parsers are not Sync; one per call keeps the analyzer shareable
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| AnalyzerError::new(format!("cannot load Python grammar: {}", e)))?;
        parser
            .parse(source, None)
            .ok_or_else(|| AnalyzerError::new("parser produced no tree"))
    }
}

impl Analyzer for PythonAnalyzer {
    fn analyze(&self, source: &str) -> Result<Vec<StructureItem>, AnalyzerError> {
        let tree = self.parse(source)?;
        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(root).unwrap_or(0);
            return Err(AnalyzerError::new(format!("syntax error on line {}", line + 1)));
        }

        let mut items = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            collect_top_level(child, source, &mut items);
        }
        Ok(items)
    }
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row);
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(first_error_line);
    found
}

fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// Unwrap `@decorator` wrappers to the definition inside
fn definition(node: Node) -> Node {
    if node.kind() == "decorated_definition" {
        if let Some(inner) = node.child_by_field_name("definition") {
            return inner;
        }
    }
    node
}

fn collect_top_level(node: Node, source: &str, items: &mut Vec<StructureItem>) {
    let node = definition(node);
    match node.kind() {
        "expression_statement" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() == "assignment" {
                    collect_assigned_names(child, source, items);
                }
            }
        }
        "function_definition" => {
            if let Some(item) = function_item(node, source, false) {
                items.push(item);
            }
        }
        "class_definition" => collect_class(node, source, items),
        _ => {}
    }
}

/// `a = b = 1` and `x, y = ...` define several globals
fn collect_assigned_names(assignment: Node, source: &str, items: &mut Vec<StructureItem>) {
    if let Some(left) = assignment.child_by_field_name("left") {
        push_targets(left, source, items);
    }
    if let Some(right) = assignment.child_by_field_name("right") {
        if right.kind() == "assignment" {
            collect_assigned_names(right, source, items);
        }
    }
}

fn push_targets(target: Node, source: &str, items: &mut Vec<StructureItem>) {
    match target.kind() {
        "identifier" => {
            items.push(StructureItem::global(
                target.start_position().row,
                node_text(&target, source),
            ));
        }
        "pattern_list" | "tuple_pattern" | "list_pattern" => {
            let mut cursor = target.walk();
            for child in target.named_children(&mut cursor) {
                push_targets(child, source, items);
            }
        }
        // Attribute and subscript targets do not define names
        _ => {}
    }
}

/// `name(a, b=1, *rest)` label from a parameter list
fn signature(name: &str, parameters: Option<Node>, source: &str) -> String {
    let Some(parameters) = parameters else {
        return name.to_string();
    };
    let mut cursor = parameters.walk();
    let params: Vec<&str> = parameters
        .named_children(&mut cursor)
        .filter(|p| p.kind() != "comment")
        .map(|p| match p.kind() {
            "default_parameter" | "typed_default_parameter" => p
                .child_by_field_name("name")
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| node_text(&p, source)),
            "typed_parameter" => p
                .named_child(0)
                .map(|n| node_text(&n, source))
                .unwrap_or_else(|| node_text(&p, source)),
            _ => node_text(&p, source),
        })
        .collect();
    format!("{}({})", name, params.join(", "))
}

fn function_item(node: Node, source: &str, is_method: bool) -> Option<StructureItem> {
    let name = node_text(&node.child_by_field_name("name")?, source);
    let line = node.start_position().row;
    let long_name = signature(name, node.child_by_field_name("parameters"), source);
    let item = if is_method {
        StructureItem::method(line, name)
    } else {
        StructureItem::function(line, name)
    };
    Some(item.with_long_name(long_name))
}

fn collect_class(node: Node, source: &str, items: &mut Vec<StructureItem>) {
    let Some(name) = node.child_by_field_name("name") else {
        return;
    };
    items.push(StructureItem::class(
        node.start_position().row,
        node_text(&name, source),
    ));

    let Some(body) = node.child_by_field_name("body") else {
        return;
    };

    // Methods seen so far, by name, as indices into `items`
    let mut methods: HashMap<&str, usize> = HashMap::new();
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        let member = definition(member);
        match member.kind() {
            "function_definition" => {
                if let Some(item) = function_item(member, source, true) {
                    if let Some(name) = member.child_by_field_name("name") {
                        methods.insert(node_text(&name, source), items.len());
                    }
                    items.push(item);
                }
            }
            "expression_statement" => {
                let mut inner = member.walk();
                for assignment in member.named_children(&mut inner) {
                    if assignment.kind() == "assignment" {
                        if let Some(item) = property_item(assignment, source, &methods) {
                            items.push(item);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// `name = property(getter, setter, deleter)` with accessors resolved
/// against methods defined above it
fn property_item(
    assignment: Node,
    source: &str,
    methods: &HashMap<&str, usize>,
) -> Option<StructureItem> {
    let left = assignment.child_by_field_name("left")?;
    let right = assignment.child_by_field_name("right")?;
    if left.kind() != "identifier" || right.kind() != "call" {
        return None;
    }
    let function = right.child_by_field_name("function")?;
    if node_text(&function, source) != "property" {
        return None;
    }

    let mut slots: [Option<usize>; 3] = [None; 3];
    let mut positional = 0;
    let arguments = right.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    for argument in arguments.named_children(&mut cursor) {
        match argument.kind() {
            "identifier" => {
                if positional < slots.len() {
                    slots[positional] = methods.get(node_text(&argument, source)).copied();
                }
                positional += 1;
            }
            "keyword_argument" => {
                let slot = match argument
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, source))
                {
                    Some("fget") => 0,
                    Some("fset") => 1,
                    Some("fdel") => 2,
                    _ => continue,
                };
                slots[slot] = argument
                    .child_by_field_name("value")
                    .and_then(|v| methods.get(node_text(&v, source)).copied());
            }
            _ => positional += 1,
        }
    }

    let [getter, setter, deleter] = slots;
    Some(StructureItem::property(
        left.start_position().row,
        node_text(&left, source),
        PropertyAccessors {
            getter,
            setter,
            deleter,
        },
    ))
}
