use std::{cmp::Ordering, fmt};

use serde_json::{Map, Value};
use thiserror::Error;

pub mod detect;
pub mod seed;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
	#[error("execution graph is not an object")]
	NotAnObject,
	#[error("node `{0}` is not an object")]
	Node(String),
	#[error("node `{0}` has a non-string class_type")]
	ClassType(String),
	#[error("node `{0}` has inputs that are not an object")]
	Inputs(String),
	#[error("input `{field}` of node `{id}` is an empty list")]
	EmptyList { id: String, field: String },
}

/// A node identifier as found in the execution graph.
///
/// Identifiers made only of digits order numerically (`"2"` before `"10"`)
/// and before every other identifier; the rest order lexically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId<'a>(pub &'a str);

impl NodeId<'_> {
	fn numeric(&self) -> Option<&str> {
		let id = self.0;
		if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}
		let trimmed = id.trim_start_matches('0');
		Some(if trimmed.is_empty() { "0" } else { trimmed })
	}
}

impl Ord for NodeId<'_> {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self.numeric(), other.numeric()) {
			(Some(a), Some(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)).then_with(|| self.0.cmp(other.0)),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => self.0.cmp(other.0),
		}
	}
}

impl PartialOrd for NodeId<'_> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl fmt::Display for NodeId<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// One entry of the execution graph: `{ "class_type": ..., "inputs": {...} }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<'a> {
	pub id: NodeId<'a>,
	pub class_type: &'a str,
	inputs: Option<&'a Value>,
}

impl<'a> Node<'a> {
	fn parse(id: &'a str, value: &'a Value) -> Result<Self, GraphError> {
		let node = value.as_object().ok_or_else(|| GraphError::Node(id.to_string()))?;
		let class_type = match node.get("class_type") {
			None => "",
			Some(Value::String(class_type)) => class_type.as_str(),
			Some(_) => return Err(GraphError::ClassType(id.to_string())),
		};
		Ok(Self {
			id: NodeId(id),
			class_type,
			inputs: node.get("inputs"),
		})
	}

	/// Whether the class type contains any of `kinds`.
	pub fn is_any(&self, kinds: &[&str]) -> bool {
		kinds.iter().any(|kind| self.class_type.contains(kind))
	}

	/// Whether the class type is exactly one of `kinds`.
	pub fn is_one_of(&self, kinds: &[&str]) -> bool {
		kinds.contains(&self.class_type)
	}

	/// The node inputs. A node without inputs has none; inputs that are
	/// present but not an object make the node malformed.
	pub fn inputs(&self) -> Result<Option<&'a Map<String, Value>>, GraphError> {
		match self.inputs {
			None => Ok(None),
			Some(Value::Object(inputs)) => Ok(Some(inputs)),
			Some(_) => Err(GraphError::Inputs(self.id.to_string())),
		}
	}

	/// A non-null input value.
	pub fn input(&self, name: &str) -> Result<Option<&'a Value>, GraphError> {
		Ok(self.inputs()?.and_then(|inputs| inputs.get(name)).filter(|value| !value.is_null()))
	}
}

/// A read-only view over an execution graph snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionGraph<'a> {
	nodes: Vec<Node<'a>>,
}

impl<'a> ExecutionGraph<'a> {
	/// Reads every node, failing on the first malformed one.
	pub fn parse(value: &'a Value) -> Result<Self, GraphError> {
		let map = value.as_object().ok_or(GraphError::NotAnObject)?;
		let nodes = map.iter().map(|(id, node)| Node::parse(id, node)).collect::<Result<_, _>>()?;
		Ok(Self { nodes })
	}

	/// Reads the well-formed nodes and skips the others.
	pub fn parse_lenient(value: &'a Value) -> Self {
		let nodes = value
			.as_object()
			.into_iter()
			.flatten()
			.filter_map(|(id, node)| match Node::parse(id, node) {
				Ok(node) => Some(node),
				Err(e) => {
					tracing::debug!("skipping node: {e}");
					None
				}
			})
			.collect();
		Self { nodes }
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Nodes ordered by [`NodeId`].
	pub fn nodes(&self) -> impl Iterator<Item = &Node<'a>> {
		let mut nodes: Vec<&Node<'a>> = self.nodes.iter().collect();
		nodes.sort_by_key(|node| node.id);
		nodes.into_iter()
	}
}
