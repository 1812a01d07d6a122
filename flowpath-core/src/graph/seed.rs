use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::{ExecutionGraph, GraphError, Node, NodeId};

lazy_static! {
	static ref INTEGER: Regex = Regex::new(r"^[+-]?\d+(?:_\d+)*$").unwrap();
}

/// A seed found in the graph. Values that cannot be read as an integer are
/// carried as they were found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Seed {
	Number(i128),
	Raw(Value),
}

impl Seed {
	/// Numeric coercion: integers as they are, floats truncated, booleans as
	/// 1 or 0, strings holding an integer parsed. `null` is no seed.
	pub fn from_value(value: &Value) -> Option<Self> {
		let number = match value {
			Value::Null => return None,
			Value::Bool(b) => Some(i128::from(*b)),
			Value::Number(n) => n
				.as_i64()
				.map(i128::from)
				.or_else(|| n.as_u64().map(i128::from))
				.or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i128)),
			Value::String(s) => {
				let s = s.trim();
				INTEGER.is_match(s).then(|| s.replace('_', "").parse::<i128>().ok()).flatten()
			}
			_ => None,
		};
		Some(number.map_or_else(|| Seed::Raw(value.clone()), Seed::Number))
	}
}

impl fmt::Display for Seed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Seed::Number(n) => write!(f, "{n}"),
			Seed::Raw(Value::String(s)) => f.write_str(s),
			Seed::Raw(value) => write!(f, "{value}"),
		}
	}
}

/// Node kinds that carry a seed, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
	SeedGenerator,
	NoiseGenerator,
	Sampler,
}

impl Tier {
	pub const ALL: [Tier; 3] = [Tier::SeedGenerator, Tier::NoiseGenerator, Tier::Sampler];

	/// Class type fragments that identify the tier.
	pub fn classes(self) -> &'static [&'static str] {
		match self {
			Tier::SeedGenerator => &["Seed Generator"],
			Tier::NoiseGenerator => &["RandomNoise", "DisableNoise"],
			Tier::Sampler => &["KSampler", "KSamplerAdvanced", "SamplerCustom", "KSampler (Efficient)", "SamplerCustomAdvanced"],
		}
	}

	/// The input holding the seed.
	pub fn field(self) -> &'static str {
		match self {
			Tier::NoiseGenerator => "noise_seed",
			Tier::SeedGenerator | Tier::Sampler => "seed",
		}
	}

	pub fn classify(node: &Node<'_>) -> Option<Self> {
		Self::ALL.into_iter().find(|tier| node.is_any(tier.classes()))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
	pub tier: Tier,
	pub node: NodeId<'a>,
	pub class_type: &'a str,
	pub seed: Option<Seed>,
}

/// Every seed-carrying node of the graph, best first: by tier, then by node id.
pub fn candidates(graph: &Value) -> Result<Vec<Candidate<'_>>, GraphError> {
	let graph = ExecutionGraph::parse(graph)?;
	let mut found = Vec::new();
	for node in graph.nodes() {
		let Some(tier) = Tier::classify(node) else {
			continue;
		};
		let Some(value) = node.input(tier.field())? else {
			continue;
		};
		// linked inputs are encoded as [source, output_index]; only the first element is read
		let value = match value {
			Value::Array(items) => items.first().ok_or_else(|| GraphError::EmptyList {
				id: node.id.to_string(),
				field: tier.field().to_string(),
			})?,
			value => value,
		};
		let seed = Seed::from_value(value);
		tracing::debug!(node = %node.id, class_type = node.class_type, ?tier, ?seed, "found seed candidate");
		found.push(Candidate {
			tier,
			node: node.id,
			class_type: node.class_type,
			seed,
		});
	}
	found.sort_by_key(|candidate| (candidate.tier, candidate.node));
	Ok(found)
}

/// The seed of the best seed-carrying node, if any. Never fails: a malformed
/// graph is logged and treated as having no seed.
#[tracing::instrument(level = "debug", skip(graph), ret)]
pub fn detect(graph: Option<&Value>) -> Option<Seed> {
	let graph = graph?;
	match candidates(graph) {
		Ok(candidates) => candidates.into_iter().next().and_then(|candidate| candidate.seed),
		Err(e) => {
			tracing::warn!("seed detection failed: {e}");
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	#[test]
	fn generator_beats_sampler() {
		let graph = json!({
			"3": { "class_type": "KSampler", "inputs": { "seed": 7 } },
			"5": { "class_type": "Seed Generator", "inputs": { "seed": 42 } }
		});
		assert_eq!(detect(Some(&graph)), Some(Seed::Number(42)));
	}

	#[test]
	fn noise_generator_beats_sampler() {
		let graph = json!({
			"1": { "class_type": "SamplerCustomAdvanced", "inputs": { "noise": ["2", 0] } },
			"2": { "class_type": "RandomNoise", "inputs": { "noise_seed": 99 } },
			"3": { "class_type": "KSampler", "inputs": { "seed": 1 } }
		});
		assert_eq!(detect(Some(&graph)), Some(Seed::Number(99)));
	}

	#[test]
	fn lowest_numeric_id_wins_within_tier() {
		let graph = json!({
			"10": { "class_type": "KSampler", "inputs": { "seed": 10 } },
			"2": { "class_type": "KSamplerAdvanced", "inputs": { "seed": 2 } }
		});
		assert_eq!(detect(Some(&graph)), Some(Seed::Number(2)));
	}

	#[test]
	fn linked_input_reads_first_element() {
		let graph = json!({ "4": { "class_type": "KSampler", "inputs": { "seed": ["17", 0] } } });
		assert_eq!(detect(Some(&graph)), Some(Seed::Number(17)));
	}

	#[test]
	fn string_seeds_are_coerced() {
		let graph = json!({ "4": { "class_type": "KSampler", "inputs": { "seed": " 1_000 " } } });
		assert_eq!(detect(Some(&graph)), Some(Seed::Number(1000)));
	}

	#[test]
	fn non_numeric_seed_is_kept() {
		let graph = json!({ "4": { "class_type": "KSampler", "inputs": { "seed": "random" } } });
		let seed = detect(Some(&graph)).unwrap();
		assert_eq!(seed, Seed::Raw(json!("random")));
		assert_eq!(seed.to_string(), "random");
	}

	#[test]
	fn full_unsigned_range() {
		let graph = json!({ "4": { "class_type": "KSampler", "inputs": { "seed": 18446744073709551615u64 } } });
		assert_eq!(detect(Some(&graph)).unwrap().to_string(), "18446744073709551615");
	}

	#[test]
	fn nodes_without_seed_are_skipped() {
		let graph = json!({
			"1": { "class_type": "Seed Generator", "inputs": {} },
			"2": { "class_type": "KSampler", "inputs": { "seed": 5 } },
			"3": { "class_type": "CheckpointLoaderSimple", "inputs": { "seed": 8 } }
		});
		assert_eq!(detect(Some(&graph)), Some(Seed::Number(5)));
	}

	#[test]
	fn nothing_to_find() {
		assert_eq!(detect(None), None);
		assert_eq!(detect(Some(&json!({}))), None);
		assert_eq!(detect(Some(&json!({ "1": { "class_type": "SaveImage" } }))), None);
	}

	#[test]
	fn malformed_graphs_yield_none() {
		assert_eq!(detect(Some(&json!("graph"))), None);
		assert_eq!(detect(Some(&json!({ "1": [] }))), None);
		assert_eq!(detect(Some(&json!({ "1": { "class_type": "KSampler", "inputs": { "seed": [] } } }))), None);
		assert_eq!(detect(Some(&json!({ "1": { "class_type": "KSampler", "inputs": "x" } }))), None);
	}

	#[test]
	fn candidates_are_ranked() {
		let graph = json!({
			"9": { "class_type": "KSampler", "inputs": { "seed": 1 } },
			"8": { "class_type": "DisableNoise", "inputs": { "noise_seed": 2 } },
			"7": { "class_type": "Seed Generator", "inputs": { "seed": 3 } }
		});
		let ranked: Vec<(Tier, &str)> = candidates(&graph).unwrap().iter().map(|c| (c.tier, c.node.0)).collect();
		assert_eq!(ranked, vec![(Tier::SeedGenerator, "7"), (Tier::NoiseGenerator, "8"), (Tier::Sampler, "9")]);
	}

	#[test]
	fn coercion() {
		assert_eq!(Seed::from_value(&json!(3.9)), Some(Seed::Number(3)));
		assert_eq!(Seed::from_value(&json!(true)), Some(Seed::Number(1)));
		assert_eq!(Seed::from_value(&json!("-12")), Some(Seed::Number(-12)));
		assert_eq!(Seed::from_value(&json!("1.5")), Some(Seed::Raw(json!("1.5"))));
		assert_eq!(Seed::from_value(&json!(null)), None);
	}
}
