//! Best-effort discovery of generation metadata in an execution graph, used to
//! prefill empty configuration fields.

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::{
	seed::{self, Seed},
	ExecutionGraph, Node,
};
use crate::config::{lora::LoraMode, Config, ConfigKey};

pub const CHECKPOINT_LOADERS: [&str; 5] = [
	"CheckpointLoaderSimple",
	"CheckpointLoader",
	"UNETLoader",
	"CheckpointLoaderNF4",
	"Checkpoint Loader with Name (Image Saver)",
];
const CHECKPOINT_INPUTS: [&str; 3] = ["ckpt_name", "unet_name", "model_name"];

pub const LORA_LOADERS: [&str; 4] = ["LoraLoader", "LoraLoaderModelOnly", "LoRA Stacker", "Power Lora Loader (rgthree)"];
const TEXT_NODES: [&str; 4] = ["String Literal", "Text Multiline", "ShowText", "Lora Loader (LoraManager)"];
const TEXT_NODE_FRAGMENTS: [&str; 2] = ["TextEncode", "Wildcard"];

pub const LATENT_NODES: [&str; 3] = ["EmptyLatentImage", "LatentUpscale", "LatentUpscaleBy"];

lazy_static! {
	static ref MODEL_EXTENSION: Regex = Regex::new(r"(?i)\.(safetensors|ckpt|pt|bin)$").unwrap();
	static ref LORA_TAG: Regex = Regex::new(r"<lora:([^:>]+):([-\d.]+)(?::([-\d.]+))?>").unwrap();
}

/// Strips folders and the weight-file extension from a model file name.
pub fn clean_model_name(name: &str) -> String {
	let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
	MODEL_EXTENSION.replace(file, "").into_owned()
}

fn text_input<'a>(node: &Node<'a>, name: &str) -> Option<&'a str> {
	node.input(name).ok().flatten().and_then(Value::as_str)
}

fn dimension(node: &Node<'_>, name: &str) -> Option<String> {
	match node.input(name).ok().flatten()? {
		Value::Number(n) => Some(n.to_string()),
		Value::String(s) if s.trim().parse::<f64>().is_ok() => Some(s.trim().to_string()),
		_ => None,
	}
}

/// Checkpoint names in node order.
pub fn detect_models(graph: &Value) -> Vec<String> {
	let graph = ExecutionGraph::parse_lenient(graph);
	graph
		.nodes()
		.filter(|node| node.is_one_of(&CHECKPOINT_LOADERS))
		.filter_map(|node| CHECKPOINT_INPUTS.iter().find_map(|input| text_input(node, input)))
		.filter(|name| !name.is_empty())
		.map(clean_model_name)
		.collect()
}

/// LoRA names from loader nodes and from `<lora:name:weight>` tags in text
/// nodes, without duplicates, in the order they are first seen.
pub fn detect_loras(graph: &Value) -> Vec<String> {
	let graph = ExecutionGraph::parse_lenient(graph);
	let mut found = Vec::new();
	for node in graph.nodes() {
		let Ok(Some(inputs)) = node.inputs() else {
			continue;
		};
		if node.is_any(&LORA_LOADERS) {
			for (key, value) in inputs.iter().filter(|(key, _)| key.to_lowercase().contains("lora")) {
				let name = match value {
					Value::String(name) => Some(name.as_str()),
					// rgthree stacks store each slot as { "on": bool, "lora": name, ... }
					Value::Object(slot) if slot.get("on").and_then(Value::as_bool) != Some(false) => {
						slot.get("lora").and_then(Value::as_str)
					}
					_ => None,
				};
				match name {
					Some(name) if !name.is_empty() && name != "None" => found.push(clean_model_name(name)),
					_ => tracing::trace!(node = %node.id, key = key.as_str(), "no lora name in input"),
				}
			}
		}
		if node.is_one_of(&TEXT_NODES) || node.is_any(&TEXT_NODE_FRAGMENTS) {
			for text in inputs.values().filter_map(Value::as_str) {
				found.extend(LORA_TAG.captures_iter(text).map(|caps| caps[1].to_string()));
			}
		}
	}
	found.into_iter().filter(|name| !name.is_empty()).unique().collect()
}

/// `WIDTHxHEIGHT` of every latent node that declares both.
pub fn detect_resolutions(graph: &Value) -> Vec<String> {
	let graph = ExecutionGraph::parse_lenient(graph);
	graph
		.nodes()
		.filter(|node| node.is_one_of(&LATENT_NODES))
		.filter_map(|node| Some(format!("{}x{}", dimension(node, "width")?, dimension(node, "height")?)))
		.collect()
}

/// Everything that could be read from one graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Detected {
	pub seed: Option<Seed>,
	pub models: Vec<String>,
	pub loras: Vec<String>,
	pub resolutions: Vec<String>,
}

impl Detected {
	pub fn from_graph(graph: Option<&Value>) -> Self {
		let Some(graph) = graph else {
			return Self::default();
		};
		Self {
			seed: seed::detect(Some(graph)),
			models: detect_models(graph),
			loras: detect_loras(graph),
			resolutions: detect_resolutions(graph),
		}
	}

	pub fn model(&self) -> Option<&str> {
		self.models.first().map(String::as_str)
	}

	pub fn resolution(&self) -> Option<&str> {
		self.resolutions.first().map(String::as_str)
	}
}

/// Copies detected metadata into configuration fields that are still blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Autofill {
	pub lora_mode: LoraMode,
}

impl Autofill {
	pub fn new(lora_mode: LoraMode) -> Self {
		Self { lora_mode }
	}

	/// Returns the keys that were filled.
	pub fn apply(&self, detected: &Detected, config: &mut Config) -> Vec<ConfigKey> {
		let mut filled = Vec::new();
		if let Some(model) = detected.model() {
			if config.is_blank(ConfigKey::ModelName) {
				config.set(ConfigKey::ModelName, model);
				filled.push(ConfigKey::ModelName);
			}
		}
		if !detected.loras.is_empty() && config.loras().is_empty() {
			config.set(ConfigKey::LoraName, self.lora_mode.format(&detected.loras));
			filled.push(ConfigKey::LoraName);
		}
		if let Some(resolution) = detected.resolution() {
			if config.is_blank(ConfigKey::Resolution) {
				config.set(ConfigKey::Resolution, resolution);
				filled.push(ConfigKey::Resolution);
			}
		}
		tracing::debug!(?filled, "autofilled configuration");
		filled
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn workflow() -> Value {
		json!({
			"4": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sdxl/juggernautXL_v9.safetensors" } },
			"5": { "class_type": "EmptyLatentImage", "inputs": { "width": 832, "height": 1216, "batch_size": 1 } },
			"6": { "class_type": "CLIPTextEncode", "inputs": { "text": "a castle <lora:detail:0.8> <lora:light:1:0.5>", "clip": ["10", 1] } },
			"10": { "class_type": "LoraLoader", "inputs": { "lora_name": "styles\\watercolor.safetensors", "strength_model": 1.0 } },
			"11": { "class_type": "LoraLoaderModelOnly", "inputs": { "lora_name": "None" } },
			"12": { "class_type": "Power Lora Loader (rgthree)", "inputs": {
				"lora_1": { "on": true, "lora": "detail.safetensors", "strength": 1 },
				"lora_2": { "on": false, "lora": "off.safetensors", "strength": 1 }
			} },
			"3": { "class_type": "KSampler", "inputs": { "seed": 1234 } }
		})
	}

	#[test]
	fn cleans_model_names() {
		assert_eq!(clean_model_name("sdxl/juggernautXL_v9.safetensors"), "juggernautXL_v9");
		assert_eq!(clean_model_name("C:\\models\\flux.CKPT"), "flux");
		assert_eq!(clean_model_name("plain"), "plain");
	}

	#[test]
	fn models() {
		assert_eq!(detect_models(&workflow()), vec!["juggernautXL_v9"]);
	}

	#[test]
	fn loras_in_node_order_without_duplicates() {
		assert_eq!(detect_loras(&workflow()), vec!["detail", "light", "watercolor"]);
	}

	#[test]
	fn resolutions() {
		assert_eq!(detect_resolutions(&workflow()), vec!["832x1216"]);
		assert!(detect_resolutions(&json!({ "1": { "class_type": "LatentUpscaleBy", "inputs": { "scale_by": 1.5 } } })).is_empty());
	}

	#[test]
	fn detected_bundle() {
		let detected = Detected::from_graph(Some(&workflow()));
		assert_eq!(detected.seed, Some(Seed::Number(1234)));
		assert_eq!(detected.model(), Some("juggernautXL_v9"));
		assert_eq!(detected.resolution(), Some("832x1216"));
		assert_eq!(Detected::from_graph(None), Detected::default());
	}

	#[test]
	fn malformed_graph_detects_nothing() {
		let detected = Detected::from_graph(Some(&json!(["not", "a", "graph"])));
		assert_eq!(detected, Detected::default());
	}

	#[test]
	fn autofill_only_blank_fields() {
		let detected = Detected::from_graph(Some(&workflow()));
		let mut config: Config = [(ConfigKey::ModelName, "mine")].into_iter().collect();
		let filled = Autofill::new(LoraMode::PrimaryCount).apply(&detected, &mut config);
		assert_eq!(filled, vec![ConfigKey::LoraName, ConfigKey::Resolution]);
		assert_eq!(config.get(ConfigKey::ModelName), "mine");
		assert_eq!(config.get(ConfigKey::LoraName), "detail_+2more");
		assert_eq!(config.get(ConfigKey::Resolution), "832x1216");
	}
}
