use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// How several detected LoRAs are folded into the `lora_name` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum LoraMode {
	/// Only the first LoRA.
	#[default]
	Primary,
	/// The first LoRA plus how many others were found.
	PrimaryCount,
	/// Every LoRA, comma separated, as one folder.
	All,
	/// One folder per LoRA.
	Separate,
}

impl LoraMode {
	pub fn format<S: AsRef<str>>(self, loras: &[S]) -> Value {
		let Some(first) = loras.first().map(AsRef::as_ref) else {
			return Value::from("");
		};
		match self {
			LoraMode::Primary => first.into(),
			LoraMode::PrimaryCount if loras.len() == 1 => first.into(),
			LoraMode::PrimaryCount => format!("{first}_+{}more", loras.len() - 1).into(),
			LoraMode::All => loras.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",").into(),
			LoraMode::Separate => loras.iter().map(|lora| Value::from(lora.as_ref())).collect(),
		}
	}
}
