//! Input records for the entity graph component.
//!
//! These mirror the JSON shapes served by the archive backend. The component
//! receives already-filtered arrays; it never fetches anything itself.

use serde::Deserialize;

fn default_mentions() -> u32 {
	1
}

/// A named concept extracted from research runs.
#[derive(Clone, Debug, Deserialize)]
pub struct Entity {
	/// Unique identifier. Relationships reference entities by name,
	/// case-sensitively.
	pub name: String,
	/// Category (e.g., "company", "person", "concept"). Open-ended
	/// vocabulary; missing in older payloads, so defaults to empty.
	#[serde(rename = "type", default)]
	pub kind: String,
	/// How many research runs mentioned this entity. Drives node size
	/// and labeling. Defaults to 1 when absent.
	#[serde(default = "default_mentions")]
	pub mentions: u32,
}

/// A directed, typed edge between two entities.
#[derive(Clone, Debug, Deserialize)]
pub struct Relationship {
	/// Source entity name.
	pub from: String,
	/// Target entity name.
	pub to: String,
	/// Relationship category (e.g., "competes_with", "produces").
	#[serde(rename = "type", default)]
	pub kind: String,
	/// How many research runs mentioned this relationship.
	#[serde(default = "default_mentions")]
	pub mentions: u32,
}

/// Complete graph payload: entities and relationships.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub entities: Vec<Entity>,
	pub relationships: Vec<Relationship>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_optional_fields_default() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"entities": [{"name": "Acme"}],
				"relationships": [{"from": "Acme", "to": "Acme"}]
			}"#,
		)
		.unwrap();

		assert_eq!(data.entities[0].mentions, 1);
		assert_eq!(data.entities[0].kind, "");
		assert_eq!(data.relationships[0].mentions, 1);
		assert_eq!(data.relationships[0].kind, "");
	}

	#[test]
	fn type_field_maps_to_kind() {
		let entity: Entity =
			serde_json::from_str(r#"{"name": "Acme", "type": "company", "mentions": 3}"#).unwrap();
		assert_eq!(entity.kind, "company");
		assert_eq!(entity.mentions, 3);
	}
}
