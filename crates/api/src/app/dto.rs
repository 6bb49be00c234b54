use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterItemRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_unit")]
    pub unit_of_measure: String,
}

fn default_unit() -> String {
    "unit".to_string()
}

/// Body of both entry and exit requests.
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub quantity: f64,
    pub reason: Option<String>,
    pub actor: Option<String>,
}
