use serde::{Deserialize, Deserializer};

/// One entry of a `<select>` list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    pub disabled: bool,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), disabled: false }
    }

    pub fn disabled(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into(), disabled: true }
    }
}

/// Ids arrive as JSON numbers from the lookup endpoints but are only ever
/// used as `<option value>` strings, so accept both.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Str(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

/// `{id, name}` row returned by lookup and quick-create endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NamedEntity {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
}

impl From<NamedEntity> for ChoiceOption {
    fn from(row: NamedEntity) -> Self {
        ChoiceOption::new(row.id, row.name)
    }
}

/// `GET /api/sections/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct SectionsResponse {
    #[serde(default)]
    pub sections: Option<Vec<NamedEntity>>,
}

/// `GET /api/subcategories/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct SubcategoriesResponse {
    #[serde(default)]
    pub subcategories: Option<Vec<NamedEntity>>,
}

/// Entry of the flat `GET /api/beneficiaries/search` array.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BeneficiaryMatch {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub label: String,
    /// Bare name without the phone suffix; older servers omit it.
    #[serde(default)]
    pub value: Option<String>,
}

impl BeneficiaryMatch {
    pub fn display_name(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

/// Envelope shared by every mutating endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Everything else (`department`, `section`, ...), looked up by key.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl StatusEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Outcome of `POST /setup_api`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupOutcome {
    Completed,
    AlreadyDone(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn numeric_and_string_ids_both_parse() {
        let rows: Vec<NamedEntity> =
            serde_json::from_str(r#"[{"id": 7, "name": "الصيانة"}, {"id": "8", "name": "IT"}]"#).unwrap();
        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[1].id, "8");
    }

    #[wasm_bindgen_test]
    fn absent_sections_key_is_none() {
        let resp: SectionsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.sections.is_none());
    }

    #[wasm_bindgen_test]
    fn envelope_keeps_entity_payload() {
        let env: StatusEnvelope = serde_json::from_str(
            r#"{"status":"success","message":"ok","department":{"id":3,"name":"HR"}}"#,
        )
        .unwrap();
        assert!(env.is_success());
        let dept: NamedEntity = serde_json::from_value(env.payload["department"].clone()).unwrap();
        assert_eq!(dept, NamedEntity { id: "3".into(), name: "HR".into() });
    }

    #[wasm_bindgen_test]
    fn beneficiary_display_name_prefers_value() {
        let m: BeneficiaryMatch =
            serde_json::from_str(r#"{"id":1,"value":"Ali","label":"Ali - 0501234567"}"#).unwrap();
        assert_eq!(m.display_name(), "Ali");
    }
}
