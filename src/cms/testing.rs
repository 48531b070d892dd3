//! In-memory [`ContentApi`] that records every call, for loader tests.

use super::predicate::Operator;
use super::{CmsError, ContentApi, Document, Predicate};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

/// One backend call as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Query(Vec<Predicate>),
    GetByUid { kind: String, uid: String },
}

/// Evaluates predicates against a fixed document set.
#[derive(Debug, Default)]
pub struct RecordingApi {
    documents: Vec<Document>,
    calls: Mutex<Vec<Call>>,
    fail_with_status: Option<u16>,
}

impl RecordingApi {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    /// Every call answers with this HTTP status error.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn check_failure(&self) -> Result<(), CmsError> {
        match self.fail_with_status {
            Some(status) => Err(CmsError::Status {
                url: "fake://cms".into(),
                status,
            }),
            None => Ok(()),
        }
    }

    fn matches(document: &Document, predicate: &Predicate) -> bool {
        let field = match predicate.path.as_str() {
            "document.type" => return document.kind == predicate.value,
            "document.id" => return document.id == predicate.value,
            path => match path.strip_prefix("my.").and_then(|p| p.split_once('.')) {
                Some((kind, field)) if kind == document.kind => field,
                _ => return false,
            },
        };
        if field == "uid" {
            return document.uid.as_deref() == Some(predicate.value.as_str());
        }

        let value = &document.data[field];
        match predicate.op {
            Operator::At => match value {
                Value::String(s) => *s == predicate.value,
                Value::Object(link) => link.get("id") == Some(&json!(predicate.value)),
                other => other.to_string() == predicate.value,
            },
            Operator::Fulltext => {
                let text = match serde_json::from_value::<super::RichText>(value.clone()) {
                    Ok(rich) => rich.as_text(" "),
                    Err(_) => value.as_str().unwrap_or_default().to_string(),
                };
                text.to_lowercase().contains(&predicate.value.to_lowercase())
            }
        }
    }
}

#[async_trait]
impl ContentApi for RecordingApi {
    async fn query(&self, predicates: &[Predicate]) -> Result<Vec<Document>, CmsError> {
        self.calls.lock().push(Call::Query(predicates.to_vec()));
        self.check_failure()?;
        Ok(self
            .documents
            .iter()
            .filter(|doc| predicates.iter().all(|p| Self::matches(doc, p)))
            .cloned()
            .collect())
    }

    async fn get_by_uid(&self, kind: &str, uid: &str) -> Result<Document, CmsError> {
        self.calls.lock().push(Call::GetByUid {
            kind: kind.into(),
            uid: uid.into(),
        });
        self.check_failure()?;
        self.documents
            .iter()
            .find(|doc| doc.kind == kind && doc.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| CmsError::NotFound {
                kind: kind.into(),
                uid: uid.into(),
            })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn title(text: &str) -> Value {
    json!([{ "type": "heading1", "text": text, "spans": [] }])
}

pub fn category(id: &str, uid: &str, name: &str) -> Document {
    serde_json::from_value(json!({
        "id": id,
        "uid": uid,
        "type": "category",
        "data": { "title": title(name) }
    }))
    .expect("valid category fixture")
}

pub fn product(id: &str, uid: &str, name: &str, category_id: &str) -> Document {
    serde_json::from_value(json!({
        "id": id,
        "uid": uid,
        "type": "product",
        "last_publication_date": "2021-02-01T08:30:00+0000",
        "data": {
            "title": title(name),
            "description": [{ "type": "paragraph", "text": format!("About {name}"),
                              "spans": [{ "start": 0, "end": 5, "type": "strong" }] }],
            "thumbnail": { "url": format!("https://images.example.com/{uid}.png"), "alt": null },
            "price": 99.9,
            "category": { "id": category_id, "type": "category", "link_type": "Document" }
        }
    }))
    .expect("valid product fixture")
}

/// A product saved with its price and thumbnail left empty.
pub fn unpriced_product(id: &str, uid: &str, name: &str, category_id: &str) -> Document {
    serde_json::from_value(json!({
        "id": id,
        "uid": uid,
        "type": "product",
        "data": {
            "title": title(name),
            "description": [],
            "thumbnail": {},
            "price": null,
            "category": { "id": category_id, "type": "category", "link_type": "Document" }
        }
    }))
    .expect("valid product fixture")
}

/// Two categories, three products.
pub fn catalog() -> Vec<Document> {
    vec![
        category("CAT-MOUSE", "mouses", "Mouses"),
        category("CAT-KEYB", "keyboards", "Keyboards"),
        product("P1", "wireless-mouse", "Wireless Mouse", "CAT-MOUSE"),
        product("P2", "gaming-mouse", "Gaming Mouse", "CAT-MOUSE"),
        product("P3", "mechanical-keyboard", "Mechanical Keyboard", "CAT-KEYB"),
    ]
}
