//! Builds JSON-LD documents from caller fields or a parsed page

use crate::document::ParsedDocument;
use crate::schema::catalog::lookup;
use crate::schema::{is_blank, SchemaDocument, SchemaError};
use serde_json::{json, Value};
use url::Url;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Creates a document of `schema_type` from `fields`
///
/// Every required field must be present and non-blank. Supplied fields are
/// copied verbatim after `@context` and `@type`, in their original order.
///
/// # Example
///
/// ```
/// use seo_audit::schema::{generate, SchemaDocument};
/// use serde_json::json;
///
/// let mut fields = SchemaDocument::new();
/// fields.insert("name".into(), json!("Acme"));
/// fields.insert("url".into(), json!("https://acme.example"));
///
/// let doc = generate("Organization", &fields).unwrap();
/// assert_eq!(doc["@type"], "Organization");
/// ```
pub fn generate(schema_type: &str, fields: &SchemaDocument) -> Result<SchemaDocument, SchemaError> {
    let contract =
        lookup(schema_type).ok_or_else(|| SchemaError::UnknownType(schema_type.to_string()))?;

    let missing: Vec<String> = contract
        .required
        .iter()
        .filter(|field| fields.get(**field).map_or(true, is_blank))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingRequired {
            schema_type: contract.name.to_string(),
            fields: missing,
        });
    }

    let mut document = SchemaDocument::new();
    document.insert("@context".to_string(), Value::from(SCHEMA_CONTEXT));
    document.insert("@type".to_string(), Value::from(contract.name));
    for (key, value) in fields {
        if key == "@context" || key == "@type" {
            continue;
        }
        document.insert(key.clone(), value.clone());
    }

    Ok(document)
}

/// Derives generator fields for `schema_type` from a parsed page
///
/// Only properties the type declares are filled: `name`/`headline` from the
/// title (or first H1), `description` from the meta description, `url`,
/// `image` from the first image, and breadcrumb items from the URL path.
pub fn fields_from_document(
    schema_type: &str,
    doc: &ParsedDocument,
) -> Result<SchemaDocument, SchemaError> {
    let contract =
        lookup(schema_type).ok_or_else(|| SchemaError::UnknownType(schema_type.to_string()))?;

    let name = Some(doc.title.trim())
        .filter(|title| !title.is_empty())
        .or_else(|| {
            doc.headings
                .iter()
                .find(|heading| heading.level == 1 && !heading.text.is_empty())
                .map(|heading| heading.text.as_str())
        });

    let mut candidates: Vec<(&str, Value)> = Vec::new();
    if let Some(name) = name {
        candidates.push(("name", Value::from(name)));
        candidates.push(("headline", Value::from(name)));
    }
    if !doc.meta_description.is_empty() {
        candidates.push(("description", Value::from(doc.meta_description.as_str())));
    }
    candidates.push(("url", Value::from(doc.url.as_str())));
    if let Some(image) = doc.images.iter().find(|image| !image.src.is_empty()) {
        candidates.push(("image", Value::from(image.src.as_str())));
    }
    candidates.push(("itemListElement", breadcrumb_items(&doc.url)));

    Ok(candidates
        .into_iter()
        .filter(|(field, _)| contract.declares(field))
        .map(|(field, value)| (field.to_string(), value))
        .collect())
}

/// One `ListItem` for the site root and one per path segment
fn breadcrumb_items(page_url: &str) -> Value {
    let Ok(url) = Url::parse(page_url) else {
        return Value::Array(Vec::new());
    };

    let mut crumb = url.clone();
    crumb.set_query(None);
    crumb.set_fragment(None);
    crumb.set_path("/");

    let mut items = vec![json!({
        "@type": "ListItem",
        "position": 1,
        "name": "Home",
        "item": crumb.as_str(),
    })];

    let mut path = String::new();
    let segments = url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty());
    for (index, segment) in segments.enumerate() {
        path.push('/');
        path.push_str(segment);
        crumb.set_path(&path);
        items.push(json!({
            "@type": "ListItem",
            "position": index + 2,
            "name": segment.replace(|c: char| c == '-' || c == '_', " "),
            "item": crumb.as_str(),
        }));
    }

    Value::Array(items)
}

/// Renders `document` as an embeddable `<script>` element
pub fn to_script_tag(document: &SchemaDocument) -> String {
    let json = format!("{:#}", Value::Object(document.clone()));
    format!(
        "<script type=\"application/ld+json\">\n{}\n</script>",
        json.replace("</", "<\\/")
    )
}
