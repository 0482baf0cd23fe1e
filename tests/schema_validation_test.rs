//! Integration tests for input document validation
//!
//! Every rejected document must fail with the path of the offending field.

use refiner::schema::{
    validate_str, validate_value, BundleResource, ExtensionValue, FamilyName,
};
use serde_json::{json, Value};
use test_case::test_case;

fn document() -> Value {
    json!({
        "userId": "u1",
        "email": "a@b.com",
        "timestamp": 1_700_000_000,
        "profile": {"name": "Ada", "locale": "en-US"},
        "storage": {"percentUsed": 42.5},
        "metadata": {"source": "x", "collectionDate": "2023-01-01", "dataType": "export"},
        "resourceType": "Bundle",
        "type": "transaction",
        "entry": [
            {
                "fullUrl": "urn:uuid:p1",
                "resource": {"resourceType": "Patient", "id": "p1"},
                "request": {"method": "POST", "url": "Patient"}
            }
        ]
    })
}

#[test_case("userId" ; "user id")]
#[test_case("email" ; "email")]
#[test_case("timestamp" ; "timestamp")]
#[test_case("profile" ; "profile")]
#[test_case("metadata" ; "metadata")]
#[test_case("entry" ; "entry")]
#[test_case("resourceType" ; "resource type")]
#[test_case("type" ; "bundle type")]
fn test_missing_required_field(field: &str) {
    let mut doc = document();
    doc.as_object_mut().unwrap().remove(field);

    let err = validate_value(doc).unwrap_err();
    assert_eq!(err.path, "<root>");
    assert!(err.message.contains(field), "message: {}", err.message);
}

#[test_case("resourceType", json!("Collection") ; "wrong resource type")]
#[test_case("type", json!("batch") ; "wrong bundle type")]
#[test_case("type", json!("Transaction") ; "bundle type is case sensitive")]
#[test_case("timestamp", json!("1700000000") ; "timestamp must be an integer")]
#[test_case("email", json!(null) ; "email must be a string")]
fn test_invalid_envelope_value(field: &str, value: Value) {
    let mut doc = document();
    doc[field] = value;

    let err = validate_value(doc).unwrap_err();
    assert_eq!(err.path, field);
}

#[test]
fn test_storage_is_optional() {
    let mut doc = document();
    doc.as_object_mut().unwrap().remove("storage");

    let bundle = validate_value(doc).unwrap();
    assert!(bundle.storage.is_none());
}

#[test]
fn test_storage_requires_percent_used() {
    let mut doc = document();
    doc["storage"] = json!({});

    let err = validate_value(doc).unwrap_err();
    assert_eq!(err.path, "storage");
    assert!(err.message.contains("percentUsed"));
}

#[test]
fn test_empty_entry_list_is_valid() {
    let mut doc = document();
    doc["entry"] = json!([]);

    let bundle = validate_value(doc).unwrap();
    assert!(bundle.entry.is_empty());
}

#[test]
fn test_entry_without_resource() {
    let mut doc = document();
    doc["entry"] = json!([{"fullUrl": "urn:uuid:x"}]);

    let err = validate_value(doc).unwrap_err();
    assert_eq!(err.path, "entry[0]");
    assert!(err.message.contains("resource"));
}

#[test]
fn test_entry_metadata_is_kept() {
    let bundle = validate_value(document()).unwrap();
    let entry = &bundle.entry[0];

    assert_eq!(entry.full_url.as_deref(), Some("urn:uuid:p1"));
    assert_eq!(entry.request.as_ref().unwrap().method, "POST");
}

#[test]
fn test_non_patient_resources_pass_through() {
    let mut doc = document();
    doc["entry"] = json!([
        {"resource": {
            "resourceType": "Encounter",
            "id": "e1",
            "status": "finished",
            "subject": {"reference": "Patient/p1"},
            "class": {"code": "AMB"}
        }},
        {"resource": {"resourceType": "Observation"}}
    ]);

    let bundle = validate_value(doc).unwrap();

    let encounter = &bundle.entry[0].resource;
    assert_eq!(encounter.resource_type(), "Encounter");
    assert_eq!(encounter.id(), Some("e1"));
    match encounter {
        BundleResource::Generic(generic) => {
            assert_eq!(generic.field("status"), Some(&json!("finished")));
            assert!(generic.other.contains_key("class"));
        }
        other => panic!("expected generic resource, got {other:?}"),
    }

    assert_eq!(bundle.entry[1].resource.id(), None);
    assert_eq!(bundle.patients().count(), 0);
}

#[test_case(json!({"resourceType": "Account", "subject": [{"reference": "Patient/p1"}]}), "subject" ; "subject as reference list")]
#[test_case(json!({"resourceType": "Encounter", "subject": {"reference": "Patient/p1"}}), "subject" ; "subject as reference")]
#[test_case(json!({"resourceType": "Questionnaire", "code": [{"code": "q"}]}), "code" ; "code as coding list")]
#[test_case(json!({"resourceType": "SearchParameter", "code": "name"}), "code" ; "code as string")]
#[test_case(json!({"resourceType": "Observation", "code": {"text": "hr"}}), "code" ; "code as concept")]
#[test_case(json!({"resourceType": "Task", "status": {"text": "odd"}}), "status" ; "status as object")]
#[test_case(json!({"resourceType": "Composition", "encounter": [{"reference": "Encounter/e1"}]}), "encounter" ; "encounter as list")]
#[test_case(json!({"resourceType": "QuestionnaireResponse", "identifier": {"value": "x"}}), "identifier" ; "identifier as single object")]
fn test_generic_resource_accepts_any_field_shape(resource: Value, field: &str) {
    let expected = resource[field].clone();
    let mut doc = document();
    doc["entry"] = json!([{"resource": resource}]);

    let bundle = validate_value(doc).unwrap();

    match &bundle.entry[0].resource {
        BundleResource::Generic(generic) => assert_eq!(generic.field(field), Some(&expected)),
        other => panic!("expected generic resource, got {other:?}"),
    }
}

#[test]
fn test_resource_without_type_is_rejected() {
    let mut doc = document();
    doc["entry"] = json!([{"resource": {"id": "x"}}]);

    let err = validate_value(doc).unwrap_err();
    assert!(err.path.starts_with("entry[0].resource"), "path: {}", err.path);
    assert!(err.message.contains("resourceType"));
}

#[test_case(json!({"birthDate": "10/12/1815"}), "entry[0].resource.birthDate" ; "bad birth date")]
#[test_case(json!({"deceasedDateTime": "soon"}), "entry[0].resource.deceasedDateTime" ; "bad deceased date")]
#[test_case(json!({"gender": 1}), "entry[0].resource.gender" ; "gender must be a string")]
#[test_case(json!({"name": [{"given": "Ada"}]}), "entry[0].resource.name[0].given" ; "given must be a list")]
#[test_case(json!({"multipleBirthBoolean": "no"}), "entry[0].resource.multipleBirthBoolean" ; "multiple birth must be a bool")]
fn test_invalid_patient_field(patch: Value, path: &str) {
    let mut doc = document();
    let resource = doc["entry"][0]["resource"].as_object_mut().unwrap();
    for (key, value) in patch.as_object().unwrap() {
        resource.insert(key.clone(), value.clone());
    }

    let err = validate_value(doc).unwrap_err();
    assert_eq!(err.path, path);
}

#[test]
fn test_family_accepts_string_or_list() {
    let mut doc = document();
    doc["entry"] = json!([
        {"resource": {"resourceType": "Patient", "id": "p1", "name": [{"family": "Lovelace"}]}},
        {"resource": {"resourceType": "Patient", "id": "p2", "name": [{"family": ["Byron", "King"]}]}}
    ]);

    let bundle = validate_value(doc).unwrap();
    let families: Vec<Option<&str>> = bundle
        .patients()
        .map(|p| {
            p.name.as_ref().unwrap()[0]
                .family
                .as_ref()
                .and_then(FamilyName::representative)
        })
        .collect();
    assert_eq!(families, [Some("Lovelace"), Some("Byron")]);
}

#[test]
fn test_nested_extensions() {
    let mut doc = document();
    doc["entry"][0]["resource"]["extension"] = json!([
        {
            "url": "http://hl7.org/fhir/us/core/StructureDefinition/us-core-race",
            "extension": [
                {"url": "ombCategory", "valueString": "2106-3"},
                {"url": "text", "valueString": "White"}
            ]
        },
        {"url": "http://example.org/daly", "valueDecimal": 0.25}
    ]);

    let bundle = validate_value(doc).unwrap();
    let patient = bundle.patients().next().unwrap();
    let extensions = patient.extension.as_ref().unwrap();

    assert!(extensions[0].value.is_none());
    assert_eq!(extensions[0].extension.len(), 2);
    assert_eq!(
        extensions[0].child("text").and_then(|e| e.value.as_ref()),
        Some(&ExtensionValue::String("White".to_string()))
    );
    assert_eq!(extensions[1].value, Some(ExtensionValue::Decimal(0.25)));
}

#[test]
fn test_extension_with_two_values_is_rejected() {
    let mut doc = document();
    doc["entry"][0]["resource"]["extension"] = json!([
        {"url": "http://example.org/x", "valueString": "a", "valueCode": "b"}
    ]);

    let err = validate_value(doc).unwrap_err();
    assert!(
        err.path.starts_with("entry[0].resource.extension"),
        "path: {}",
        err.path
    );
}

#[test]
fn test_malformed_json_text() {
    let err = validate_str("{\"userId\": ").unwrap_err();
    assert_eq!(err.path, "<root>");
}
