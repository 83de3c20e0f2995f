use super::*;

#[test]
fn test_dataset_metadata_wire_parse() {
    let raw = r#"{
        "datasetReference": {"projectId": "p1", "datasetId": "raw_events"},
        "friendlyName": "Raw events",
        "location": "EU",
        "creationTime": "1700000000000",
        "lastModifiedTime": "1700000100000"
    }"#;
    let meta: DatasetMetadata = serde_json::from_str(raw).unwrap();
    let info = meta.into_info();

    assert_eq!(info.id, "raw_events");
    assert_eq!(info.friendly_name.as_deref(), Some("Raw events"));
    assert_eq!(info.location.as_deref(), Some("EU"));
    assert_eq!(info.creation_time.unwrap().timestamp_millis(), 1700000000000);
}

#[test]
fn test_dataset_metadata_minimal() {
    let raw = r#"{"datasetReference": {"projectId": "p1", "datasetId": "d"}}"#;
    let meta: DatasetMetadata = serde_json::from_str(raw).unwrap();
    let info = meta.into_info();
    assert_eq!(info.id, "d");
    assert!(info.friendly_name.is_none());
    assert!(info.creation_time.is_none());
}

#[test]
fn test_unparseable_timestamp_degrades_to_none() {
    let raw = r#"{
        "datasetReference": {"projectId": "p1", "datasetId": "d"},
        "creationTime": "not-a-number"
    }"#;
    let meta: DatasetMetadata = serde_json::from_str(raw).unwrap();
    assert!(meta.into_info().creation_time.is_none());
}

#[test]
fn test_field_nullability_from_mode() {
    let field = |mode: Option<&str>| TableFieldSchema {
        name: "c".to_string(),
        field_type: "STRING".to_string(),
        mode: mode.map(String::from),
    };
    assert!(field(None).is_nullable());
    assert!(field(Some("NULLABLE")).is_nullable());
    assert!(field(Some("REPEATED")).is_nullable());
    assert!(!field(Some("REQUIRED")).is_nullable());
}

#[test]
fn test_table_metadata_wire_parse() {
    let raw = r#"{
        "tableReference": {"projectId": "p1", "datasetId": "d", "tableId": "orders"},
        "schema": {"fields": [
            {"name": "id", "type": "INT64", "mode": "REQUIRED"},
            {"name": "note", "type": "STRING"}
        ]},
        "tableConstraints": {"primaryKey": {"columns": ["id"]}}
    }"#;
    let meta: TableMetadata = serde_json::from_str(raw).unwrap();
    let schema = meta.schema.unwrap();
    assert_eq!(schema.fields.len(), 2);
    assert_eq!(
        meta.table_constraints.unwrap().primary_key.unwrap().columns,
        vec!["id".to_string()]
    );
}

#[test]
fn test_table_list_entry_type_field() {
    let raw = r#"{
        "tableReference": {"projectId": "p1", "datasetId": "d", "tableId": "v"},
        "type": "VIEW"
    }"#;
    let entry: TableListEntry = serde_json::from_str(raw).unwrap();
    assert_eq!(entry.table_type.as_deref(), Some("VIEW"));
}
