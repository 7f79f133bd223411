use types::*;

fn orders_v3() -> SchemaResponse {
    SchemaResponse {
        id: 42,
        subject: "orders".to_string(),
        version: 3,
        schema_type: Some(SchemaType::Avro),
        schema: r#"{"type":"record","name":"Order","fields":[]}"#.to_string(),
        references: vec![SchemaReference {
            name: "Customer".to_string(),
            subject: "customers".to_string(),
            version: 2,
        }],
    }
}

#[test]
fn test_schema_from_response_keeps_every_field() {
    let schema = Schema::try_from(orders_v3()).expect("valid response");

    assert_eq!(schema.id, 42);
    assert_eq!(schema.subject, "orders");
    assert_eq!(schema.version, 3);
    assert_eq!(schema.schema_type, Some(SchemaType::Avro));
    assert!(schema.schema.contains("Order"));
    assert_eq!(schema.references[0].name, "Customer");
    assert_eq!(schema.references[0].version, 2);
}

#[test]
fn test_schema_serializes_with_registry_field_names() {
    let schema = Schema::try_from(orders_v3()).expect("valid response");
    let json = serde_json::to_value(&schema).expect("encode");

    assert_eq!(json["schemaType"], "AVRO");
    assert_eq!(json["id"], 42);
    assert_eq!(json["references"][0]["subject"], "customers");
}

#[test]
fn test_subject_version_list_decodes_in_order() {
    let body = r#"[{"subject":"orders","version":3},{"subject":"orders-copy","version":1}]"#;
    let locations: Vec<SubjectVersion> = serde_json::from_str(body).expect("valid list");

    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0], SubjectVersion { subject: "orders".to_string(), version: 3 });
}

#[test]
fn test_content_type() {
    assert_eq!(CONTENT_TYPE, "application/vnd.schemaregistry.v1+json");
}
