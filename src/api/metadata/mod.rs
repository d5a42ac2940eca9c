//! EDMX metadata parsing
//!
//! Flattens `Edmx/DataServices/Schema` into entity types keyed by
//! `<namespace>.<name>` and entity sets keyed by set name. Keys and
//! nullability are not surfaced. Later duplicates overwrite earlier ones.

pub mod models;

pub use models::{EdmSchema, EntitySetDescriptor, EntityTypeDescriptor};

use log::{debug, error};
use roxmltree::{Document, Node};

use crate::api::models::Property;
use crate::error::{ODataError, Result};

/// Parse an EDMX document into an [`EdmSchema`]
pub fn decode_edmx(xml: &[u8]) -> Result<EdmSchema> {
    let text = std::str::from_utf8(xml).map_err(|e| {
        error!("Metadata document is not valid UTF-8");
        ODataError::MetadataParse(e.to_string())
    })?;
    parse_edmx(text)
}

pub fn parse_edmx(metadata_xml: &str) -> Result<EdmSchema> {
    debug!("Parsing metadata XML, {} bytes", metadata_xml.len());

    let doc = Document::parse(metadata_xml).map_err(|e| {
        error!("Failed to parse metadata XML: {}", e);
        ODataError::MetadataParse(e.to_string())
    })?;

    let root = doc.root_element();
    if !root.has_tag_name("Edmx") {
        return Err(ODataError::MetadataParse(format!(
            "expected element <Edmx> but found <{}>",
            root.tag_name().name()
        )));
    }

    let mut schema = EdmSchema::default();

    for s in children(root, "DataServices").flat_map(|ds| children(ds, "Schema")) {
        let namespace = s.attribute("Namespace").unwrap_or_default();

        for entity_type in children(s, "EntityType") {
            let name = entity_type.attribute("Name").unwrap_or_default();
            let qualified_name = format!("{}.{}", namespace, name);
            let properties = children(entity_type, "Property")
                .map(|p| {
                    Property::new(
                        p.attribute("Name").unwrap_or_default(),
                        p.attribute("Type").unwrap_or_default(),
                    )
                })
                .collect();

            schema.entity_types.insert(
                qualified_name.clone(),
                EntityTypeDescriptor {
                    name: name.to_string(),
                    qualified_name,
                    properties,
                },
            );
        }

        for entity_set in children(s, "EntityContainer").flat_map(|ec| children(ec, "EntitySet")) {
            let name = entity_set.attribute("Name").unwrap_or_default();
            schema.entity_sets.insert(
                name.to_string(),
                EntitySetDescriptor {
                    name: name.to_string(),
                    entity_type: entity_set
                        .attribute("EntityType")
                        .unwrap_or_default()
                        .to_string(),
                },
            );
        }
    }

    debug!(
        "Parsed {} entity types and {} entity sets from metadata",
        schema.entity_types.len(),
        schema.entity_sets.len()
    );
    Ok(schema)
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.has_tag_name(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EDMX_V4: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>
    <Schema Namespace="ns" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EntityType Name="T">
        <Key><PropertyRef Name="p"/></Key>
        <Property Name="p" Type="string" Nullable="false"/>
      </EntityType>
      <EntityContainer Name="Container">
        <EntitySet Name="S" EntityType="ns.T"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;

    #[test]
    fn test_decode_edmx() {
        let schema = parse_edmx(EDMX_V4).unwrap();

        let mut expected = EdmSchema::default();
        expected.entity_types.insert(
            "ns.T".to_string(),
            EntityTypeDescriptor {
                name: "T".to_string(),
                qualified_name: "ns.T".to_string(),
                properties: vec![Property::new("p", "string")],
            },
        );
        expected.entity_sets.insert(
            "S".to_string(),
            EntitySetDescriptor {
                name: "S".to_string(),
                entity_type: "ns.T".to_string(),
            },
        );
        assert_eq!(schema, expected);
    }

    #[test]
    fn test_schema_json_shape() {
        let schema = parse_edmx(EDMX_V4).unwrap();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "entityTypes": {
                    "ns.T": {
                        "name": "T",
                        "qualifiedName": "ns.T",
                        "properties": [{"name": "p", "type": "string"}]
                    }
                },
                "entitySets": {"S": {"name": "S", "entityType": "ns.T"}}
            })
        );
    }

    #[test]
    fn test_empty_edmx() {
        let schema = decode_edmx(
            br#"<?xml version="1.0" encoding="utf-8"?><edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx"></edmx:Edmx>"#,
        )
        .unwrap();
        assert!(schema.entity_types.is_empty());
        assert!(schema.entity_sets.is_empty());
    }

    #[test]
    fn test_v2_edmx_with_multiple_schemas() {
        let xml = r#"<edmx:Edmx Version="1.0" xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx">
  <edmx:DataServices m:DataServiceVersion="2.0" xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
    <Schema Namespace="Model" xmlns="http://schemas.microsoft.com/ado/2008/09/edm">
      <EntityType Name="Temperature">
        <Property Name="time" Type="Edm.DateTime"/>
        <Property Name="Value1" Type="Edm.Double"/>
      </EntityType>
      <EntityType Name="Temperature">
        <Property Name="only" Type="Edm.Int32"/>
      </EntityType>
    </Schema>
    <Schema Namespace="Service" xmlns="http://schemas.microsoft.com/ado/2008/09/edm">
      <EntityContainer Name="Entities" m:IsDefaultEntityContainer="true">
        <EntitySet Name="Temperatures" EntityType="Model.Temperature"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;
        let schema = parse_edmx(xml).unwrap();

        // last write wins
        let temperature = &schema.entity_types["Model.Temperature"];
        assert_eq!(temperature.properties, vec![Property::new("only", "Edm.Int32")]);
        assert_eq!(schema.entity_sets["Temperatures"].entity_type, "Model.Temperature");
    }

    #[test]
    fn test_invalid_xml() {
        let err = decode_edmx(b"Invalid xml").unwrap_err();
        assert!(matches!(err, ODataError::MetadataParse(_)));
    }

    #[test]
    fn test_missing_closing_element() {
        let err = decode_edmx(
            br#"<?xml version="1.0" encoding="utf-8"?><edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">"#,
        )
        .unwrap_err();
        assert!(matches!(err, ODataError::MetadataParse(_)));
    }

    #[test]
    fn test_wrong_root_element() {
        let err = parse_edmx("<root/>").unwrap_err();
        assert!(matches!(err, ODataError::MetadataParse(_)));
    }
}
