//! Shared helpers for the integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use std::time::Duration;

use odata_datasource::api::TimeRange;
use odata_datasource::config::{
    DatasourceSettings, InstanceSettings, ODataVersion, UrlSpaceEncoding,
};

pub fn instance(url: &str) -> InstanceSettings {
    instance_with(url, DatasourceSettings::default())
}

pub fn instance_with(url: &str, settings: DatasourceSettings) -> InstanceSettings {
    InstanceSettings {
        url: url.to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        settings,
    }
}

pub fn settings(encoding: UrlSpaceEncoding, version: ODataVersion) -> DatasourceSettings {
    DatasourceSettings {
        url_space_encoding: encoding,
        odata_version: version,
    }
}

/// 2022-04-21T12:30:50Z .. 2022-04-21T18:30:50Z
pub fn time_range() -> TimeRange {
    TimeRange::new(
        Utc.with_ymd_and_hms(2022, 4, 21, 12, 30, 50).unwrap(),
        Utc.with_ymd_and_hms(2022, 4, 21, 18, 30, 50).unwrap(),
    )
}

pub const EDMX: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>
    <Schema Namespace="Model" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EntityType Name="Temperature">
        <Key><PropertyRef Name="Id"/></Key>
        <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
        <Property Name="time" Type="Edm.DateTimeOffset"/>
        <Property Name="Value1" Type="Edm.Double"/>
      </EntityType>
      <EntityContainer Name="Container">
        <EntitySet Name="Temperatures" EntityType="Model.Temperature"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>"#;
