//! # Container Inspect Flattening
//!
//! File: cli/src/ops/inspect.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Reduces the nested document returned by `GET /containers/{id}/json` to a
//! flat record of the fields most callers need. Keys keep the names used by
//! existing consumers of the flattened form (`Cont_Id`, `State_running`,
//! `port_map`, ...).
//!
use crate::core::error::{DockhandError, Result};
use anyhow::anyhow;
use serde::Serialize;
use serde_json::Value;

/// Flattened view of a container inspect document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerDetails {
    #[serde(rename = "Cont_Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "Created_date")]
    pub created_date: String,
    #[serde(rename = "Created_time")]
    pub created_time: String,
    #[serde(rename = "State_running")]
    pub running: bool,
    #[serde(rename = "State_restarting")]
    pub restarting: bool,
    #[serde(rename = "State_paused")]
    pub paused: bool,
    #[serde(rename = "CpuShares")]
    pub cpu_shares: Value,
    #[serde(rename = "Cpuset")]
    pub cpuset: Value,
    #[serde(rename = "Links")]
    pub links: Value,
    #[serde(rename = "Env")]
    pub env: Value,
    #[serde(rename = "VolumesFrom")]
    pub volumes_from: Value,
    #[serde(rename = "Volume")]
    pub volumes: Value,
    #[serde(rename = "Cmd")]
    pub cmd: Value,
    #[serde(rename = "Entry_point")]
    pub entrypoint: Value,
    #[serde(rename = "Memory")]
    pub memory: Value,
    #[serde(rename = "Memory_swap")]
    pub memory_swap: Value,
    #[serde(rename = "IP")]
    pub ip: String,
    /// `"<container port>:<host port>"`, one per bound port.
    pub port_map: Vec<String>,
}

impl ContainerDetails {
    /// Builds the flat record from a full inspect document.
    ///
    /// # Errors
    ///
    /// `DockhandError::Inspect` naming the first required field that is
    /// missing or has the wrong type.
    pub fn from_inspect(doc: &Value) -> Result<Self> {
        let created = str_field(doc, &["Created"])?;
        let (created_date, created_time) = split_created(created)?;
        let name = str_field(doc, &["Name"])?;

        Ok(Self {
            id: str_field(doc, &["Id"])?.to_string(),
            name: name.strip_prefix('/').unwrap_or(name).to_string(),
            image: str_field(doc, &["Config", "Image"])?.to_string(),
            created_date,
            created_time,
            running: bool_field(doc, &["State", "Running"])?,
            restarting: bool_field(doc, &["State", "Restarting"])?,
            paused: bool_field(doc, &["State", "Paused"])?,
            cpu_shares: field(doc, &["HostConfig", "CpuShares"])?.clone(),
            cpuset: field(doc, &["HostConfig", "CpusetCpus"])?.clone(),
            links: field(doc, &["HostConfig", "Links"])?.clone(),
            env: field(doc, &["Config", "Env"])?.clone(),
            volumes_from: field(doc, &["HostConfig", "VolumesFrom"])?.clone(),
            volumes: field(doc, &["Config", "Volumes"])?.clone(),
            cmd: field(doc, &["Config", "Cmd"])?.clone(),
            entrypoint: field(doc, &["Config", "Entrypoint"])?.clone(),
            memory: field(doc, &["HostConfig", "Memory"])?.clone(),
            memory_swap: field(doc, &["HostConfig", "MemorySwap"])?.clone(),
            // Newer daemons leave the top-level address empty or absent.
            ip: field(doc, &["NetworkSettings", "IPAddress"])
                .ok()
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            port_map: port_map(doc),
        })
    }
}

fn missing(path: &[&str]) -> anyhow::Error {
    anyhow!(DockhandError::Inspect {
        field: path.join(".")
    })
}

fn field<'a>(doc: &'a Value, path: &[&str]) -> Result<&'a Value> {
    path.iter()
        .try_fold(doc, |value, key| value.get(key))
        .ok_or_else(|| missing(path))
}

fn str_field<'a>(doc: &'a Value, path: &[&str]) -> Result<&'a str> {
    field(doc, path)?.as_str().ok_or_else(|| missing(path))
}

fn bool_field(doc: &Value, path: &[&str]) -> Result<bool> {
    field(doc, path)?.as_bool().ok_or_else(|| missing(path))
}

/// `2016-02-03T05:07:02.123456789Z` -> (`2016-02-03`, `05:07:02`).
/// Fractional seconds and the zone designator (`Z`, `+02:00`) are dropped.
fn split_created(created: &str) -> Result<(String, String)> {
    let (date, rest) = created
        .split_once('T')
        .ok_or_else(|| missing(&["Created"]))?;
    let time_len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ':'))
        .unwrap_or(rest.len());
    let time = &rest[..time_len];
    if date.is_empty() || time.is_empty() {
        return Err(missing(&["Created"]));
    }
    Ok((date.to_string(), time.to_string()))
}

fn port_map(doc: &Value) -> Vec<String> {
    let Some(bindings) = doc
        .get("HostConfig")
        .and_then(|hc| hc.get("PortBindings"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };
    let mut ports: Vec<String> = bindings
        .iter()
        .filter_map(|(container_port, hosts)| {
            let host_port = hosts.get(0)?.get("HostPort")?.as_str()?;
            Some(format!("{container_port}:{host_port}"))
        })
        .collect();
    ports.sort();
    ports
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_inspect() -> Value {
        json!({
            "Id": "a7da5a495448085ce1fc57deae89b444ffb56d35c1b727750c988c6ca226e771",
            "Name": "/pidgin",
            "Created": "2016-02-03T05:07:02.123456789Z",
            "State": {"Running": true, "Restarting": false, "Paused": false},
            "Config": {
                "Image": "pidgin:latest",
                "Env": ["DISPLAY=:0"],
                "Volumes": null,
                "Cmd": ["/bin/sh", "-c", "/usr/bin/pidgin"],
                "Entrypoint": null
            },
            "HostConfig": {
                "CpuShares": 0,
                "CpusetCpus": "",
                "Links": null,
                "VolumesFrom": null,
                "Memory": 0,
                "MemorySwap": 0,
                "PortBindings": {
                    "80/tcp": [{"HostIp": "", "HostPort": "8080"}],
                    "443/tcp": [{"HostIp": "", "HostPort": "8443"}],
                    "9000/tcp": []
                }
            },
            "NetworkSettings": {"IPAddress": "172.17.0.2"}
        })
    }

    #[test]
    fn test_flatten_full_document() {
        let details = ContainerDetails::from_inspect(&sample_inspect()).unwrap();
        assert_eq!(details.name, "pidgin");
        assert_eq!(details.image, "pidgin:latest");
        assert_eq!(details.created_date, "2016-02-03");
        assert_eq!(details.created_time, "05:07:02");
        assert!(details.running);
        assert_eq!(details.ip, "172.17.0.2");
        assert_eq!(details.port_map, vec!["443/tcp:8443", "80/tcp:8080"]);
        assert_eq!(details.cmd, json!(["/bin/sh", "-c", "/usr/bin/pidgin"]));
    }

    #[test]
    fn test_serialized_keys() {
        let value =
            serde_json::to_value(ContainerDetails::from_inspect(&sample_inspect()).unwrap())
                .unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "Cont_Id",
            "Created_time",
            "State_paused",
            "Entry_point",
            "Memory_swap",
            "port_map",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_missing_field_is_reported() {
        let mut doc = sample_inspect();
        doc["Config"].as_object_mut().unwrap().remove("Image");
        let err = ContainerDetails::from_inspect(&doc).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DockhandError>(),
            Some(DockhandError::Inspect { field }) if field == "Config.Image"
        ));
    }

    #[test]
    fn test_created_without_fraction_and_null_bindings() {
        let mut doc = sample_inspect();
        doc["Created"] = json!("2024-05-01T10:00:00Z");
        doc["HostConfig"]["PortBindings"] = Value::Null;
        doc.as_object_mut().unwrap().remove("NetworkSettings");
        let details = ContainerDetails::from_inspect(&doc).unwrap();
        assert_eq!(details.created_time, "10:00:00");
        assert!(details.port_map.is_empty());
        assert_eq!(details.ip, "");
    }

    #[test]
    fn test_created_time_drops_zone_designator() {
        assert_eq!(
            split_created("2024-05-01T10:00:00+02:00").unwrap(),
            ("2024-05-01".to_string(), "10:00:00".to_string())
        );
        assert_eq!(
            split_created("2024-05-01T10:00:00.5-07:00").unwrap(),
            ("2024-05-01".to_string(), "10:00:00".to_string())
        );
        assert!(split_created("2024-05-01").is_err());
    }
}
