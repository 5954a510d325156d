//! XML codec helpers shared by every chart document type.
//!
//! Times are held as integer milliseconds and written as seconds with three
//! decimals. Flags are written as `0`/`1`. Collections are wrapped in a
//! parent element carrying a `count` attribute.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

pub(crate) fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    quick_xml::de::from_str(&content).map_err(|e| Error::xml_read(path, e))
}

/// Serialize `value` and atomically replace `path` with it.
pub(crate) fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut body = String::new();
    let mut ser = quick_xml::se::Serializer::new(&mut body);
    ser.indent(' ', 2);
    value.serialize(ser).map_err(|e| Error::xml_write(path, e))?;

    let tmp = path.with_extension("xml.tmp");
    fs::write(&tmp, format!("{XML_DECLARATION}{body}\n"))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Millisecond times as decimal seconds.
pub(crate) mod secs {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn to_string(ms: i32) -> String {
        let sign = if ms < 0 { "-" } else { "" };
        let abs = ms.unsigned_abs();
        format!("{}{}.{:03}", sign, abs / 1000, abs % 1000)
    }

    pub fn parse(s: &str) -> Option<i32> {
        let value: f64 = s.trim().parse().ok()?;
        Some((value * 1000.0).round() as i32)
    }

    pub fn serialize<S: Serializer>(ms: &i32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_string(*ms))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| D::Error::custom(format!("invalid time value '{s}'")))
    }
}

/// Booleans as `0`/`1`.
pub(crate) mod flag {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid flag value '{other}'"))),
        }
    }
}

/// Generates a `with` module for a `Vec<T>` stored as
/// `<parent count="N"><tag/>...</parent>`.
macro_rules! counted_list {
    ($module:ident, $item:ty, $tag:literal) => {
        pub(crate) mod $module {
            #[allow(unused_imports)]
            use super::*;
            use serde::{Deserialize, Deserializer, Serialize, Serializer};

            #[derive(Serialize)]
            struct Out<'a> {
                #[serde(rename = "@count")]
                count: usize,
                #[serde(rename = $tag)]
                items: &'a [$item],
            }

            #[derive(Deserialize)]
            struct In {
                #[serde(rename = $tag, default)]
                items: Vec<$item>,
            }

            #[allow(clippy::ptr_arg)]
            pub fn serialize<S: Serializer>(
                items: &Vec<$item>,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                Out {
                    count: items.len(),
                    items,
                }
                .serialize(serializer)
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Vec<$item>, D::Error> {
                In::deserialize(deserializer).map(|list| list.items)
            }
        }
    };
}

pub(crate) use counted_list;
