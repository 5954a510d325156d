use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::xml::{self, secs};
use crate::error::Result;

/// One lighting cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowLight {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@note")]
    pub note: u8,
}

/// A lighting cue document (`<showlights>`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShowLights {
    pub lights: Vec<ShowLight>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "showlights")]
struct ShowLightsFile {
    #[serde(rename = "@count", default)]
    count: usize,
    #[serde(rename = "showlight", default)]
    lights: Vec<ShowLight>,
}

impl ShowLights {
    pub fn new(lights: Vec<ShowLight>) -> Self {
        Self { lights }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file: ShowLightsFile = xml::load(path.as_ref())?;
        Ok(Self {
            lights: file.lights,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = ShowLightsFile {
            count: self.lights.len(),
            lights: self.lights.clone(),
        };
        xml::save(path.as_ref(), &file)
    }
}
