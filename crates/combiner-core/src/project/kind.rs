use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of chart a track provides.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ArrangementType {
    Lead,
    Rhythm,
    Combo,
    Bass,
    Vocals,
    JVocals,
    ShowLights,
}

impl ArrangementType {
    pub fn is_instrumental(self) -> bool {
        matches!(self, Self::Lead | Self::Rhythm | Self::Combo | Self::Bass)
    }

    pub fn is_vocals(self) -> bool {
        matches!(self, Self::Vocals | Self::JVocals)
    }

    /// File name of the combined document of this kind.
    pub fn output_file_name(self) -> String {
        match self {
            Self::ShowLights => "Combined_Showlights_RS2.xml".to_string(),
            kind => format!("Combined_{}_RS2.xml", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_classification_is_exclusive() {
        for kind in ArrangementType::iter() {
            let classes = [
                kind.is_instrumental(),
                kind.is_vocals(),
                kind == ArrangementType::ShowLights,
            ];
            assert_eq!(classes.iter().filter(|&&c| c).count(), 1, "{kind}");
        }
    }

    #[test]
    fn test_parse_arrangement_name() {
        assert_eq!("lead".parse::<ArrangementType>().ok(), Some(ArrangementType::Lead));
        assert_eq!("Bass".parse::<ArrangementType>().ok(), Some(ArrangementType::Bass));
        assert!("Keys".parse::<ArrangementType>().is_err());
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(ArrangementType::Rhythm.output_file_name(), "Combined_Rhythm_RS2.xml");
        assert_eq!(
            ArrangementType::ShowLights.output_file_name(),
            "Combined_Showlights_RS2.xml"
        );
    }
}
