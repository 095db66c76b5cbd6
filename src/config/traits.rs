use crate::error::EvotreeError;

/// Contract every configuration section fulfils
pub trait ConfigSection {
    fn section_name() -> &'static str;

    fn validate(&self) -> Result<(), EvotreeError>;
}
