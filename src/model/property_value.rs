use crate::types::{plain_text_of, RichTextItem, SelectOption};

/// The page-level property values the publisher reads.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
    Select(Option<SelectOption>),
    Status(Option<SelectOption>),
    /// Any property type the publisher never reads.
    Other { type_name: String },
}

impl PropertyValue {
    /// Plain text for text-like properties; `None` for everything else.
    pub fn as_plain_text(&self) -> Option<String> {
        match self {
            PropertyValue::Title(items) | PropertyValue::RichText(items) => {
                Some(plain_text_of(items))
            }
            _ => None,
        }
    }

    /// The selected option name for select and status properties.
    pub fn option_name(&self) -> Option<&str> {
        match self {
            PropertyValue::Select(Some(option)) | PropertyValue::Status(Some(option)) => {
                Some(option.name.as_str())
            }
            _ => None,
        }
    }
}
