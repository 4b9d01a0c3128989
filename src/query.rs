//! Building blocks of n-gram search queries

use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Annotation layer that a token is matched against
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Layer {
    /// Inflected form, as written in the text
    #[default]
    WordForm,

    /// Dictionary form
    Lemma,

    /// Part-of-speech tag
    PartOfSpeech,
}
//
impl Layer {
    /// Every layer, in wire code order
    pub const ALL: [Layer; 3] = [Layer::WordForm, Layer::Lemma, Layer::PartOfSpeech];

    /// Integer code used by the API
    pub fn code(self) -> u8 {
        match self {
            Self::WordForm => 0,
            Self::Lemma => 1,
            Self::PartOfSpeech => 2,
        }
    }

    /// Name of the table column that holds tokens resolved to this layer
    pub fn column_name(self) -> &'static str {
        match self {
            Self::WordForm => "Wortform",
            Self::Lemma => "Lemma",
            Self::PartOfSpeech => "POS",
        }
    }
}
//
impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WordForm => "wordform",
            Self::Lemma => "lemma",
            Self::PartOfSpeech => "pos",
        })
    }
}
//
impl FromStr for Layer {
    type Err = ParseLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wordform" | "word" | "form" => Ok(Self::WordForm),
            "lemma" => Ok(Self::Lemma),
            "pos" => Ok(Self::PartOfSpeech),
            _ => Err(ParseLayerError(s.into())),
        }
    }
}
//
impl Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Unknown layer name
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown layer {0:?}, expected one of wordform, lemma or pos")]
pub struct ParseLayerError(Box<str>);

/// Constraint on the token at some position of the searched n-grams
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchItem {
    /// Position of the token within the n-gram, starting at 0
    pub position: usize,

    /// Layer that the token is matched against
    pub layer: Layer,

    /// Token to be searched
    pub token: Box<str>,
}
//
impl SearchItem {
    /// Constrain the token at some position
    pub fn new(position: usize, layer: Layer, token: impl Into<Box<str>>) -> Self {
        Self {
            position,
            layer,
            token: token.into(),
        }
    }
}

/// Body of a `POST /search` request
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SearchRequest<'items> {
    pub n: usize,
    pub year: crate::Year,
    pub items: &'items [SearchItem],
}

/// Body of a `POST /lookup` request
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LookupRequest {
    pub layer: Layer,
    pub year: crate::Year,
    pub query: String,
}
