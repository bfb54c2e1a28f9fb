//! DTOs for decoding directory responses.
//!
//! A known code answers with the address fields; an unknown one answers with
//! `{"erro": true}` (some deployments send the flag as a string).

use serde::Deserialize;

use crate::domain::AddressFields;
use crate::domain::ports::DirectoryLookup;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ErrorFlagDto {
    Bool(bool),
    Text(String),
}

impl ErrorFlagDto {
    fn is_set(&self) -> bool {
        match self {
            Self::Bool(flag) => *flag,
            Self::Text(flag) => flag.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectoryEntryDto {
    #[serde(default)]
    pub(super) logradouro: String,
    #[serde(default)]
    pub(super) bairro: String,
    #[serde(default)]
    pub(super) localidade: String,
    #[serde(default)]
    pub(super) uf: String,
    pub(super) erro: Option<ErrorFlagDto>,
}

impl DirectoryEntryDto {
    pub(super) fn into_lookup(self) -> DirectoryLookup {
        if self.erro.as_ref().is_some_and(ErrorFlagDto::is_set) {
            return DirectoryLookup::NotFound;
        }
        DirectoryLookup::Found(AddressFields {
            street_address: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            region: self.uf,
        })
    }
}
