use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Optional known type prefix, then `numero/ano` with free whitespace around
/// each part. `PLP` precedes `PL` so the longer code wins.
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b(PLP|PL|PEC|MPV|PDL|PRC|REQ|INC|RIC|PDC)\s*)?(\d+)\s*/\s*(\d+)\b")
        .expect("valid regex")
});

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Digite o número da proposição")]
    Empty,

    #[error("Formato inválido. Use: PL XXXX/YYYY (exemplo: PL 2306/2020)")]
    InvalidFormat(String),
}

/// Proposition types the Chamber's open-data API searches by `siglaTipo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillType {
    #[default]
    Pl,
    Plp,
    Pec,
    Mpv,
    Pdl,
    Prc,
    Req,
    Inc,
    Ric,
    Pdc,
}

impl BillType {
    /// Every type, in the order a type-less search walks them.
    pub const ALL: [BillType; 10] = [
        BillType::Pl,
        BillType::Plp,
        BillType::Pec,
        BillType::Mpv,
        BillType::Pdl,
        BillType::Prc,
        BillType::Req,
        BillType::Inc,
        BillType::Ric,
        BillType::Pdc,
    ];

    pub fn from_sigla(sigla: &str) -> Option<Self> {
        let upper = sigla.trim().to_uppercase();
        Self::ALL.into_iter().find(|t| t.sigla() == upper)
    }

    pub fn sigla(&self) -> &'static str {
        match self {
            BillType::Pl => "PL",
            BillType::Plp => "PLP",
            BillType::Pec => "PEC",
            BillType::Mpv => "MPV",
            BillType::Pdl => "PDL",
            BillType::Prc => "PRC",
            BillType::Req => "REQ",
            BillType::Inc => "INC",
            BillType::Ric => "RIC",
            BillType::Pdc => "PDC",
        }
    }

    /// Portuguese name shown in help texts.
    pub fn name(&self) -> &'static str {
        match self {
            BillType::Pl => "Projeto de Lei",
            BillType::Plp => "Projeto de Lei Complementar",
            BillType::Pec => "Proposta de Emenda à Constituição",
            BillType::Mpv => "Medida Provisória",
            BillType::Pdl => "Projeto de Decreto Legislativo",
            BillType::Prc => "Projeto de Resolução",
            BillType::Req => "Requerimento",
            BillType::Inc => "Indicação",
            BillType::Ric => "Requerimento de Informação",
            BillType::Pdc => "Projeto de Decreto Legislativo",
        }
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sigla())
    }
}

/// A bill identifier extracted from user text, e.g. `PL 2306/2020`.
///
/// `tipo` is `None` when the user typed only `numero/ano`; lookups that need a
/// single type fall back to [`BillType::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub tipo: Option<BillType>,
    pub numero: String,
    pub ano: String,
}

impl Identifier {
    /// Extract type, number and year from free-form text.
    ///
    /// The first `[TYPE] digits/digits` occurrence wins. Ordinary words in
    /// front of the number are ignored, but an upper-case code that is not a
    /// known `siglaTipo` (`XYZ 1/2020`) is a malformed identifier.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let invalid = || IdentifierError::InvalidFormat(trimmed.to_string());
        let caps = IDENTIFIER_RE.captures(trimmed).ok_or_else(invalid)?;

        let (Some(numero), Some(ano)) = (caps.get(2), caps.get(3)) else {
            return Err(invalid());
        };
        let tipo = caps.get(1).and_then(|m| BillType::from_sigla(m.as_str()));
        if tipo.is_none() && ends_with_unknown_code(&trimmed[..numero.start()]) {
            return Err(invalid());
        }

        Ok(Self {
            tipo,
            numero: numero.as_str().to_string(),
            ano: ano.as_str().to_string(),
        })
    }

    /// The type to query with when only one type can be searched.
    pub fn tipo_or_default(&self) -> BillType {
        self.tipo.unwrap_or_default()
    }

    /// Label in the API's own shape: `PL 2306/2020`.
    pub fn label(&self) -> String {
        format!("{} {}/{}", self.tipo_or_default(), self.numero, self.ano)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tipo {
            Some(t) => write!(f, "{t} {}/{}", self.numero, self.ano),
            None => write!(f, "{}/{}", self.numero, self.ano),
        }
    }
}

/// Whether `prefix` ends in a 2-4 letter upper-case word, i.e. something
/// written as a `siglaTipo` that the identifier pattern did not accept.
fn ends_with_unknown_code(prefix: &str) -> bool {
    let word: String = prefix
        .trim_end()
        .chars()
        .rev()
        .take_while(|c| c.is_alphabetic())
        .collect();
    (2..=4).contains(&word.chars().count()) && word.chars().all(|c| c.is_ascii_uppercase())
}

/// Collapse runs of whitespace to a single space and trim the ends.
///
/// Case is preserved: this is the string the proxy receives verbatim.
pub fn normalize_query(input: &str) -> Result<String, IdentifierError> {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(IdentifierError::Empty);
    }
    Ok(collapsed)
}
