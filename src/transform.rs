// src/transform.rs
//! Transform string parsing and candidate generation
//!
//! `"AES/CBC/PKCS5Padding"` → an immutable [`TransformSpec`], and from it the
//! ordered lookup candidates a resolver walks, most specific first.

use std::fmt;

use crate::error::{EngineError, Result};

/// Parsed {algorithm, mode?, padding?} triple. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSpec {
    algorithm: String,
    mode: Option<String>,
    padding: Option<String>,
}

/// Which of mode/padding a matched service did not encode in its name and
/// must be configured on the instance after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldsNeeded {
    None,
    Mode,
    Padding,
    Both,
}

impl FieldsNeeded {
    pub fn needs_mode(self) -> bool {
        matches!(self, FieldsNeeded::Mode | FieldsNeeded::Both)
    }

    pub fn needs_padding(self) -> bool {
        matches!(self, FieldsNeeded::Padding | FieldsNeeded::Both)
    }
}

/// One lookup key: a service name to probe, and what would remain to be
/// configured if a service registered under that name matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub needs: FieldsNeeded,
}

impl TransformSpec {
    /// Parse a transform string: `ALGORITHM`, or `ALGORITHM/MODE/PADDING`.
    ///
    /// Segments are trimmed. Exactly 1 or 3 non-empty segments are accepted;
    /// two segments have no coherent reading (mode and padding cannot be told
    /// apart) and are rejected.
    pub fn parse(transformation: &str) -> Result<Self> {
        if transformation.trim().is_empty() {
            return Err(EngineError::NoTransformation);
        }
        let segments: Vec<&str> = transformation.split('/').map(str::trim).collect();
        match segments.as_slice() {
            [algorithm] if !algorithm.is_empty() => Ok(Self {
                algorithm: (*algorithm).to_owned(),
                mode: None,
                padding: None,
            }),
            [algorithm, mode, padding]
                if !algorithm.is_empty() && !mode.is_empty() && !padding.is_empty() =>
            {
                Ok(Self {
                    algorithm: (*algorithm).to_owned(),
                    mode: Some((*mode).to_owned()),
                    padding: Some((*padding).to_owned()),
                })
            }
            _ => Err(EngineError::InvalidTransformationFormat(
                transformation.to_owned(),
            )),
        }
    }

    /// Build a spec directly. Used when mode or padding is known on its own,
    /// which the string grammar cannot express.
    ///
    /// Fields are trimmed like `parse` segments; a present-but-blank mode or
    /// padding is rejected so candidate names and `Display` stay well-formed.
    pub fn new(
        algorithm: impl Into<String>,
        mode: Option<String>,
        padding: Option<String>,
    ) -> Result<Self> {
        let algorithm = algorithm.into();
        let algorithm = algorithm.trim();
        if algorithm.is_empty() {
            return Err(EngineError::NoTransformation);
        }
        let mode = mode.as_deref().map(str::trim);
        let padding = padding.as_deref().map(str::trim);
        if mode == Some("") || padding == Some("") {
            return Err(EngineError::InvalidTransformationFormat(format!(
                "{algorithm}/{}/{}",
                mode.unwrap_or(""),
                padding.unwrap_or("")
            )));
        }
        Ok(Self {
            algorithm: algorithm.to_owned(),
            mode: mode.map(str::to_owned),
            padding: padding.map(str::to_owned),
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    pub fn padding(&self) -> Option<&str> {
        self.padding.as_deref()
    }

    /// Ordered lookup candidates, most specific first.
    ///
    /// Providers may register under fully-qualified names (nothing left to
    /// configure) or under the bare algorithm (mode/padding set afterwards);
    /// an exact registration must win over generic configuration, so the
    /// bare-algorithm key always comes last.
    pub fn candidates(&self) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(4);
        if let (Some(mode), Some(padding)) = (&self.mode, &self.padding) {
            out.push(Candidate {
                name: format!("{}/{}/{}", self.algorithm, mode, padding),
                needs: FieldsNeeded::None,
            });
        }
        if let Some(mode) = &self.mode {
            out.push(Candidate {
                name: format!("{}/{}", self.algorithm, mode),
                needs: FieldsNeeded::Padding,
            });
        }
        if let Some(padding) = &self.padding {
            // The empty middle segment means "only padding known".
            out.push(Candidate {
                name: format!("{}//{}", self.algorithm, padding),
                needs: FieldsNeeded::Mode,
            });
        }
        out.push(Candidate {
            name: self.algorithm.clone(),
            needs: FieldsNeeded::Both,
        });
        out
    }
}

impl fmt::Display for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.mode, &self.padding) {
            (Some(mode), Some(padding)) => {
                write!(f, "{}/{}/{}", self.algorithm, mode, padding)
            }
            (Some(mode), None) => write!(f, "{}/{}", self.algorithm, mode),
            (None, Some(padding)) => write!(f, "{}//{}", self.algorithm, padding),
            (None, None) => f.write_str(&self.algorithm),
        }
    }
}
