// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error;
use std::fmt;

use crate::NodeId;

/// Tree and annotation errors.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The node is not part of the tree or was already removed.
    NodeNotFound(NodeId),

    /// The root node can't be removed or reparented.
    RootNode,

    /// The field name is not registered in the code table.
    UnknownField(String),

    /// A code table can't map two fields to the same code.
    DuplicateCode(char),

    /// A code table can't register the same field twice.
    DuplicateField(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NodeNotFound(id) => {
                write!(f, "node {} does not exist", id)
            }
            Error::RootNode => {
                write!(f, "the root node can't be modified this way")
            }
            Error::UnknownField(ref name) => {
                write!(f, "unknown semantic field '{}'", name)
            }
            Error::DuplicateCode(c) => {
                write!(f, "code '{}' is already registered", c)
            }
            Error::DuplicateField(ref name) => {
                write!(f, "field '{}' is already registered", name)
            }
        }
    }
}

impl error::Error for Error {}


/// SVG parsing errors.
#[derive(Debug)]
pub enum ParserError {
    /// Parsed document must have an `svg` root element.
    NoSvgElement,

    /// A `roxmltree` error.
    RoXmlError(roxmltree::Error),
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParserError::NoSvgElement => {
                write!(f, "the document does not have an SVG element")
            }
            ParserError::RoXmlError(ref e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl error::Error for ParserError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ParserError::RoXmlError(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for ParserError {
    fn from(value: roxmltree::Error) -> Self {
        ParserError::RoXmlError(value)
    }
}


/// Layer export and loading errors.
#[derive(Debug)]
pub enum ExportError {
    /// One of the required top-level layers is missing.
    MissingLayer(String),

    /// A serialized layer has an unknown `className`.
    UnknownClass(String),

    /// A tree error.
    DomError(Error),

    /// A `serde_json` error.
    Json(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ExportError::MissingLayer(ref name) => {
                write!(f, "the '{}' layer is missing", name)
            }
            ExportError::UnknownClass(ref name) => {
                write!(f, "unknown primitive class '{}'", name)
            }
            ExportError::DomError(ref e) => {
                write!(f, "{}", e)
            }
            ExportError::Json(ref e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl error::Error for ExportError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ExportError::DomError(ref e) => Some(e),
            ExportError::Json(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for ExportError {
    fn from(value: Error) -> Self {
        ExportError::DomError(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        ExportError::Json(value)
    }
}

/// Venue submission errors.
#[derive(Debug)]
pub enum SubmitError {
    /// The backend has rejected the request.
    Backend(BackendError),

    /// The venue cannot be exported.
    Export(ExportError),

    /// The record was created, but its assets were not uploaded.
    ///
    /// `discarded` indicates that the created record was removed afterwards.
    Incomplete {
        /// The created record.
        record_id: String,
        /// The number of upload attempts.
        attempts: usize,
        /// The record was successfully discarded.
        discarded: bool,
        /// The last upload error.
        cause: BackendError,
    },
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SubmitError::Backend(ref e) => {
                write!(f, "{}", e)
            }
            SubmitError::Export(ref e) => {
                write!(f, "{}", e)
            }
            SubmitError::Incomplete { ref record_id, attempts, discarded, ref cause } => {
                write!(f, "assets of the record '{}' were not uploaded after {} attempt(s): {}",
                       record_id, attempts, cause)?;
                if !discarded {
                    write!(f, " (the record was not discarded)")?;
                }
                Ok(())
            }
        }
    }
}

impl error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            SubmitError::Backend(ref e) => Some(e),
            SubmitError::Export(ref e) => Some(e),
            SubmitError::Incomplete { ref cause, .. } => Some(cause),
        }
    }
}

impl From<BackendError> for SubmitError {
    fn from(value: BackendError) -> Self {
        SubmitError::Backend(value)
    }
}

impl From<ExportError> for SubmitError {
    fn from(value: ExportError) -> Self {
        SubmitError::Export(value)
    }
}

/// An opaque backend failure.
#[derive(Clone, PartialEq, Debug)]
pub struct BackendError {
    /// HTTP-like status code, if any.
    pub status: Option<u16>,
    /// Error message.
    pub message: String,
    /// The request can be repeated.
    pub retryable: bool,
}

impl BackendError {
    /// Creates a new error.
    pub fn new<S: Into<String>>(status: Option<u16>, message: S, retryable: bool) -> Self {
        BackendError { status, message: message.into(), retryable }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "backend error {}: {}", status, self.message),
            None => write!(f, "backend error: {}", self.message),
        }
    }
}

impl error::Error for BackendError {}
