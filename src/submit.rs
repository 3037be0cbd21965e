// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Venue submission.
//!
//! A submission has two phases. `create` registers a template or a schedule
//! and returns ids of the created seats. Those ids are stamped onto the
//! exported tickets layer as `data-seat-id`, and the layers are uploaded
//! with `upload_assets`.
//!
//! The upload is retried with the same idempotency key. When it still fails,
//! the created record is discarded, so a record never outlives its assets.
//! Only the exported copy is changed, the session tree is never touched.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dom::Session;
use crate::error::{BackendError, ExportError, SubmitError};
use crate::export::{self, ExportBundle, ExportOptions, SerializedNode};

/// An attribute that holds the backend id of a seat.
pub const SEAT_ID_ATTRIBUTE: &str = "data-seat-id";

/// A backend record kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Scope {
    /// A reusable venue template.
    Template,
    /// A dated event schedule.
    Schedule,
}

/// Record metadata.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Metadata {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub description: String,
    #[allow(missing_docs)]
    pub status: String,
    /// Base price. Omitted from the form when not set.
    pub price: Option<f64>,
    /// Start and end dates, as the backend expects them.
    pub date_range: Option<(String, String)>,
}

/// A multipart form field value.
#[derive(Clone, PartialEq, Debug)]
pub enum FormValue {
    /// A plain text field.
    Text(String),
    /// A file field.
    File {
        /// File name.
        name: &'static str,
        /// JSON content.
        content: String,
    },
}

/// A multipart form.
///
/// Fields are kept in insertion order.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct MultipartForm {
    fields: Vec<(String, FormValue)>,
}

impl MultipartForm {
    /// Constructs a new, empty form.
    pub fn new() -> Self {
        MultipartForm::default()
    }

    /// Appends a text field.
    pub fn push_text<S: Into<String>>(&mut self, name: &str, value: S) {
        self.fields.push((name.to_string(), FormValue::Text(value.into())));
    }

    /// Appends a file field named after the file.
    pub fn push_file(&mut self, name: &'static str, content: String) {
        self.fields.push((name.to_string(), FormValue::File { name, content }));
    }

    /// Returns the first field with the specified name.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns a text or a file content of the field.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FormValue::Text(ref s) => Some(s),
            FormValue::File { ref content, .. } => Some(content),
        }
    }

    /// Returns an iterator over fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push_metadata(&mut self, meta: &Metadata) {
        self.push_text("name", meta.name.as_str());
        self.push_text("description", meta.description.as_str());
        self.push_text("status", meta.status.as_str());

        if let Some(price) = meta.price {
            self.push_text("price", price.to_string());
        }

        if let Some((ref start, ref end)) = meta.date_range {
            self.push_text("start_date", start.as_str());
            self.push_text("end_date", end.as_str());
        }
    }
}

/// A seat created by the backend.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CreatedSeat {
    /// Seat identifier, as exported in `seats.json`.
    pub seat_no: String,
    /// Backend seat id.
    pub id: u64,
}

/// A created record.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Created {
    #[allow(missing_docs)]
    pub record_id: String,
    #[allow(missing_docs)]
    pub seats: Vec<CreatedSeat>,
}

/// A booking backend.
pub trait Backend {
    /// Creates a record from the metadata and the exported files.
    fn create(&mut self, scope: Scope, form: &MultipartForm) -> Result<Created, BackendError>;

    /// Uploads layer files of a created record.
    ///
    /// Requests with the same `idempotency_key` must have the same effect as one.
    fn upload_assets(
        &mut self,
        scope: Scope,
        record_id: &str,
        idempotency_key: &str,
        form: &MultipartForm,
    ) -> Result<(), BackendError>;

    /// Removes a created record.
    fn discard(&mut self, scope: Scope, record_id: &str) -> Result<(), BackendError>;
}

/// Options that defines submission behavior.
#[derive(Clone, Copy, Debug)]
pub struct SubmitOptions {
    /// Maximal number of `upload_assets` calls.
    ///
    /// Default: 3
    pub max_attempts: usize,
}

impl Default for SubmitOptions {
    fn default() -> SubmitOptions {
        SubmitOptions {
            max_attempts: 3,
        }
    }
}

/// A successful submission.
#[derive(Clone, PartialEq, Debug)]
pub struct Submitted {
    #[allow(missing_docs)]
    pub record_id: String,
    /// The number of ticket nodes stamped with a seat id.
    pub stamped: usize,
    /// The number of `upload_assets` calls.
    pub attempts: usize,
}

/// Drives a two-phase submission.
pub struct Submitter<B: Backend> {
    backend: B,
    opt: SubmitOptions,
}

impl<B: Backend> Submitter<B> {
    /// Constructs a new submitter.
    pub fn new(backend: B, opt: SubmitOptions) -> Self {
        Submitter { backend, opt }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Exports the session tree and submits it.
    pub fn submit_session(
        &mut self,
        session: &Session,
        export_opt: &ExportOptions,
        scope: Scope,
        meta: &Metadata,
    ) -> Result<Submitted, SubmitError> {
        let bundle = export::export(session, export_opt)?;
        self.submit(scope, meta, &bundle)
    }

    /// Submits an exported venue.
    pub fn submit(&mut self, scope: Scope, meta: &Metadata, bundle: &ExportBundle) -> Result<Submitted, SubmitError> {
        let mut form = MultipartForm::new();
        form.push_metadata(meta);
        for (name, content) in bundle.to_files()? {
            form.push_file(name, content);
        }

        let created = self.backend.create(scope, &form)?;
        debug!("{:?} '{}' created with {} seats.", scope, created.record_id, created.seats.len());

        let mut tickets = bundle.tickets.clone();
        let stamped = stamp_seat_ids(&mut tickets, &created.seats);

        let form = match assets_form(&tickets, bundle) {
            Ok(form) => form,
            Err(e) => {
                let discarded = self.discard(scope, &created.record_id);
                warn!("Failed to serialize assets: {}. Record discarded: {}.", e, discarded);
                return Err(ExportError::from(e).into());
            }
        };

        let key = idempotency_key(scope, &created.record_id, &form);
        let max_attempts = self.opt.max_attempts.max(1);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let e = match self.backend.upload_assets(scope, &created.record_id, &key, &form) {
                Ok(()) => {
                    return Ok(Submitted { record_id: created.record_id, stamped, attempts });
                }
                Err(e) => e,
            };

            warn!("Assets upload attempt {} failed: {}.", attempts, e);
            if !e.retryable || attempts >= max_attempts {
                let discarded = self.discard(scope, &created.record_id);
                return Err(SubmitError::Incomplete {
                    record_id: created.record_id,
                    attempts,
                    discarded,
                    cause: e,
                });
            }
        }
    }

    fn discard(&mut self, scope: Scope, record_id: &str) -> bool {
        match self.backend.discard(scope, record_id) {
            Ok(()) => {
                debug!("{:?} '{}' discarded.", scope, record_id);
                true
            }
            Err(e) => {
                warn!("Failed to discard {:?} '{}': {}.", scope, record_id, e);
                false
            }
        }
    }
}

/// Stamps backend seat ids onto matching nodes of a serialized layer.
///
/// Nodes are matched by their `id`. Returns the number of stamped nodes.
pub fn stamp_seat_ids(layer: &mut SerializedNode, seats: &[CreatedSeat]) -> usize {
    let map: HashMap<&str, u64> = seats.iter().map(|s| (s.seat_no.as_str(), s.id)).collect();
    let stamped = stamp_node(layer, &map);
    if stamped < map.len() {
        warn!("{} created seat(s) have no matching ticket node.", map.len() - stamped);
    }

    stamped
}

fn stamp_node(node: &mut SerializedNode, map: &HashMap<&str, u64>) -> usize {
    let mut count = 0;
    if let Some(&id) = node.id().and_then(|s| map.get(s)) {
        node.attrs.insert(SEAT_ID_ATTRIBUTE.to_string(), Value::from(id.to_string()));
        count += 1;
    }

    for child in &mut node.children {
        count += stamp_node(child, map);
    }

    count
}

fn assets_form(tickets: &SerializedNode, bundle: &ExportBundle) -> Result<MultipartForm, serde_json::Error> {
    let mut form = MultipartForm::new();
    form.push_file(ExportBundle::TICKETS_FILE, serde_json::to_string(tickets)?);
    form.push_file(ExportBundle::MASKS_FILE, serde_json::to_string(&bundle.masks)?);
    if let Some(ref bg) = bundle.background {
        form.push_file(ExportBundle::BACKGROUND_FILE, serde_json::to_string(bg)?);
    }

    Ok(form)
}

fn idempotency_key(scope: Scope, record_id: &str, form: &MultipartForm) -> String {
    let mut hasher = DefaultHasher::new();
    scope.hash(&mut hasher);
    record_id.hash(&mut hasher);
    for (name, value) in form.iter() {
        name.hash(&mut hasher);
        match *value {
            FormValue::Text(ref s) => s.hash(&mut hasher),
            FormValue::File { ref content, .. } => content.hash(&mut hasher),
        }
    }

    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, children: Vec<SerializedNode>) -> SerializedNode {
        let mut attrs = serde_json::Map::new();
        attrs.insert("id".into(), id.into());
        SerializedNode { class_name: "Group".into(), attrs, children }
    }

    #[test]
    fn stamp_nested() {
        let mut layer = node("tickets", vec![node("r1", vec![node("r1-s1", vec![])])]);
        let seats = vec![
            CreatedSeat { seat_no: "r1-s1".into(), id: 42 },
            CreatedSeat { seat_no: "r9-s9".into(), id: 43 },
        ];

        assert_eq!(stamp_seat_ids(&mut layer, &seats), 1);
        let seat = &layer.children[0].children[0];
        assert_eq!(seat.attrs.get(SEAT_ID_ATTRIBUTE), Some(&Value::from("42")));
        assert_eq!(layer.children[0].attrs.get(SEAT_ID_ATTRIBUTE), None);
    }

    #[test]
    fn stable_key() {
        let mut form = MultipartForm::new();
        form.push_file(ExportBundle::TICKETS_FILE, "{}".into());
        let a = idempotency_key(Scope::Template, "1", &form);
        assert_eq!(a, idempotency_key(Scope::Template, "1", &form));
        assert_ne!(a, idempotency_key(Scope::Schedule, "1", &form));
    }
}
