// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed aggregation pipeline.
//!
//! Stages are built as Rust values, rendered to MongoDB stage documents for
//! the live store, and evaluated directly by the in-process store. The
//! evaluator implements the same subset of operators the server issues:
//! - `$match` with equality, `$eq`, `$ne`, `$in`, `$exists`, `$gte`, `$lte`
//! - `$lookup` equality joins
//! - `$unwind` (empty or missing arrays drop the document)
//! - `$project` with include, exclude and field references
//! - `$group` with `$sum`

use mongodb::bson::{doc, Bson, Document};
use std::cmp::Ordering;

/// How a single field is treated by a [`Stage::Project`].
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Include,
    Exclude,
    /// Copy the value found at a dotted path (a rename when the names differ).
    Field(String),
}

/// `$sum` accumulator input.
#[derive(Debug, Clone, PartialEq)]
pub enum Sum {
    /// Sum a numeric field; missing or non-numeric values contribute nothing.
    Field(String),
    /// Count documents in the group.
    Count,
}

/// One aggregation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Document),
    Lookup {
        from: String,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },
    Unwind(String),
    Project(Vec<(String, Projection)>),
    Group {
        /// Grouping path; `None` puts every document in a single group.
        key: Option<String>,
        sums: Vec<(String, Sum)>,
    },
}

impl Stage {
    pub fn lookup(from: &str, local_field: &str, foreign_field: &str, as_field: &str) -> Self {
        Stage::Lookup {
            from: from.to_string(),
            local_field: local_field.to_string(),
            foreign_field: foreign_field.to_string(),
            as_field: as_field.to_string(),
        }
    }

    /// Render as a MongoDB pipeline stage document.
    pub fn to_document(&self) -> Document {
        match self {
            Stage::Match(filter) => doc! { "$match": filter.clone() },
            Stage::Lookup {
                from,
                local_field,
                foreign_field,
                as_field,
            } => doc! {
                "$lookup": {
                    "from": from.as_str(),
                    "localField": local_field.as_str(),
                    "foreignField": foreign_field.as_str(),
                    "as": as_field.as_str(),
                }
            },
            Stage::Unwind(path) => doc! { "$unwind": format!("${}", path) },
            Stage::Project(fields) => {
                let mut spec = Document::new();
                for (name, projection) in fields {
                    let value = match projection {
                        Projection::Include => Bson::Int32(1),
                        Projection::Exclude => Bson::Int32(0),
                        Projection::Field(path) => Bson::String(format!("${}", path)),
                    };
                    spec.insert(name.clone(), value);
                }
                doc! { "$project": spec }
            }
            Stage::Group { key, sums } => {
                let mut spec = doc! {
                    "_id": key.as_ref().map_or(Bson::Null, |k| Bson::String(format!("${}", k))),
                };
                for (name, sum) in sums {
                    let input = match sum {
                        Sum::Field(path) => Bson::String(format!("${}", path)),
                        Sum::Count => Bson::Int32(1),
                    };
                    spec.insert(name.clone(), doc! { "$sum": input });
                }
                doc! { "$group": spec }
            }
        }
    }
}

// ─── Field Access ────────────────────────────────────────────

/// Resolve a dotted path inside a document.
pub fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_document()?.get(part)?;
    }
    Some(current)
}

/// Set a dotted path, creating intermediate documents as needed.
pub fn set_path(doc: &mut Document, path: &str, value: Bson) {
    match path.split_once('.') {
        None => {
            doc.insert(path, value);
        }
        Some((head, rest)) => {
            if !matches!(doc.get(head), Some(Bson::Document(_))) {
                doc.insert(head, Document::new());
            }
            if let Some(Bson::Document(child)) = doc.get_mut(head) {
                set_path(child, rest, value);
            }
        }
    }
}

/// Numeric value of a BSON scalar, if it has one.
pub fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// Equality ignoring the numeric representation.
pub fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Ordering for comparable scalars (numbers, strings, dates).
fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Sort ordering: missing and null values sort before everything else.
pub fn sort_compare(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let a = a.filter(|v| !matches!(v, Bson::Null));
    let b = b.filter(|v| !matches!(v, Bson::Null));
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
    }
}

// ─── Filters ─────────────────────────────────────────────────

/// Whether `doc` satisfies every condition in `filter`.
pub fn matches(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(path, condition)| field_matches(get_path(doc, path), condition))
}

fn is_operator_doc(condition: &Bson) -> Option<&Document> {
    match condition {
        Bson::Document(d) if !d.is_empty() && d.keys().all(|k| k.starts_with('$')) => Some(d),
        _ => None,
    }
}

fn field_matches(value: Option<&Bson>, condition: &Bson) -> bool {
    match is_operator_doc(condition) {
        Some(ops) => ops
            .iter()
            .all(|(op, operand)| operator_matches(value, op, operand)),
        None => equals(value, condition),
    }
}

/// Equality with MongoDB semantics: a missing field equals `null`, and an
/// array field matches if any element does.
fn equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| values_equal(item, expected))
        }
        Some(v) => values_equal(v, expected),
    }
}

fn operator_matches(value: Option<&Bson>, op: &str, operand: &Bson) -> bool {
    match op {
        "$eq" => equals(value, operand),
        "$ne" => !equals(value, operand),
        "$in" => match operand {
            Bson::Array(candidates) => candidates.iter().any(|c| equals(value, c)),
            _ => false,
        },
        "$exists" => {
            let wanted = operand.as_bool().unwrap_or(true);
            value.is_some() == wanted
        }
        "$gte" => value
            .and_then(|v| compare(v, operand))
            .is_some_and(|o| o != Ordering::Less),
        "$lte" => value
            .and_then(|v| compare(v, operand))
            .is_some_and(|o| o != Ordering::Greater),
        _ => {
            tracing::warn!(operator = op, "Unsupported filter operator");
            false
        }
    }
}

// ─── Evaluation ──────────────────────────────────────────────

/// Run `stages` over `docs`.
///
/// `resolve` returns the current contents of a collection named by a
/// `$lookup` stage.
pub fn evaluate(
    stages: &[Stage],
    docs: Vec<Document>,
    resolve: &dyn Fn(&str) -> Vec<Document>,
) -> Vec<Document> {
    stages
        .iter()
        .fold(docs, |docs, stage| apply_stage(stage, docs, resolve))
}

fn apply_stage(
    stage: &Stage,
    docs: Vec<Document>,
    resolve: &dyn Fn(&str) -> Vec<Document>,
) -> Vec<Document> {
    match stage {
        Stage::Match(filter) => docs.into_iter().filter(|d| matches(d, filter)).collect(),
        Stage::Lookup {
            from,
            local_field,
            foreign_field,
            as_field,
        } => {
            let foreign = resolve(from);
            docs.into_iter()
                .map(|mut doc| {
                    let local = get_path(&doc, local_field).cloned().unwrap_or(Bson::Null);
                    let joined: Vec<Bson> = foreign
                        .iter()
                        .filter(|f| equals(get_path(f, foreign_field), &local))
                        .cloned()
                        .map(Bson::Document)
                        .collect();
                    set_path(&mut doc, as_field, Bson::Array(joined));
                    doc
                })
                .collect()
        }
        Stage::Unwind(path) => docs
            .into_iter()
            .flat_map(|doc| unwind(doc, path))
            .collect(),
        Stage::Project(fields) => docs.iter().map(|doc| project(doc, fields)).collect(),
        Stage::Group { key, sums } => group(docs, key.as_deref(), sums),
    }
}

fn unwind(doc: Document, path: &str) -> Vec<Document> {
    match get_path(&doc, path).cloned() {
        Some(Bson::Array(items)) => items
            .into_iter()
            .map(|item| {
                let mut out = doc.clone();
                set_path(&mut out, path, item);
                out
            })
            .collect(),
        None | Some(Bson::Null) => Vec::new(),
        Some(_) => vec![doc],
    }
}

fn project(doc: &Document, fields: &[(String, Projection)]) -> Document {
    let exclude_id = fields
        .iter()
        .any(|(name, p)| name == "_id" && *p == Projection::Exclude);
    let exclusion_mode = fields
        .iter()
        .filter(|(name, _)| name != "_id")
        .all(|(_, p)| *p == Projection::Exclude);

    if exclusion_mode {
        let mut out = doc.clone();
        for (name, _) in fields {
            out.remove(name);
        }
        return out;
    }

    let mut out = Document::new();
    if !exclude_id {
        if let Some(id) = doc.get("_id") {
            out.insert("_id", id.clone());
        }
    }
    for (name, projection) in fields {
        let value = match projection {
            Projection::Exclude => continue,
            Projection::Include => get_path(doc, name),
            Projection::Field(path) => get_path(doc, path),
        };
        if let Some(value) = value {
            set_path(&mut out, name, value.clone());
        }
    }
    out
}

/// Running `$sum` total; stays integral until a double is seen.
#[derive(Clone, Copy)]
enum Total {
    Int(i64),
    Float(f64),
}

impl Total {
    fn add(self, value: &Bson) -> Self {
        match (self, value) {
            (Total::Int(acc), Bson::Int32(v)) => Total::Int(acc.saturating_add(i64::from(*v))),
            (Total::Int(acc), Bson::Int64(v)) => Total::Int(acc.saturating_add(*v)),
            (Total::Int(acc), Bson::Double(v)) => Total::Float(acc as f64 + v),
            (Total::Float(acc), v) => Total::Float(acc + as_f64(v).unwrap_or(0.0)),
            (total, _) => total,
        }
    }

    fn into_bson(self) -> Bson {
        match self {
            Total::Int(v) => match i32::try_from(v) {
                Ok(small) => Bson::Int32(small),
                Err(_) => Bson::Int64(v),
            },
            Total::Float(v) => Bson::Double(v),
        }
    }
}

fn group(docs: Vec<Document>, key: Option<&str>, sums: &[(String, Sum)]) -> Vec<Document> {
    let mut groups: Vec<(Bson, Vec<Total>)> = Vec::new();

    for doc in &docs {
        let group_key = key
            .and_then(|k| get_path(doc, k))
            .cloned()
            .unwrap_or(Bson::Null);

        let index = match groups
            .iter()
            .position(|(k, _)| values_equal(k, &group_key))
        {
            Some(i) => i,
            None => {
                groups.push((group_key, vec![Total::Int(0); sums.len()]));
                groups.len() - 1
            }
        };

        let totals = &mut groups[index].1;
        for (total, (_, sum)) in totals.iter_mut().zip(sums) {
            *total = match sum {
                Sum::Count => total.add(&Bson::Int32(1)),
                Sum::Field(path) => match get_path(doc, path) {
                    Some(value) => total.add(value),
                    None => *total,
                },
            };
        }
    }

    groups
        .into_iter()
        .map(|(group_key, totals)| {
            let mut out = doc! { "_id": group_key };
            for ((name, _), total) in sums.iter().zip(totals) {
                out.insert(name.clone(), total.into_bson());
            }
            out
        })
        .collect()
}
