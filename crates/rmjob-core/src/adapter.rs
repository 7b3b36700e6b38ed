//! The contract every resource manager backend implements.

use crate::info::Info;
use crate::script::Script;
use crate::status::Status;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use thiserror::Error;

/// Errors surfaced by any adapter operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The resource manager reported a failure
    #[error("{0}")]
    Backend(String),
    /// The resource manager returned something this adapter cannot read
    #[error("Failed to parse resource manager output: {0}")]
    Parse(String),
    /// The backend does not provide this operation
    #[error("adapter does not implement {0}")]
    NotImplemented(&'static str),
}

/// Jobs a new submission depends on, one list per relationship.
///
/// Every setter takes anything iterable whose items print as job ids, so a
/// single id can be passed as `[id]` or `Some(id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// May start any time after these jobs started
    pub after: Vec<String>,
    /// May start only after these jobs terminated without errors
    pub afterok: Vec<String>,
    /// May start only after these jobs terminated with errors
    pub afternotok: Vec<String>,
    /// May start after these jobs terminated
    pub afterany: Vec<String>,
}

fn id_strings<I>(ids: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: ToString,
{
    ids.into_iter().map(|id| id.to_string()).collect()
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        self.after = id_strings(ids);
        self
    }

    pub fn afterok<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        self.afterok = id_strings(ids);
        self
    }

    pub fn afternotok<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        self.afternotok = id_strings(ids);
        self
    }

    pub fn afterany<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        self.afterany = id_strings(ids);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.after.is_empty()
            && self.afterok.is_empty()
            && self.afternotok.is_empty()
            && self.afterany.is_empty()
    }
}

/// Result of an info query: a lone match is returned on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoResult {
    One(Info),
    Many(Vec<Info>),
}

impl InfoResult {
    /// `One` when `infos` holds exactly one entry, otherwise `Many`.
    pub fn from_vec(infos: Vec<Info>) -> Self {
        match <[Info; 1]>::try_from(infos) {
            Ok([info]) => InfoResult::One(info),
            Err(infos) => InfoResult::Many(infos),
        }
    }

    pub fn into_vec(self) -> Vec<Info> {
        match self {
            InfoResult::One(info) => vec![info],
            InfoResult::Many(infos) => infos,
        }
    }

    /// The single match, if there was exactly one.
    pub fn single(self) -> Option<Info> {
        match self {
            InfoResult::One(info) => Some(info),
            InfoResult::Many(_) => None,
        }
    }
}

/// Submits, queries and controls jobs on one resource manager.
///
/// Every operation defaults to [`AdapterError::NotImplemented`]; a backend
/// overrides the ones it supports. Unknown job ids are not errors: `status`
/// and `info` fall back to [`Status::Undetermined`], and `hold`, `release`
/// and `delete` succeed without doing anything.
pub trait Adapter: Send + Sync {
    /// Submit `script`, returning the id the resource manager assigned.
    fn submit(
        &self,
        script: &Script,
        dependencies: &Dependencies,
    ) -> impl Future<Output = Result<String, AdapterError>> + Send {
        let _ = (script, dependencies);
        async { Err(AdapterError::NotImplemented("submit")) }
    }

    /// Info for job `id`, or every visible job when `id` is empty.
    fn info(&self, id: &str) -> impl Future<Output = Result<InfoResult, AdapterError>> + Send {
        let _ = id;
        async { Err(AdapterError::NotImplemented("info")) }
    }

    /// Status of job `id`, cheaper than a full [`Adapter::info`].
    fn status(&self, id: &str) -> impl Future<Output = Result<Status, AdapterError>> + Send {
        let _ = id;
        async { Err(AdapterError::NotImplemented("status")) }
    }

    fn hold(&self, id: &str) -> impl Future<Output = Result<(), AdapterError>> + Send {
        let _ = id;
        async { Err(AdapterError::NotImplemented("hold")) }
    }

    fn release(&self, id: &str) -> impl Future<Output = Result<(), AdapterError>> + Send {
        let _ = id;
        async { Err(AdapterError::NotImplemented("release")) }
    }

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), AdapterError>> + Send {
        let _ = id;
        async { Err(AdapterError::NotImplemented("delete")) }
    }
}

/// Count occurrences of each distinct item, in order of first appearance.
///
/// `["a", "a", "b"]` gives `[("a", 2), ("b", 1)]`.
pub fn count_by_identity<T, I>(items: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut positions: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for item in items {
        match positions.get(&item) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }

    counts
}
