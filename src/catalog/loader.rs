// src/catalog/loader.rs

use std::fs;
use std::path::Path;

use crate::catalog::Catalog;
use crate::errors::Result;
use crate::model::CollectionFile;

/// Read one collection JSON file.
///
/// This only performs deserialization; cross-reference validation happens
/// when the collections are linked into a [`Catalog`]. Use [`load_catalog`]
/// for that.
pub fn load_collection_from_path(path: impl AsRef<Path>) -> Result<CollectionFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let collection: CollectionFile = serde_json::from_str(&contents)?;

    Ok(collection)
}

/// Load several collection files and link them into a validated catalog.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads JSON.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - duplicate formation/family/call/module ids,
///   - unknown formation/family/call references,
///   - modules with empty sequences.
pub fn load_catalog<P: AsRef<Path>>(paths: &[P]) -> Result<Catalog> {
    let mut collections = Vec::with_capacity(paths.len());
    for path in paths {
        collections.push(load_collection_from_path(path)?);
    }

    Catalog::from_collections(collections)
}
