//! Unit tests for store error types

use super::StoreError;
use crate::model::decode_file;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

#[test]
fn test_not_found_error() {
    let id = Uuid::nil();
    let error = StoreError::NotFound(id);
    assert_eq!(error.to_string(), format!("Record not found: {id}"));
    assert!(error.source().is_none());
}

#[test]
fn test_io_error_display_and_source() {
    let error = StoreError::io(
        "/library/files/a.txt",
        io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    );
    let display = error.to_string();
    assert!(display.contains("/library/files/a.txt"));
    assert!(display.contains("denied"));
    assert!(error.source().is_some());
    assert!(error.is_io());
}

#[test]
fn test_decode_error_keeps_path() {
    let source = decode_file(b"[]").unwrap_err();
    let error = StoreError::Decode {
        path: PathBuf::from("metadata/file_X.json"),
        source,
    };
    assert!(error.to_string().starts_with("Unreadable record metadata/file_X.json"));
    assert!(!error.is_io());
}

#[test]
fn test_invalid_name_error() {
    let error = StoreError::InvalidName("../escape".into());
    assert_eq!(error.to_string(), "Invalid file name: '../escape'");
}

#[test]
fn test_error_debug() {
    let error = StoreError::AlreadyExists(PathBuf::from("a copy"));
    let debug = format!("{error:?}");
    assert!(debug.contains("AlreadyExists"));
}
