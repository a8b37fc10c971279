//! Identity handling. This is a static allow-list lookup of purchase emails
//! plus a session file, deliberately not an authentication protocol.

use std::{
    collections::HashSet,
    fs, io,
    path::Path,
    sync::{Arc, LazyLock},
};

use anyhow::Result;

static AUTHORIZED_EMAILS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "member@welltrack.app",
        "test@user.com",
        "pvmo.2004@gmail.com",
    ])
});

/// Returns the canonical (lowercased) user identifier when the email is on
/// the allow-list. This identifier is also the remote document key.
pub fn authorize(email: &str) -> Option<Arc<str>> {
    let email = email.trim().to_lowercase();
    AUTHORIZED_EMAILS
        .contains(email.as_str())
        .then(|| Arc::from(email))
}

const SESSION_FILE: &str = "session";

pub fn save_session(application_dir: &Path, user: &str) -> Result<()> {
    fs::write(application_dir.join(SESSION_FILE), user)?;
    Ok(())
}

pub fn load_session(application_dir: &Path) -> Result<Option<Arc<str>>> {
    match fs::read_to_string(application_dir.join(SESSION_FILE)) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(Arc::from(v.trim()))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn clear_session(application_dir: &Path) -> Result<()> {
    match fs::remove_file(application_dir.join(SESSION_FILE)) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
