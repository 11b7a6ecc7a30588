use anyhow::{bail, Result};
use uuid::Uuid;

use todo_core::TodoItem;

/// Characters of the id shown in listings.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..SHORT_ID_LEN].to_string()
}

/// Accept a full UUID or a unique prefix of one. `Ok(None)` when nothing matches.
pub fn resolve_id(items: &[TodoItem], raw: &str) -> Result<Option<Uuid>> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(Some(id));
    }

    let prefix = raw.trim().replace('-', "").to_ascii_lowercase();
    if prefix.is_empty() {
        bail!("Todo id cannot be empty");
    }

    let mut matches = items
        .iter()
        .filter(|item| item.id.simple().to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (None, _) => Ok(None),
        (Some(item), None) => Ok(Some(item.id)),
        (Some(_), Some(_)) => bail!("Id prefix '{}' matches more than one todo", raw),
    }
}
