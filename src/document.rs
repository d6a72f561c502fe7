use crate::user_account::UserAccount;
use serde_json::{Map, Value};

pub const USER_ID_FIELD: &str = "userId";
pub const PASSWORD_FIELD: &str = "pwd";
pub const USER_NAME_FIELD: &str = "userName";

/// Flat field map as a document store hands it over.
pub type Document = Map<String, Value>;

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("Field {field} holds a {found}, expected a string")]
    FieldType { field: String, found: &'static str },
    #[error("Document is not a JSON object")]
    NotAnObject,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub fn to_document(account: &UserAccount) -> Document {
    [
        (USER_ID_FIELD, account.user_id()),
        (PASSWORD_FIELD, account.password()),
        (USER_NAME_FIELD, account.user_name()),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.map(|value| (field.to_owned(), Value::from(value))))
    .collect()
}

/// Builds an empty record and runs the matching setter for every known field.
///
/// `null` leaves a field unset, unknown fields are skipped.
pub fn from_document(document: &Document) -> Result<UserAccount, DocumentError> {
    let mut account = UserAccount::default();
    for (field, value) in document {
        let setter: fn(&mut UserAccount, &str) = match field.as_str() {
            USER_ID_FIELD => |account, value| account.set_user_id(value),
            PASSWORD_FIELD => |account, value| account.set_password(value),
            USER_NAME_FIELD => |account, value| account.set_user_name(value),
            unknown => {
                tracing::warn!(field = unknown, "No setter for document field, skipping");
                continue;
            }
        };
        let found = match value {
            Value::Null => continue,
            Value::String(value) => {
                setter(&mut account, value);
                continue;
            }
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        return Err(DocumentError::FieldType {
            field: field.clone(),
            found,
        });
    }
    tracing::debug!(%account, "Populated account from document");
    Ok(account)
}

pub fn parse_document(json: &str) -> Result<UserAccount, DocumentError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(document) => from_document(&document),
        _ => Err(DocumentError::NotAnObject),
    }
}

pub fn render_document(account: &UserAccount, pretty: bool) -> Result<String, DocumentError> {
    let document = Value::Object(to_document(account));
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}
