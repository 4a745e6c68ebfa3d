use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller, as reported by the authentication provider.
///
/// Every mutating service operation receives an `Option<&Principal>`;
/// `None` means the request carried no valid credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}
