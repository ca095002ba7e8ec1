use serde::{Deserialize, Serialize};
use serde_json::json;

//role for account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AccountRole { User, Admin, SuperAdmin }
impl std::fmt::Display for AccountRole {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt,"{:?}", self)
    }
}

/// Fixed placeholder shown instead of the real identity whenever the author
/// asked to stay anonymous. Never persisted on the entity itself.
pub const ANONYMOUS_NAME: &str = "Anonymous user";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    pub uuid: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub city: Option<String>,
    pub avatar_id: Option<String>,
    pub role: AccountRole,
    pub created_at: i64,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, AccountRole::Admin | AccountRole::SuperAdmin)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Presentation-layer identity transform. Applied after fetching the real
/// account; a dangling author reference degrades to nulls.
pub fn display_identity(account: Option<&Account>, anonymous: bool) -> serde_json::Value {
    if anonymous {
        return json!({ "name": ANONYMOUS_NAME, "avatar_id": null });
    }

    match account {
        Some(account) => json!({
            "name": account.display_name(),
            "avatar_id": account.avatar_id,
        }),
        None => json!({ "name": null, "avatar_id": null }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            uuid: "u1".to_string(),
            name: "Jan".to_string(),
            surname: "Kowalski".to_string(),
            email: "jan@example.com".to_string(),
            city: None,
            avatar_id: Some("a1".to_string()),
            role: AccountRole::User,
            created_at: 0,
        }
    }

    #[test]
    fn anonymous_identity_hides_the_account() {
        let account = account();
        let identity = display_identity(Some(&account), true);

        assert_eq!(identity["name"], ANONYMOUS_NAME);
        assert!(identity["avatar_id"].is_null());
    }

    #[test]
    fn visible_identity_exposes_name_and_avatar() {
        let account = account();
        let identity = display_identity(Some(&account), false);

        assert_eq!(identity["name"], "Jan Kowalski");
        assert_eq!(identity["avatar_id"], "a1");
    }

    #[test]
    fn missing_account_renders_null_identity() {
        let identity = display_identity(None, false);
        assert!(identity["name"].is_null());
    }
}
