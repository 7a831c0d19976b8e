//! Shared session test doubles.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use crate::directory::domain::{Role, User, UserId};
use crate::session::domain::BearerToken;

pub const NOW: i64 = 1_700_000_000;

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at_now() -> Self {
        Self(DateTime::from_timestamp(NOW, 0).expect("valid timestamp"))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn jwt(payload: &serde_json::Value) -> BearerToken {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    BearerToken::new(format!("{header}.{body}.signature")).expect("non-blank token")
}

pub fn jwt_expiring_at(exp: i64) -> BearerToken {
    jwt(&serde_json::json!({ "user_id": "1", "exp": exp }))
}

pub fn user(id: &str, role: Role) -> User {
    User::new(
        UserId::new(id).expect("valid id"),
        format!("user{id}"),
        format!("user{id}@example.com"),
        role,
        DateTime::from_timestamp(NOW, 0).expect("valid timestamp"),
    )
    .expect("valid user")
}
