pub mod access_token {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use serde::{Deserialize, Serialize};

    use crate::model::account::AccountRole;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Claims {
        pub sub: String,
        pub role: AccountRole,
        pub exp: i64,
    }

    pub fn verify(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "super-secret".to_string());

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(data.claims)
    }
}
